//! Styled output definitions and engine configuration.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use styledout_query::QueryId;

/// Identifier of a styled output definition.
pub type OutputId = u64;

/// Output encoding of a rendered styled output.
///
/// Under `Json`, substituted string values are escaped as JSON string
/// fragments; under `Raw` they are inserted as-is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReturnFormat {
    /// JSON text (the default).
    #[default]
    Json,
    /// Unescaped text.
    Raw,
}

/// A styled output definition, immutable during a render pass.
///
/// The four format strings drive assembly: `format_begin` and `format_end`
/// wrap the result, `format_item` renders once per row, and `format_empty`
/// is the entire output when the query matches nothing. `options` is kept as
/// the raw JSON blob it is stored as and parsed on every render — see
/// [`OutputOptions`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyledOutput {
    /// Definition identifier.
    pub id: OutputId,
    /// Human-readable name.
    pub name: String,
    /// Emitted once before the first rendered row.
    #[serde(default)]
    pub format_begin: String,
    /// Rendered once per result row.
    #[serde(default)]
    pub format_item: String,
    /// Emitted once after the last rendered row.
    #[serde(default)]
    pub format_end: String,
    /// The entire output when the result set is empty, verbatim.
    #[serde(default)]
    pub format_empty: String,
    /// The stored query producing this output's rows.
    pub query_id: QueryId,
    /// Output encoding.
    #[serde(default)]
    pub return_type: ReturnFormat,
    /// Raw options blob, parsed per render.
    #[serde(default)]
    pub options: Value,
    /// Restricted definitions need an allowing scope.
    #[serde(default)]
    pub restricted: bool,
    /// Disabled definitions render like unknown ids.
    #[serde(default = "enabled_default")]
    pub enabled: bool,
}

fn enabled_default() -> bool {
    true
}

impl StyledOutput {
    /// Creates a definition with empty format strings and default flags.
    pub fn new(id: OutputId, name: impl Into<String>, query_id: QueryId) -> Self {
        StyledOutput {
            id,
            name: name.into(),
            format_begin: String::new(),
            format_item: String::new(),
            format_end: String::new(),
            format_empty: String::new(),
            query_id,
            return_type: ReturnFormat::default(),
            options: Value::Null,
            restricted: false,
            enabled: true,
        }
    }
}

/// Per-definition rendering options, stored as a JSON blob.
///
/// Keys are camelCase in storage: `maxResultsPerPage`, `logTiming`,
/// `removeNotFoundElements`. An absent or null blob means all defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputOptions {
    /// Per-definition page size cap; the engine-wide cap still applies.
    #[serde(default)]
    pub max_results_per_page: Option<u32>,
    /// Emit per-render timing through `tracing`.
    #[serde(default)]
    pub log_timing: bool,
    /// Drop built-in placeholder entries whose lookup matched nothing,
    /// wrapper included, instead of rendering them with an empty value.
    #[serde(default)]
    pub remove_not_found_elements: bool,
}

impl OutputOptions {
    /// Parses the raw blob. Null means defaults; anything else must be a
    /// well-formed options object.
    pub fn parse(blob: &Value) -> Result<Self, String> {
        if blob.is_null() {
            return Ok(OutputOptions::default());
        }
        serde_json::from_value(blob.clone()).map_err(|e| format!("invalid options blob: {e}"))
    }
}

/// The set of styled output definitions available to a resolver.
#[derive(Debug, Clone, Default)]
pub struct OutputCatalog {
    outputs: HashMap<OutputId, StyledOutput>,
}

impl OutputCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        OutputCatalog::default()
    }

    /// Adds a definition, replacing any previous one with the same id.
    pub fn insert(&mut self, output: StyledOutput) -> Option<StyledOutput> {
        self.outputs.insert(output.id, output)
    }

    /// Looks a definition up by id.
    pub fn get(&self, id: OutputId) -> Option<&StyledOutput> {
        self.outputs.get(&id)
    }

    /// Number of definitions.
    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }

    /// Iterates over all definitions in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &StyledOutput> {
        self.outputs.values()
    }
}

impl FromIterator<StyledOutput> for OutputCatalog {
    fn from_iter<T: IntoIterator<Item = StyledOutput>>(iter: T) -> Self {
        let mut catalog = OutputCatalog::new();
        for output in iter {
            catalog.insert(output);
        }
        catalog
    }
}

/// Engine-wide limits, overridable through configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Limits {
    /// Hard cap on rows per page; requests and definition options are
    /// clamped to this.
    pub max_results_per_page: u32,
    /// Maximum depth of nested styled output references.
    pub max_nesting: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_results_per_page: 500,
            max_nesting: 10,
        }
    }
}
