//! Workspace file loading.
//!
//! A workspace file is one JSON document carrying everything a render
//! needs: engine settings, the data set, and the styled output
//! definitions.
//!
//! ```json
//! {
//!   "settings": {"maxResultsPerPage": 100},
//!   "store": {
//!     "items": [{"id": 1, "entity": "product", "fields": {"title": "Shoes"}}],
//!     "queries": [{"id": 100, "name": "products", "entity": "product"}]
//!   },
//!   "outputs": [{"id": 10, "name": "list", "query_id": 100}]
//! }
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use styledout::{Limits, OutputCatalog, StyledOutput};
use styledout_query::MemoryStore;

/// The on-disk shape of a workspace file.
#[derive(Debug, Default, Deserialize)]
pub struct WorkspaceFile {
    /// Engine limits; defaults apply when omitted.
    #[serde(default)]
    pub settings: Limits,
    /// Items, details, links and stored queries.
    #[serde(default)]
    pub store: MemoryStore,
    /// Styled output definitions.
    #[serde(default)]
    pub outputs: Vec<StyledOutput>,
}

/// A loaded workspace, ready to render from.
#[derive(Debug)]
pub struct Workspace {
    /// Engine limits.
    pub limits: Limits,
    /// The data backend.
    pub store: MemoryStore,
    /// The definition catalog.
    pub catalog: OutputCatalog,
}

impl Workspace {
    /// Reads and deserializes a workspace file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("cannot read workspace file {}", path.display()))?;
        let file: WorkspaceFile = serde_json::from_str(&text)
            .with_context(|| format!("workspace file {} is not valid JSON", path.display()))?;
        Ok(Workspace {
            limits: file.settings,
            store: file.store,
            catalog: file.outputs.into_iter().collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_workspace(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_a_minimal_workspace() {
        let file = write_workspace(
            r#"{
                "store": {
                    "items": [{"id": 1, "entity": "product"}],
                    "queries": [{"id": 100, "name": "products", "entity": "product"}]
                },
                "outputs": [{"id": 10, "name": "list", "query_id": 100}]
            }"#,
        );

        let workspace = Workspace::load(file.path()).unwrap();
        assert_eq!(workspace.limits, Limits::default());
        assert_eq!(workspace.store.items.len(), 1);
        assert!(workspace.catalog.get(10).is_some());
    }

    #[test]
    fn settings_override_the_defaults() {
        let file = write_workspace(r#"{"settings": {"maxNesting": 2}}"#);
        let workspace = Workspace::load(file.path()).unwrap();
        assert_eq!(workspace.limits.max_nesting, 2);
        assert_eq!(workspace.limits.max_results_per_page, 500);
    }

    #[test]
    fn missing_file_reports_the_path() {
        let err = Workspace::load(Path::new("/no/such/workspace.json")).unwrap_err();
        assert!(err.to_string().contains("/no/such/workspace.json"));
    }

    #[test]
    fn invalid_json_reports_the_path() {
        let file = write_workspace("{not json");
        let err = Workspace::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("not valid JSON"));
    }
}
