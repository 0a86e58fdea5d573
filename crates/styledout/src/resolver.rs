//! The recursive styled output resolver.
//!
//! [`Resolver`] turns a stored definition plus runtime parameters into
//! rendered text. Rendering is request-scoped: a resolver borrows its
//! catalog and backend, holds no mutable state, and every recursive step
//! carries its own immutable [`RenderPath`] — concurrent renders share
//! nothing but the backend.

use std::time::Instant;

use serde_json::Value;

use styledout_format::{scan_directives, Directive};
use styledout_query::{Params, QueryBackend, Row, Window};

use crate::builtins::{self, Builtin, NESTED_KEYWORD};
use crate::error::StyledError;
use crate::model::{Limits, OutputCatalog, OutputId, OutputOptions, ReturnFormat, StyledOutput};
use crate::util::{fragment, strip_newlines_and_tabs};

/// Caller context a render runs under.
///
/// Building an authenticated scope is the caller's concern; the engine only
/// enforces the restricted flag and logs the tenant.
#[derive(Debug, Clone, Default)]
pub struct RenderScope {
    /// Tenant the backend is scoped to, for diagnostics.
    pub tenant: Option<String>,
    /// Whether restricted definitions may be rendered.
    pub allow_restricted: bool,
}

/// Per-call rendering options.
#[derive(Debug, Clone, Default)]
pub struct RenderRequest {
    /// Remove literal `\r\n`, `\n` and `\t` from the final output.
    pub strip_newlines_and_tabs: bool,
    /// Requested page size; clamped by definition options and engine
    /// limits.
    pub results_per_page: Option<u32>,
    /// Zero-based page number.
    pub page: u32,
    /// When present, only definitions with one of these return formats may
    /// render — nested references included.
    pub allowed_formats: Option<Vec<ReturnFormat>>,
}

/// The render path from the top-level output down to the current one.
///
/// Descending clones the path, so sibling branches can never observe each
/// other's ids — there is no shared mutable guard list to unwind.
#[derive(Debug, Clone, Default)]
pub struct RenderPath(Vec<OutputId>);

impl RenderPath {
    /// The empty path of a top-level render.
    pub fn root() -> Self {
        RenderPath::default()
    }

    fn contains(&self, id: OutputId) -> bool {
        self.0.contains(&id)
    }

    fn depth(&self) -> usize {
        self.0.len()
    }

    fn descend(&self, id: OutputId) -> Self {
        RenderPath(self.chain_with(id))
    }

    fn chain_with(&self, id: OutputId) -> Vec<OutputId> {
        let mut chain = self.0.clone();
        chain.push(id);
        chain
    }
}

/// Everything a recursive step reads from its caller.
struct Call<'a> {
    scope: &'a RenderScope,
    params: &'a Params,
    request: &'a RenderRequest,
}

/// The parsed pieces of one definition's item template.
struct ItemTemplate<'a> {
    definition: &'a StyledOutput,
    options: &'a OutputOptions,
    directives: &'a [Directive],
}

/// Renders styled output definitions against a query backend.
pub struct Resolver<'a> {
    catalog: &'a OutputCatalog,
    backend: &'a dyn QueryBackend,
    limits: Limits,
}

impl<'a> Resolver<'a> {
    /// Creates a resolver with default [`Limits`].
    pub fn new(catalog: &'a OutputCatalog, backend: &'a dyn QueryBackend) -> Self {
        Resolver {
            catalog,
            backend,
            limits: Limits::default(),
        }
    }

    /// Creates a resolver with explicit limits.
    pub fn with_limits(
        catalog: &'a OutputCatalog,
        backend: &'a dyn QueryBackend,
        limits: Limits,
    ) -> Self {
        Resolver {
            catalog,
            backend,
            limits,
        }
    }

    /// The limits this resolver renders under.
    pub fn limits(&self) -> Limits {
        self.limits
    }

    /// Renders one styled output.
    ///
    /// # Errors
    ///
    /// See [`StyledError`] for the failure taxonomy. Errors are never
    /// retried and there is no partial output: a failed render returns
    /// nothing but the error.
    pub fn render(
        &self,
        scope: &RenderScope,
        id: OutputId,
        params: &Params,
        request: &RenderRequest,
    ) -> Result<String, StyledError> {
        let call = Call {
            scope,
            params,
            request,
        };
        let rendered = self.render_at(&call, id, &RenderPath::root())?;
        Ok(if request.strip_newlines_and_tabs {
            strip_newlines_and_tabs(&rendered)
        } else {
            rendered
        })
    }

    fn render_at(
        &self,
        call: &Call<'_>,
        id: OutputId,
        path: &RenderPath,
    ) -> Result<String, StyledError> {
        // The cycle check runs before anything else so a self-referencing
        // definition fails without executing its query a second time.
        if path.contains(id) {
            return Err(StyledError::CyclicReference {
                id,
                chain: path.chain_with(id),
            });
        }
        if path.depth() >= self.limits.max_nesting {
            return Err(StyledError::NestingTooDeep {
                depth: path.depth() + 1,
                limit: self.limits.max_nesting,
            });
        }

        let definition = self
            .catalog
            .get(id)
            .filter(|d| d.enabled)
            .ok_or(StyledError::UnknownOutput(id))?;

        if definition.restricted && !call.scope.allow_restricted {
            return Err(StyledError::NotAllowed {
                id,
                reason: "definition is restricted".to_string(),
            });
        }
        if let Some(allowed) = &call.request.allowed_formats {
            if !allowed.contains(&definition.return_type) {
                return Err(StyledError::NotAllowed {
                    id,
                    reason: format!(
                        "return format {:?} is not allowed for this call",
                        definition.return_type
                    ),
                });
            }
        }

        let options = OutputOptions::parse(&definition.options)
            .map_err(|reason| StyledError::InvalidSetup { id, reason })?;

        let per_page = call
            .request
            .results_per_page
            .or(options.max_results_per_page)
            .unwrap_or(self.limits.max_results_per_page)
            .clamp(1, self.limits.max_results_per_page);
        let window = Window::page(call.request.page as usize, per_page as usize);

        let started = Instant::now();
        let rows = self
            .backend
            .run_stored(definition.query_id, call.params, window)?;

        let output = if rows.is_empty() {
            definition.format_empty.clone()
        } else {
            let directives = scan_directives(&definition.format_item).map_err(|e| {
                StyledError::InvalidSetup {
                    id,
                    reason: e.to_string(),
                }
            })?;
            let template = ItemTemplate {
                definition,
                options: &options,
                directives: &directives,
            };

            let mut out = String::with_capacity(
                definition.format_begin.len()
                    + rows.len() * definition.format_item.len()
                    + definition.format_end.len(),
            );
            out.push_str(&definition.format_begin);
            for row in &rows {
                let item = self.expand_row(call, &template, row, path)?;
                out.push_str(&item);
            }
            out.push_str(&definition.format_end);
            out
        };

        if options.log_timing {
            tracing::info!(
                output = id,
                tenant = call.scope.tenant.as_deref(),
                rows = rows.len(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "rendered styled output"
            );
        }

        Ok(output)
    }

    /// Expands one row of `format_item`: directives first, then field
    /// substitution over the literal spans between them.
    fn expand_row(
        &self,
        call: &Call<'_>,
        template: &ItemTemplate<'_>,
        row: &Row,
        path: &RenderPath,
    ) -> Result<String, StyledError> {
        let mut replacements = Vec::with_capacity(template.directives.len());
        for directive in template.directives {
            replacements.push(self.expand_directive(call, template, directive, row, path)?);
        }

        Ok(styledout_format::expand(
            &template.definition.format_item,
            template.directives,
            &replacements,
            |name| {
                row.get(name)
                    .map(|value| fragment(value, template.definition.return_type))
            },
        ))
    }

    fn expand_directive(
        &self,
        call: &Call<'_>,
        template: &ItemTemplate<'_>,
        directive: &Directive,
        row: &Row,
        path: &RenderPath,
    ) -> Result<String, StyledError> {
        if directive.name == NESTED_KEYWORD {
            return self.expand_nested(call, template, directive, row, path);
        }
        match builtins::find(&directive.name) {
            Some(builtin) => self.expand_builtin(template, builtin, directive, row),
            None => Err(StyledError::InvalidSetup {
                id: template.definition.id,
                reason: format!("unknown placeholder keyword `{}`", directive.name),
            }),
        }
    }

    /// Renders a nested `{StyledOutput,<id>}` reference.
    ///
    /// The nested call inherits the caller's parameters and allowed-formats
    /// list, binds the current row's `id` as `styled_id`, and starts from
    /// the first page with default sizing. Whitespace stripping stays a
    /// top-level concern.
    fn expand_nested(
        &self,
        call: &Call<'_>,
        template: &ItemTemplate<'_>,
        directive: &Directive,
        row: &Row,
        path: &RenderPath,
    ) -> Result<String, StyledError> {
        let nested_id: OutputId = directive
            .args
            .first()
            .and_then(|arg| arg.parse().ok())
            .ok_or_else(|| StyledError::InvalidSetup {
                id: template.definition.id,
                reason: format!(
                    "`{NESTED_KEYWORD}` needs a numeric styled output id, got {:?}",
                    directive.args
                ),
            })?;

        let mut nested_params = call.params.clone();
        if let Some(row_id) = row.get("id") {
            nested_params.set("styled_id", row_id.clone());
        }
        let nested_request = RenderRequest {
            strip_newlines_and_tabs: false,
            results_per_page: None,
            page: 0,
            allowed_formats: call.request.allowed_formats.clone(),
        };
        let nested_call = Call {
            scope: call.scope,
            params: &nested_params,
            request: &nested_request,
        };

        self.render_at(&nested_call, nested_id, &path.descend(template.definition.id))
    }

    /// Runs a built-in keyword's lookup and renders its layouts.
    fn expand_builtin(
        &self,
        template: &ItemTemplate<'_>,
        builtin: &Builtin,
        directive: &Directive,
        row: &Row,
    ) -> Result<String, StyledError> {
        let definition = template.definition;
        let key = directive
            .args
            .first()
            .filter(|arg| !arg.is_empty())
            .ok_or_else(|| StyledError::InvalidSetup {
                id: definition.id,
                reason: format!("`{}` needs a detail key argument", builtin.key),
            })?;
        let name = directive
            .args
            .get(1)
            .filter(|arg| !arg.is_empty())
            .unwrap_or(key);

        let item_id = row
            .get("id")
            .and_then(Value::as_u64)
            .ok_or_else(|| StyledError::InvalidSetup {
                id: definition.id,
                reason: format!(
                    "`{}` needs a numeric `id` column in the result row",
                    builtin.key
                ),
            })?;

        let rows = self.backend.run_lookup(&builtin.lookup(item_id, key))?;

        if rows.is_empty() && template.options.remove_not_found_elements {
            return Ok(String::new());
        }
        Ok(builtin.render(name, &rows, definition.return_type))
    }
}
