//! # Styledout — styled output rendering over stored queries
//!
//! A styled output is a stored definition of four format strings
//! (begin/item/end/empty) wired to a stored query. Rendering executes the
//! query, expands the item template once per result row, and assembles the
//! pieces into JSON or raw text. Item templates can reference row columns
//! (`{title}`), run built-in detail lookups
//! (`{StyledOutputSingleDetail,title,Title}`), and embed other styled
//! outputs (`{StyledOutput,12}`) — recursion is bounded by a cycle check
//! over the render path plus a configurable nesting limit.
//!
//! The engine talks to persistence only through
//! [`QueryBackend`](styledout_query::QueryBackend);
//! [`MemoryStore`](styledout_query::MemoryStore) backs the examples here.
//!
//! ## Quick start
//!
//! ```rust
//! use serde_json::json;
//! use styledout::{render, OutputCatalog, StyledOutput};
//! use styledout_query::{Item, MemoryStore, Params, StoredQuery};
//!
//! let mut store = MemoryStore::new();
//! store.add_item(Item::new(1, "product").field("title", json!("Red Shoes")));
//! store.add_query(StoredQuery {
//!     id: 100,
//!     name: "products".into(),
//!     entity: "product".into(),
//!     clauses: vec![],
//!     order_by: vec![],
//!     select: None,
//! });
//!
//! let mut catalog = OutputCatalog::new();
//! let mut def = StyledOutput::new(10, "product-list", 100);
//! def.format_begin = "[".into();
//! def.format_item = r#"{"id": {id}, "title": "{title}"}"#.into();
//! def.format_end = "]".into();
//! def.format_empty = "[]".into();
//! catalog.insert(def);
//!
//! let out = render(&catalog, &store, 10, &Params::new()).unwrap();
//! assert_eq!(out, r#"[{"id": 1, "title": "Red Shoes"}]"#);
//! ```
//!
//! For pagination, whitespace stripping, format restrictions and batch
//! rendering, drive a [`Resolver`] directly.

pub mod builtins;
mod batch;
mod condition;
mod error;
mod model;
mod resolver;
mod util;

pub use batch::BatchOutcome;
pub use condition::{ConditionError, ConditionKind, ResultCondition};
pub use error::StyledError;
pub use model::{Limits, OutputCatalog, OutputId, OutputOptions, ReturnFormat, StyledOutput};
pub use resolver::{RenderPath, RenderRequest, RenderScope, Resolver};
pub use util::strip_newlines_and_tabs;

use styledout_query::{Params, QueryBackend};

/// Renders a styled output with a default scope and request.
///
/// Convenience wrapper over [`Resolver::render`] for callers that need no
/// pagination, stripping, or format restrictions.
pub fn render(
    catalog: &OutputCatalog,
    backend: &dyn QueryBackend,
    id: OutputId,
    params: &Params,
) -> Result<String, StyledError> {
    Resolver::new(catalog, backend).render(
        &RenderScope::default(),
        id,
        params,
        &RenderRequest::default(),
    )
}
