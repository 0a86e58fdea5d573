//! Query seam for the styled output engine.
//!
//! The rendering engine never talks to a database directly. Everything it
//! needs from persistence goes through the [`QueryBackend`] trait:
//!
//! - **Stored queries** ([`StoredQuery`]): admin-defined row sources a styled
//!   output definition points at by id. A stored query selects items of one
//!   entity type, filters them with [`Clause`]s (AND semantics), orders them,
//!   and returns one page of [`Row`]s per call.
//! - **Detail lookups** ([`DetailLookup`]): the typed requests behind the
//!   built-in placeholder keywords — single/multi/language/linked property
//!   reads for one item.
//!
//! [`MemoryStore`] is a complete in-memory backend used by the test suites
//! and the CLI; a SQL-backed implementation would live outside this
//! workspace and implement the same trait.
//!
//! # Quick start
//!
//! ```rust
//! use serde_json::json;
//! use styledout_query::{
//!     Clause, Item, MemoryStore, Op, Operand, Params, QueryBackend, StoredQuery, Window,
//! };
//!
//! let mut store = MemoryStore::new();
//! store.add_item(Item::new(1, "product").field("title", json!("Red Shoes")));
//! store.add_item(Item::new(2, "product").field("title", json!("Blue Hat")));
//! store.add_query(StoredQuery {
//!     id: 100,
//!     name: "products".into(),
//!     entity: "product".into(),
//!     clauses: vec![Clause {
//!         field: "title".into(),
//!         op: Op::Contains,
//!         value: Operand::Literal(json!("Shoes")),
//!     }],
//!     order_by: vec![],
//!     select: None,
//! });
//!
//! let rows = store
//!     .run_stored(100, &Params::new(), Window::page(0, 50))
//!     .unwrap();
//! assert_eq!(rows.len(), 1);
//! assert_eq!(rows[0]["id"], json!(1));
//! ```

mod backend;
mod clause;
mod error;
mod lookup;
mod memory;
mod op;
mod params;
mod stored;

pub use backend::QueryBackend;
pub use clause::{Clause, Operand};
pub use error::QueryError;
pub use lookup::{DetailLookup, LANGUAGE_CODES};
pub use memory::{Detail, Item, Link, MemoryStore};
pub use op::Op;
pub use params::Params;
pub use stored::{Dir, OrderBy, StoredQuery, Window};

/// Identifier of an item row.
pub type ItemId = u64;

/// Identifier of a stored query.
pub type QueryId = u64;

/// A single result row: column name to JSON value.
pub type Row = serde_json::Map<String, serde_json::Value>;
