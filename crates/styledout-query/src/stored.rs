//! Stored query definitions and result windows.

use serde::{Deserialize, Serialize};

use crate::QueryId;
use crate::clause::Clause;

/// Sort direction for an ordering clause.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dir {
    /// Ascending (the default).
    #[default]
    Asc,
    /// Descending.
    Desc,
}

/// A single ordering clause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBy {
    /// The column to order by.
    pub field: String,
    /// Sort direction, ascending when omitted.
    #[serde(default)]
    pub dir: Dir,
}

/// An admin-defined row source a styled output definition points at.
///
/// A stored query selects the items of one entity type, keeps those matching
/// every clause, sorts them, and is paged through a [`Window`] at execution
/// time. `select` optionally projects the returned columns; without it a row
/// carries all item columns plus `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredQuery {
    /// Query identifier, referenced by `StyledOutput::query_id`.
    pub id: QueryId,
    /// Human-readable name.
    pub name: String,
    /// Entity type of the selected items.
    pub entity: String,
    /// Filter predicates, all of which must match.
    #[serde(default)]
    pub clauses: Vec<Clause>,
    /// Multi-field ordering applied before the window.
    #[serde(default)]
    pub order_by: Vec<OrderBy>,
    /// Optional column projection.
    #[serde(default)]
    pub select: Option<Vec<String>>,
}

/// One page of a result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    /// Rows to skip.
    pub offset: usize,
    /// Maximum rows to return.
    pub limit: usize,
}

impl Window {
    /// Builds the window for a zero-based page number.
    pub fn page(page: usize, per_page: usize) -> Self {
        Window {
            offset: page.saturating_mul(per_page),
            limit: per_page,
        }
    }
}
