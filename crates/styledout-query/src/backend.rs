//! The persistence seam the rendering engine renders against.

use crate::error::QueryError;
use crate::lookup::DetailLookup;
use crate::params::Params;
use crate::stored::Window;
use crate::{QueryId, Row};

/// A source of query results.
///
/// This is the engine's only persistence dependency. [`MemoryStore`]
/// (crate-provided) backs tests and the CLI; production deployments
/// implement this over their own database layer.
///
/// Implementations must be usable from concurrent render requests, hence
/// `Send + Sync`; the engine itself never mutates shared state through this
/// trait.
///
/// [`MemoryStore`]: crate::MemoryStore
pub trait QueryBackend: Send + Sync {
    /// Runs a stored query with bound parameters, returning one page of
    /// rows after filtering and ordering.
    fn run_stored(
        &self,
        id: QueryId,
        params: &Params,
        window: Window,
    ) -> Result<Vec<Row>, QueryError>;

    /// Runs a detail lookup for a built-in placeholder keyword.
    fn run_lookup(&self, lookup: &DetailLookup) -> Result<Vec<Row>, QueryError>;
}
