//! The rendering error taxonomy.
//!
//! One closed sum type covers every way a render can fail. Callers match on
//! the variant to pick a response; nothing in the engine retries.

use thiserror::Error;

use styledout_query::QueryError;

use crate::model::OutputId;

/// Errors surfaced by the styled output resolver.
#[derive(Debug, Error)]
pub enum StyledError {
    /// A styled output references itself, directly or transitively. The
    /// chain lists the render path from the top-level output down to the
    /// repeated id.
    #[error("styled output {id} is already being rendered (path: {chain:?})")]
    CyclicReference {
        /// The output that appeared twice.
        id: OutputId,
        /// The full render path, repeated id included.
        chain: Vec<OutputId>,
    },

    /// Nesting went past the configured maximum. Guards against chains the
    /// cycle check cannot bound, such as long non-repeating reference lists.
    #[error("styled output nesting depth {depth} exceeds the maximum of {limit}")]
    NestingTooDeep {
        /// Depth the render tried to reach.
        depth: usize,
        /// Configured ceiling.
        limit: usize,
    },

    /// The requested styled output does not exist or is disabled.
    #[error("styled output {0} does not exist or is disabled")]
    UnknownOutput(OutputId),

    /// The definition itself is broken: malformed options blob, unparsable
    /// format string, or an unusable placeholder.
    #[error("styled output {id} has an invalid setup: {reason}")]
    InvalidSetup {
        /// The offending definition.
        id: OutputId,
        /// What was wrong with it.
        reason: String,
    },

    /// The caller may not render this output here.
    #[error("styled output {id} may not be rendered: {reason}")]
    NotAllowed {
        /// The refused definition.
        id: OutputId,
        /// Which check refused it.
        reason: String,
    },

    /// Query execution failed; the backend error is preserved as the source.
    #[error("query failed while rendering a styled output")]
    Query(#[from] QueryError),
}
