//! Error type for query execution.

use thiserror::Error;

use crate::QueryId;

/// Errors produced by a [`QueryBackend`](crate::QueryBackend).
#[derive(Debug, Error)]
pub enum QueryError {
    /// The referenced stored query does not exist.
    #[error("stored query {0} does not exist")]
    UnknownQuery(QueryId),

    /// A clause referenced a parameter the caller did not supply.
    #[error("query parameter `{0}` was not supplied")]
    MissingParam(String),

    /// A regex clause carried an invalid pattern.
    #[error("invalid regex pattern: {0}")]
    InvalidRegex(#[from] regex::Error),

    /// A regex clause carried a non-string pattern operand.
    #[error("regex pattern for field `{0}` is not a string")]
    NonStringPattern(String),

    /// Backend-specific execution failure, with the underlying error kept
    /// as the source.
    #[error("query execution failed: {message}")]
    Execution {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl QueryError {
    /// Wraps an arbitrary backend error.
    pub fn execution(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        QueryError::Execution {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}
