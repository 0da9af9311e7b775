// Error types
// Every fallible operation in the crate returns QueryError

use sqlparser::parser::ParserError;
use thiserror::Error;

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, QueryError>;

/// Errors raised while loading, looking up, binding or editing queries
#[derive(Debug, Error)]
pub enum QueryError {
    /// The query file was neither embedded nor readable from disk
    #[error("failed to read query file '{path}': {source}")]
    Load {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A lookup was attempted before any query file was loaded
    #[error("no query file loaded; call load() first")]
    NoActiveFile,

    #[error("query '{name}' not found in file '{path}'")]
    NotFound { name: String, path: String },

    #[error("invalid SQL: {0}")]
    Parse(#[from] ParserError),

    #[error("query is not a SELECT statement")]
    NotASelect,

    /// Strict binding: a parameter was supplied but no placeholder uses it
    #[error("parameter '{0}' has no matching placeholder")]
    UnusedParameter(String),

    /// Strict binding: a placeholder was left without a value
    #[error("placeholder ':{0}' has no value")]
    UnresolvedPlaceholder(String),

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}
