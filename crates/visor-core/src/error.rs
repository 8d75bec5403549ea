//! Error types for visor-core

use thiserror::Error;

/// Main error type for visor operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Uniform wrapper for any failure inside a find/find_all operation.
    ///
    /// Carries the needle id and the stringified underlying cause; this is
    /// the only error shape callers of `find`/`find_all` observe for
    /// validation, capture, or finder failures.
    #[error("Searching for {id} failed. Reason: {reason}")]
    SearchFailed { id: String, reason: String },

    #[error("Invalid search region: {0}")]
    InvalidSearchRegion(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("No {0} provider registered")]
    ProviderMissing(&'static str),

    #[error("Action timed out after {0} ms")]
    Timeout(u64),

    #[error("Action aborted by signal")]
    Aborted,

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Wrap an underlying cause into the uniform search-failure shape.
    pub fn search_failed(id: impl Into<String>, cause: impl std::fmt::Display) -> Self {
        Error::SearchFailed {
            id: id.into(),
            reason: cause.to_string(),
        }
    }
}

/// Result type alias for visor operations
pub type Result<T> = std::result::Result<T, Error>;
