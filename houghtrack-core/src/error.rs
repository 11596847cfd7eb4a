//! Error types for houghtrack-core.

use thiserror::Error;

/// Result type alias for houghtrack operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for houghtrack operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Invalid caller-supplied argument (negative counts, inverted ranges).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Invalid sweep or grid configuration.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// No points were supplied to a run that requires at least one.
    #[error("no input points supplied")]
    EmptyInput,
}

impl Error {
    pub(crate) fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub(crate) fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}
