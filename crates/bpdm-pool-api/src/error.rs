//! Pool client error types.

use thiserror::Error;

/// Error that can occur when calling the Pool API.
#[derive(Debug, Error)]
pub enum PoolClientError {
    /// Transport-level failure (connection, timeout, TLS).
    #[error("pool request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The Pool returned a non-success status.
    #[error("pool returned HTTP {status}: {detail}")]
    Api { status: u16, detail: String },

    /// The response body could not be deserialized.
    #[error("failed to parse pool response: {0}")]
    Parse(String),

    /// The client was constructed with invalid settings.
    #[error("invalid pool client configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for Pool client operations.
pub type PoolClientResult<T> = Result<T, PoolClientError>;
