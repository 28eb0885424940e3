//! Gate client error types.

use thiserror::Error;

/// Error that can occur when calling the Gate API.
#[derive(Debug, Error)]
pub enum GateClientError {
    /// Transport-level failure (connection, timeout, TLS).
    #[error("gate request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The Gate returned a non-success status.
    #[error("gate returned HTTP {status}: {detail}")]
    Api { status: u16, detail: String },

    /// The response body could not be deserialized.
    #[error("failed to parse gate response: {0}")]
    Parse(String),

    /// The client was constructed with invalid settings.
    #[error("invalid gate client configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for Gate client operations.
pub type GateClientResult<T> = Result<T, GateClientError>;
