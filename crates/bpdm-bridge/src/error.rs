//! Bridge error types.

use thiserror::Error;

use bpdm_gate_api::GateClientError;
use bpdm_pool_api::PoolClientError;

/// Error that can occur during a sync pass.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// A Gate call failed.
    #[error(transparent)]
    Gate(#[from] GateClientError),

    /// A Pool call failed.
    #[error(transparent)]
    Pool(#[from] PoolClientError),

    /// Another sync pass is already in flight.
    #[error("a sync pass is already in flight")]
    SyncAlreadyRunning,

    /// The checkpoint store failed to load or save.
    #[error("checkpoint store error: {0}")]
    Checkpoint(String),

    /// The bridge was constructed with invalid settings.
    #[error("invalid bridge configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for bridge operations.
pub type BridgeResult<T> = Result<T, BridgeError>;
