//! Errors reported across the GATT engine seam
use thiserror::Error;

/// Errors an embedding GATT engine can report back to a profile
#[derive(Debug, Error)]
pub enum GattError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Invalid Bluetooth stack ID: {0}")]
    InvalidStackId(u32),

    #[error("GATT engine not initialized")]
    NotInitialized,

    #[error("Invalid service table format: {0}")]
    InvalidServiceTableFormat(String),

    #[error("Insufficient resources")]
    InsufficientResources,

    #[error("No service registered with ID {0}")]
    ServiceNotRegistered(u32),

    #[error("Invalid transaction ID: {0}")]
    InvalidTransactionId(u32),

    #[error("Invalid connection ID: {0}")]
    InvalidConnectionId(u32),

    #[error("Requested handle range {start:#06x}..={end:#06x} is unavailable")]
    HandleRangeUnavailable { start: u16, end: u16 },
}

/// GATT Result type
pub type GattResult<T> = Result<T, GattError>;
