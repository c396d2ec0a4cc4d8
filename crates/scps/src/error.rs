//! Error types for the scps library
//!
//! This module defines the top-level error type returned by the SCPS
//! service front-end. The taxonomy is flat and each variant carries a
//! stable negative integer code for callers that interoperate with
//! stacks reporting errors numerically.

use crate::gatt::GattError;
use thiserror::Error;

/// Stable error code for an invalid parameter.
pub const SCPS_ERROR_INVALID_PARAMETER: i32 = -1000;
/// Stable error code for an invalid Bluetooth stack ID.
pub const SCPS_ERROR_INVALID_BLUETOOTH_STACK_ID: i32 = -1001;
/// Stable error code for insufficient resources.
pub const SCPS_ERROR_INSUFFICIENT_RESOURCES: i32 = -1002;
/// Stable error code for a service that is already registered.
pub const SCPS_ERROR_SERVICE_ALREADY_REGISTERED: i32 = -1003;
/// Stable error code for an invalid service instance ID.
pub const SCPS_ERROR_INVALID_INSTANCE_ID: i32 = -1004;
/// Stable error code for malformatted data.
pub const SCPS_ERROR_MALFORMATTED_DATA: i32 = -1005;
/// Stable error code for an unknown error.
pub const SCPS_ERROR_UNKNOWN_ERROR: i32 = -1006;

/// Errors returned by the SCPS service front-end
#[derive(Debug, Error)]
pub enum ScpsError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Invalid Bluetooth stack ID: {0}")]
    InvalidStackId(u32),

    #[error("Insufficient resources")]
    InsufficientResources,

    #[error("SCPS service already registered on stack {0}")]
    ServiceAlreadyRegistered(u32),

    #[error("Invalid SCPS instance ID: {0}")]
    InvalidInstanceId(u32),

    #[error("Malformatted data")]
    MalformattedData,

    #[error("GATT engine error: {0}")]
    Gatt(#[from] GattError),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl ScpsError {
    /// Stable negative integer code for this error.
    ///
    /// Engine errors are folded onto the nearest SCPS code so that every
    /// failure maps to exactly one value from the table above.
    pub fn code(&self) -> i32 {
        match self {
            ScpsError::InvalidParameter(_) => SCPS_ERROR_INVALID_PARAMETER,
            ScpsError::InvalidStackId(_) => SCPS_ERROR_INVALID_BLUETOOTH_STACK_ID,
            ScpsError::InsufficientResources => SCPS_ERROR_INSUFFICIENT_RESOURCES,
            ScpsError::ServiceAlreadyRegistered(_) => SCPS_ERROR_SERVICE_ALREADY_REGISTERED,
            ScpsError::InvalidInstanceId(_) => SCPS_ERROR_INVALID_INSTANCE_ID,
            ScpsError::MalformattedData => SCPS_ERROR_MALFORMATTED_DATA,
            ScpsError::Gatt(err) => match err {
                GattError::InvalidParameter(_) => SCPS_ERROR_INVALID_PARAMETER,
                GattError::InvalidServiceTableFormat(_) => SCPS_ERROR_INVALID_PARAMETER,
                GattError::InvalidTransactionId(_) => SCPS_ERROR_INVALID_PARAMETER,
                GattError::InvalidConnectionId(_) => SCPS_ERROR_INVALID_PARAMETER,
                GattError::HandleRangeUnavailable { .. } => SCPS_ERROR_INVALID_PARAMETER,
                GattError::InvalidStackId(_) => SCPS_ERROR_INVALID_BLUETOOTH_STACK_ID,
                GattError::NotInitialized => SCPS_ERROR_INVALID_BLUETOOTH_STACK_ID,
                GattError::InsufficientResources => SCPS_ERROR_INSUFFICIENT_RESOURCES,
                GattError::ServiceNotRegistered(_) => SCPS_ERROR_INVALID_INSTANCE_ID,
            },
            ScpsError::Unknown(_) => SCPS_ERROR_UNKNOWN_ERROR,
        }
    }
}

/// SCPS Result type
pub type ScpsResult<T> = Result<T, ScpsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(ScpsError::InvalidParameter("x".into()).code(), -1000);
        assert_eq!(ScpsError::InvalidStackId(1).code(), -1001);
        assert_eq!(ScpsError::InsufficientResources.code(), -1002);
        assert_eq!(ScpsError::ServiceAlreadyRegistered(1).code(), -1003);
        assert_eq!(ScpsError::InvalidInstanceId(7).code(), -1004);
        assert_eq!(ScpsError::MalformattedData.code(), -1005);
        assert_eq!(ScpsError::Unknown("x".into()).code(), -1006);
    }

    #[test]
    fn test_engine_errors_fold_onto_scps_codes() {
        let err: ScpsError = GattError::NotInitialized.into();
        assert_eq!(err.code(), -1001);

        let err: ScpsError = GattError::InsufficientResources.into();
        assert_eq!(err.code(), -1002);

        let err: ScpsError = GattError::ServiceNotRegistered(3).into();
        assert_eq!(err.code(), -1004);

        let err: ScpsError = GattError::InvalidConnectionId(9).into();
        assert_eq!(err.code(), -1000);
    }
}
