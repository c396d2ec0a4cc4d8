//! GATT engine seam
//!
//! The SCPS front-end does not own a GATT server; it registers its
//! attribute table with a host engine and reacts to the requests the
//! engine forwards. This module defines that boundary: the service-table
//! model, the request context, and the `GattServiceEngine` trait an
//! embedding stack implements.

pub mod constants;
pub mod engine;
pub mod error;
pub mod types;

pub use self::constants::*;
pub use self::engine::{
    GattServiceEngine, RequestContext, ServiceRegistration, ServiceRequestHandler,
};
pub use self::error::{GattError, GattResult};
pub use self::types::{
    AttributeHandleGroup, AttributePermissions, CharacteristicProperties, ConnectionType,
    ServiceAttribute, ServiceDefinition,
};
