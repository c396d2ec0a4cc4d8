//! scps - a GATT Scan Parameters Service (SCPS) profile implementation
//!
//! This library provides the server front-end for the Bluetooth SIG Scan
//! Parameters Service: it builds the service's fixed attribute table,
//! registers it with a host GATT engine, dispatches typed events when a
//! peer reads or writes the service's attributes, and offers helpers to
//! answer CCCD reads and push Scan Refresh notifications. The GATT
//! engine itself (attribute database, ATT transport, connection
//! management) is external and reached through the [`gatt`] seam.

pub mod constants;
pub mod error;
pub mod event;
pub mod gap;
pub mod gatt;
pub mod server;
pub mod types;
pub mod uuid;

// Re-export common types for convenience
pub use constants::{
    SCAN_INTERVAL_WINDOW_SIZE, SCAN_INTERVAL_WINDOW_UUID, SCAN_REFRESH_REQUIRED,
    SCAN_REFRESH_SIZE, SCAN_REFRESH_UUID, SCPS_SERVICE_UUID,
};
pub use error::{ScpsError, ScpsResult};
pub use event::{
    ClientConfigurationUpdateData, ReadClientConfigurationData, ScpsEvent, ScpsEventCallback,
    WriteScanIntervalWindowData,
};
pub use gap::BdAddr;
pub use gatt::{
    AttributeHandleGroup, ConnectionType, GattError, GattResult, GattServiceEngine,
    RequestContext, ServiceDefinition, ServiceRegistration, ServiceRequestHandler,
};
pub use server::{ScpsServer, SCPS_ATTRIBUTE_COUNT};
pub use types::{
    CharacteristicType, ClientConfiguration, ClientInformation, ScanIntervalWindow,
    ServerInformation,
};
pub use uuid::Uuid;
