//! Events dispatched by an SCPS server instance
//!
//! Each event identifies the dispatching instance, the connection it
//! arrived on, and the peer behind it. Only CCCD reads carry a
//! transaction id, because they are the one request the application
//! answers itself (through
//! [`ScpsServer::read_client_configuration_response`]); every other
//! request is settled by the front-end before the event is dispatched.
//!
//! [`ScpsServer::read_client_configuration_response`]: crate::server::ScpsServer::read_client_configuration_response

use std::sync::Arc;

use crate::gap::BdAddr;
use crate::gatt::ConnectionType;
use crate::types::{CharacteristicType, ClientConfiguration, ScanIntervalWindow};

/// A peer asked to read a characteristic's CCCD.
///
/// The application must respond from within the callback context using
/// the carried transaction id.
#[derive(Debug, Clone)]
pub struct ReadClientConfigurationData {
    pub instance_id: u32,
    pub connection_id: u32,
    pub transaction_id: u32,
    pub connection_type: ConnectionType,
    pub remote_device: BdAddr,
    pub client_configuration_type: CharacteristicType,
}

/// A peer wrote a characteristic's CCCD.
#[derive(Debug, Clone)]
pub struct ClientConfigurationUpdateData {
    pub instance_id: u32,
    pub connection_id: u32,
    pub connection_type: ConnectionType,
    pub remote_device: BdAddr,
    pub client_configuration_type: CharacteristicType,
    /// The value the peer requested.
    pub client_configuration: ClientConfiguration,
}

/// A peer wrote the Scan Interval Window characteristic.
#[derive(Debug, Clone)]
pub struct WriteScanIntervalWindowData {
    pub instance_id: u32,
    pub connection_id: u32,
    pub connection_type: ConnectionType,
    pub remote_device: BdAddr,
    pub scan_interval_window: ScanIntervalWindow,
}

/// Events generated by an SCPS server instance.
#[derive(Debug, Clone)]
pub enum ScpsEvent {
    ReadClientConfiguration(ReadClientConfigurationData),
    UpdateClientConfiguration(ClientConfigurationUpdateData),
    WriteScanIntervalWindow(WriteScanIntervalWindowData),
}

impl ScpsEvent {
    /// Instance that dispatched the event.
    pub fn instance_id(&self) -> u32 {
        match self {
            ScpsEvent::ReadClientConfiguration(data) => data.instance_id,
            ScpsEvent::UpdateClientConfiguration(data) => data.instance_id,
            ScpsEvent::WriteScanIntervalWindow(data) => data.instance_id,
        }
    }

    /// Connection the originating request arrived on.
    pub fn connection_id(&self) -> u32 {
        match self {
            ScpsEvent::ReadClientConfiguration(data) => data.connection_id,
            ScpsEvent::UpdateClientConfiguration(data) => data.connection_id,
            ScpsEvent::WriteScanIntervalWindow(data) => data.connection_id,
        }
    }
}

/// Callback receiving SCPS server events.
///
/// The front-end invokes the callback serially: it is never reentered
/// concurrently for the same instance, and it runs on a thread the
/// application does not own. It must not block, and must not wait on work
/// that can only complete through another stack callback, or the stack
/// deadlocks. Event data is borrowed; copy out anything needed beyond the
/// callback's extent.
pub type ScpsEventCallback = Arc<dyn Fn(&ScpsEvent) + Send + Sync>;
