//! SCPS server front-end
//!
//! This module builds the fixed Scan Parameters Service attribute table,
//! registers it with a host GATT engine, routes the attribute requests
//! the engine forwards, and dispatches typed events to the application
//! callback. Only one SCPS instance may be registered per underlying
//! stack at a time.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, OnceLock};

use log::{debug, warn};

use crate::constants::*;
use crate::error::{ScpsError, ScpsResult};
use crate::event::{
    ClientConfigurationUpdateData, ReadClientConfigurationData, ScpsEvent, ScpsEventCallback,
    WriteScanIntervalWindowData,
};
use crate::gatt::{
    AttributeHandleGroup, AttributePermissions, CharacteristicProperties, GattServiceEngine,
    RequestContext, ServiceDefinition, ServiceRegistration, ServiceRequestHandler,
    ATT_ERROR_CCCD_IMPROPERLY_CONFIGURED, ATT_ERROR_INVALID_ATTRIBUTE_VALUE_LENGTH,
    ATT_ERROR_READ_NOT_PERMITTED, ATT_ERROR_WRITE_NOT_PERMITTED, ATT_HANDLE_MIN,
    CHAR_PROP_NOTIFY, CHAR_PROP_WRITE_WITHOUT_RESPONSE, CLIENT_CHAR_CONFIG_UUID,
};
use crate::types::{CharacteristicType, ClientConfiguration, ScanIntervalWindow};
use crate::uuid::Uuid;

/// Number of attributes the registered SCPS service occupies.
pub const SCPS_ATTRIBUTE_COUNT: u32 = 6;

// Zero-based offsets into the service table built below.
const SCAN_INTERVAL_WINDOW_VALUE_OFFSET: u16 = 2;
const SCAN_REFRESH_VALUE_OFFSET: u16 = 4;
const SCAN_REFRESH_CCCD_OFFSET: u16 = 5;

/// Stack id -> instance id of the registered SCPS server. Enforces the
/// one-instance-per-stack rule across the process.
fn registry() -> &'static Mutex<HashMap<u32, u32>> {
    static REGISTRY: OnceLock<Mutex<HashMap<u32, u32>>> = OnceLock::new();
    REGISTRY.get_or_init(|| Mutex::new(HashMap::new()))
}

fn next_instance_id() -> u32 {
    static NEXT: AtomicU32 = AtomicU32::new(1);
    NEXT.fetch_add(1, Ordering::Relaxed)
}

/// Builds the fixed SCPS attribute table:
///
/// | offset | attribute                                        |
/// |--------|--------------------------------------------------|
/// | 0      | primary service declaration (0x1813)             |
/// | 1      | Scan Interval Window declaration                 |
/// | 2      | Scan Interval Window value (write w/o response)  |
/// | 3      | Scan Refresh declaration                         |
/// | 4      | Scan Refresh value (notify only)                 |
/// | 5      | Scan Refresh CCCD                                |
fn build_service_table() -> ServiceDefinition {
    let mut table = ServiceDefinition::primary(Uuid::from_u16(SCPS_SERVICE_UUID));

    let siw_offset = table.push_characteristic(
        Uuid::from_u16(SCAN_INTERVAL_WINDOW_UUID),
        CharacteristicProperties::new(CHAR_PROP_WRITE_WITHOUT_RESPONSE),
        AttributePermissions::write_only(),
        SCAN_INTERVAL_WINDOW_SIZE,
    );
    debug_assert_eq!(siw_offset, SCAN_INTERVAL_WINDOW_VALUE_OFFSET);

    let refresh_offset = table.push_characteristic(
        Uuid::from_u16(SCAN_REFRESH_UUID),
        CharacteristicProperties::new(CHAR_PROP_NOTIFY),
        AttributePermissions::none(),
        SCAN_REFRESH_SIZE,
    );
    debug_assert_eq!(refresh_offset, SCAN_REFRESH_VALUE_OFFSET);

    let cccd_offset = table.push_descriptor(
        Uuid::from_u16(CLIENT_CHAR_CONFIG_UUID),
        AttributePermissions::read_write(),
        ClientConfiguration::empty().to_bytes().to_vec(),
    );
    debug_assert_eq!(cccd_offset, SCAN_REFRESH_CCCD_OFFSET);

    table
}

/// Shared state behind the handler the engine holds.
struct ScpsServerInner {
    instance_id: u32,
    engine: Arc<dyn GattServiceEngine>,
    callback: ScpsEventCallback,
    /// Held across every callback invocation so the callback is never
    /// reentered concurrently for this instance.
    dispatch_lock: Mutex<()>,
    /// CCCD read transactions surfaced to the application and not yet
    /// answered.
    pending_reads: Mutex<HashSet<u32>>,
}

impl ScpsServerInner {
    fn dispatch(&self, event: ScpsEvent) {
        let _guard = self.dispatch_lock.lock().unwrap();
        (self.callback)(&event);
    }

    fn refuse(&self, context: &RequestContext, att_error_code: u8) {
        if !context.expects_response() {
            warn!(
                "scps: dropping unanswerable request from {} (error {:#04x})",
                context.remote_device, att_error_code
            );
            return;
        }
        if let Err(err) = self
            .engine
            .error_response(context.transaction_id, att_error_code)
        {
            warn!(
                "scps: failed to refuse transaction {}: {}",
                context.transaction_id, err
            );
        }
    }

    fn handle_scan_interval_window_write(&self, context: &RequestContext, value: &[u8]) {
        let scan_interval_window = match ScanIntervalWindow::from_bytes(value) {
            Ok(siw) => siw,
            Err(_) => {
                self.refuse(context, ATT_ERROR_INVALID_ATTRIBUTE_VALUE_LENGTH);
                return;
            }
        };

        // The characteristic is write-without-response, but a response is
        // still owed if the peer used a plain write request.
        if context.expects_response() {
            if let Err(err) = self.engine.write_response(context.transaction_id) {
                warn!(
                    "scps: failed to ack scan interval window write: {}",
                    err
                );
            }
        }

        self.dispatch(ScpsEvent::WriteScanIntervalWindow(
            WriteScanIntervalWindowData {
                instance_id: self.instance_id,
                connection_id: context.connection_id,
                connection_type: context.connection_type,
                remote_device: context.remote_device,
                scan_interval_window,
            },
        ));
    }

    fn handle_cccd_write(&self, context: &RequestContext, value: &[u8]) {
        if value.len() != CLIENT_CONFIGURATION_SIZE {
            self.refuse(context, ATT_ERROR_INVALID_ATTRIBUTE_VALUE_LENGTH);
            return;
        }

        let raw = u16::from_le_bytes([value[0], value[1]]);
        let client_configuration = match ClientConfiguration::from_bits(raw) {
            // Scan Refresh supports notifications only.
            Some(config) if !config.contains(ClientConfiguration::INDICATE) => config,
            _ => {
                self.refuse(context, ATT_ERROR_CCCD_IMPROPERLY_CONFIGURED);
                return;
            }
        };

        if context.expects_response() {
            if let Err(err) = self.engine.write_response(context.transaction_id) {
                warn!("scps: failed to ack CCCD write: {}", err);
            }
        }

        self.dispatch(ScpsEvent::UpdateClientConfiguration(
            ClientConfigurationUpdateData {
                instance_id: self.instance_id,
                connection_id: context.connection_id,
                connection_type: context.connection_type,
                remote_device: context.remote_device,
                client_configuration_type: CharacteristicType::ScanRefresh,
                client_configuration,
            },
        ));
    }
}

impl ServiceRequestHandler for ScpsServerInner {
    fn on_read(&self, context: &RequestContext, attribute_offset: u16) {
        match attribute_offset {
            SCAN_REFRESH_CCCD_OFFSET => {
                self.pending_reads
                    .lock()
                    .unwrap()
                    .insert(context.transaction_id);

                self.dispatch(ScpsEvent::ReadClientConfiguration(
                    ReadClientConfigurationData {
                        instance_id: self.instance_id,
                        connection_id: context.connection_id,
                        transaction_id: context.transaction_id,
                        connection_type: context.connection_type,
                        remote_device: context.remote_device,
                        client_configuration_type: CharacteristicType::ScanRefresh,
                    },
                ));
            }
            offset => {
                debug!("scps: read refused at offset {}", offset);
                self.refuse(context, ATT_ERROR_READ_NOT_PERMITTED);
            }
        }
    }

    fn on_write(&self, context: &RequestContext, attribute_offset: u16, value: &[u8]) {
        match attribute_offset {
            SCAN_INTERVAL_WINDOW_VALUE_OFFSET => {
                self.handle_scan_interval_window_write(context, value)
            }
            SCAN_REFRESH_CCCD_OFFSET => self.handle_cccd_write(context, value),
            offset => {
                debug!("scps: write refused at offset {}", offset);
                self.refuse(context, ATT_ERROR_WRITE_NOT_PERMITTED);
            }
        }
    }
}

/// A registered SCPS server instance.
///
/// Created with [`ScpsServer::initialize_service`] or
/// [`ScpsServer::initialize_service_handle_range`]; deregistered with
/// [`ScpsServer::cleanup`] (or on drop, best effort).
pub struct ScpsServer {
    inner: Arc<ScpsServerInner>,
    registration: ServiceRegistration,
    stack_id: u32,
    active: bool,
}

impl std::fmt::Debug for ScpsServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScpsServer")
            .field("registration", &self.registration)
            .field("stack_id", &self.stack_id)
            .field("active", &self.active)
            .finish_non_exhaustive()
    }
}

impl ScpsServer {
    /// Registers an SCPS server on the given engine, letting the engine
    /// pick the attribute handle range.
    pub fn initialize_service(
        engine: Arc<dyn GattServiceEngine>,
        callback: ScpsEventCallback,
    ) -> ScpsResult<ScpsServer> {
        Self::initialize(engine, callback, None)
    }

    /// Registers an SCPS server inside a caller-chosen handle range.
    ///
    /// On success `handle_range` is updated to the range the service was
    /// actually stored at.
    pub fn initialize_service_handle_range(
        engine: Arc<dyn GattServiceEngine>,
        callback: ScpsEventCallback,
        handle_range: &mut AttributeHandleGroup,
    ) -> ScpsResult<ScpsServer> {
        if handle_range.starting_handle < ATT_HANDLE_MIN
            || (handle_range.len() as u32) < SCPS_ATTRIBUTE_COUNT
        {
            return Err(ScpsError::InvalidParameter(format!(
                "handle range {:#06x}..={:#06x} cannot hold {} attributes",
                handle_range.starting_handle, handle_range.ending_handle, SCPS_ATTRIBUTE_COUNT
            )));
        }

        let server = Self::initialize(engine, callback, Some(*handle_range))?;
        *handle_range = server.registration.handle_range;
        Ok(server)
    }

    fn initialize(
        engine: Arc<dyn GattServiceEngine>,
        callback: ScpsEventCallback,
        requested_range: Option<AttributeHandleGroup>,
    ) -> ScpsResult<ScpsServer> {
        let stack_id = engine.stack_id();
        let instance_id = next_instance_id();

        // Reserve the stack slot before touching the engine so two
        // concurrent initializations cannot both register.
        {
            let mut slots = registry().lock().unwrap();
            if slots.contains_key(&stack_id) {
                return Err(ScpsError::ServiceAlreadyRegistered(stack_id));
            }
            slots.insert(stack_id, instance_id);
        }

        let inner = Arc::new(ScpsServerInner {
            instance_id,
            engine: engine.clone(),
            callback,
            dispatch_lock: Mutex::new(()),
            pending_reads: Mutex::new(HashSet::new()),
        });

        let table = build_service_table();
        let registration =
            match engine.register_service(&table, inner.clone(), requested_range) {
                Ok(registration) => registration,
                Err(err) => {
                    registry().lock().unwrap().remove(&stack_id);
                    return Err(err.into());
                }
            };

        debug!(
            "scps: instance {} registered on stack {} as service {} at {:#06x}..={:#06x}",
            instance_id,
            stack_id,
            registration.service_id,
            registration.handle_range.starting_handle,
            registration.handle_range.ending_handle
        );

        Ok(ScpsServer {
            inner,
            registration,
            stack_id,
            active: true,
        })
    }

    /// Number of attributes the SCPS service occupies in the attribute
    /// database.
    pub fn query_number_attributes() -> u32 {
        SCPS_ATTRIBUTE_COUNT
    }

    /// Instance identifier carried in every dispatched event.
    pub fn instance_id(&self) -> u32 {
        self.inner.instance_id
    }

    /// Engine-assigned service identifier.
    pub fn service_id(&self) -> u32 {
        self.registration.service_id
    }

    /// Handle range the service was stored at.
    pub fn handle_range(&self) -> AttributeHandleGroup {
        self.registration.handle_range
    }

    /// Responds to a CCCD read request previously surfaced by a
    /// [`ScpsEvent::ReadClientConfiguration`] event.
    ///
    /// The transaction id must come from that event and can be answered
    /// once; anything else is `InvalidParameter`.
    pub fn read_client_configuration_response(
        &self,
        transaction_id: u32,
        client_configuration: ClientConfiguration,
    ) -> ScpsResult<()> {
        if !self
            .inner
            .pending_reads
            .lock()
            .unwrap()
            .contains(&transaction_id)
        {
            return Err(ScpsError::InvalidParameter(format!(
                "no outstanding CCCD read with transaction id {}",
                transaction_id
            )));
        }

        self.inner
            .engine
            .read_response(transaction_id, &client_configuration.to_bytes())?;

        self.inner
            .pending_reads
            .lock()
            .unwrap()
            .remove(&transaction_id);
        Ok(())
    }

    /// Sends a Scan Refresh notification to one connected client.
    pub fn notify_scan_refresh(
        &self,
        connection_id: u32,
        scan_refresh_value: u8,
    ) -> ScpsResult<()> {
        self.inner
            .engine
            .notify(
                self.registration.service_id,
                connection_id,
                SCAN_REFRESH_VALUE_OFFSET,
                &[scan_refresh_value],
            )
            .map_err(Into::into)
    }

    /// Deregisters the service and releases the stack slot. After this
    /// the stack can host a fresh SCPS instance.
    pub fn cleanup(mut self) -> ScpsResult<()> {
        self.release()
    }

    fn release(&mut self) -> ScpsResult<()> {
        if !self.active {
            return Err(ScpsError::InvalidInstanceId(self.inner.instance_id));
        }
        self.active = false;

        let result = self
            .inner
            .engine
            .unregister_service(self.registration.service_id);
        registry().lock().unwrap().remove(&self.stack_id);

        debug!(
            "scps: instance {} cleaned up on stack {}",
            self.inner.instance_id, self.stack_id
        );

        result.map_err(Into::into)
    }
}

impl Drop for ScpsServer {
    fn drop(&mut self) {
        if self.active {
            let _ = self.release();
        }
    }
}
