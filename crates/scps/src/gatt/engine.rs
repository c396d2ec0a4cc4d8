//! The trait boundary between a profile front-end and the host GATT engine.

use std::sync::Arc;

use super::error::GattResult;
use super::types::{AttributeHandleGroup, ConnectionType, ServiceDefinition};
use crate::gap::BdAddr;

/// Context the engine attaches to every forwarded attribute request.
#[derive(Debug, Clone, Copy)]
pub struct RequestContext {
    /// Connection the request arrived on.
    pub connection_id: u32,
    /// ATT transaction awaiting a response, or 0 for a write command
    /// (write-without-response), which owes no response.
    pub transaction_id: u32,
    /// Transport of the connection.
    pub connection_type: ConnectionType,
    /// Address of the peer that issued the request.
    pub remote_device: BdAddr,
}

impl RequestContext {
    /// Whether this request expects an ATT response.
    pub fn expects_response(&self) -> bool {
        self.transaction_id != 0
    }
}

/// Outcome of registering a service table with the engine.
#[derive(Debug, Clone, Copy)]
pub struct ServiceRegistration {
    /// Engine-assigned service identifier, used for later calls.
    pub service_id: u32,
    /// Handle range the table was placed at.
    pub handle_range: AttributeHandleGroup,
}

/// Receives attribute requests the engine forwards for a registered
/// service.
///
/// The engine invokes a handler serially: a call is never issued while a
/// previous one on the same registration is still outstanding, and it runs
/// on a thread the profile does not own. Implementations must not block,
/// and must not wait on work that can only complete through another
/// engine callback.
pub trait ServiceRequestHandler: Send + Sync {
    /// A peer issued a read request for the attribute at `attribute_offset`
    /// (zero-based offset into the registered table). The response is sent
    /// later through [`GattServiceEngine::read_response`] or
    /// [`GattServiceEngine::error_response`] with the transaction id from
    /// `context`.
    fn on_read(&self, context: &RequestContext, attribute_offset: u16);

    /// A peer wrote `value` to the attribute at `attribute_offset`. When
    /// `context.expects_response()` the handler settles the transaction
    /// through [`GattServiceEngine::write_response`] or
    /// [`GattServiceEngine::error_response`].
    fn on_write(&self, context: &RequestContext, attribute_offset: u16, value: &[u8]);
}

/// Host GATT engine a profile front-end registers against.
///
/// This is the seam to the surrounding Bluetooth stack: the engine owns
/// the attribute database, the ATT transport, and all connection
/// bookkeeping. Profiles only describe tables and answer requests.
pub trait GattServiceEngine: Send + Sync {
    /// Identifier of the underlying stack instance. Profiles that permit a
    /// single registration per stack key their bookkeeping on this value.
    fn stack_id(&self) -> u32;

    /// Places `definition` into the attribute database and installs
    /// `handler` for inbound requests. When `requested_range` is given the
    /// table must land inside it; otherwise the engine picks the range.
    fn register_service(
        &self,
        definition: &ServiceDefinition,
        handler: Arc<dyn ServiceRequestHandler>,
        requested_range: Option<AttributeHandleGroup>,
    ) -> GattResult<ServiceRegistration>;

    /// Removes a previously registered service and drops its handler.
    fn unregister_service(&self, service_id: u32) -> GattResult<()>;

    /// Answers an outstanding read transaction with `value`.
    fn read_response(&self, transaction_id: u32, value: &[u8]) -> GattResult<()>;

    /// Acknowledges an outstanding write transaction.
    fn write_response(&self, transaction_id: u32) -> GattResult<()>;

    /// Refuses an outstanding transaction with an ATT error code.
    fn error_response(&self, transaction_id: u32, att_error_code: u8) -> GattResult<()>;

    /// Sends a handle-value notification for the attribute at
    /// `attribute_offset` of the registered service to one connection.
    fn notify(
        &self,
        service_id: u32,
        connection_id: u32,
        attribute_offset: u16,
        value: &[u8],
    ) -> GattResult<()>;
}
