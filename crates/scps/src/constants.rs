//! SCPS profile constants assigned by the Bluetooth SIG.

/// Scan Parameters Service UUID.
pub const SCPS_SERVICE_UUID: u16 = 0x1813;
/// Scan Interval Window characteristic UUID.
pub const SCAN_INTERVAL_WINDOW_UUID: u16 = 0x2A4F;
/// Scan Refresh characteristic UUID.
pub const SCAN_REFRESH_UUID: u16 = 0x2A31;

/// Wire size of the Scan Interval Window characteristic value.
pub const SCAN_INTERVAL_WINDOW_SIZE: usize = 4;
/// Wire size of the Scan Refresh characteristic value.
pub const SCAN_REFRESH_SIZE: usize = 1;
/// Wire size of a Client Characteristic Configuration descriptor value.
pub const CLIENT_CONFIGURATION_SIZE: usize = 2;

/// Scan Refresh value requesting the client to re-write its scan
/// parameters.
pub const SCAN_REFRESH_REQUIRED: u8 = 0x00;

/// Lowest LE scan interval/window value (0.625 ms units).
pub const LE_SCAN_TIMING_MIN: u16 = 0x0004;
/// Highest LE scan interval/window value (0.625 ms units).
pub const LE_SCAN_TIMING_MAX: u16 = 0x4000;
