//! SCPS data model: characteristic values and per-peer bookkeeping
//!
//! These are plain value types; the service front-end copies them in and
//! out of events and wire buffers but never retains references into
//! caller memory.

use std::io::Cursor;

use bitflags::bitflags;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::constants::*;
use crate::error::{ScpsError, ScpsResult};

/// Scan Interval Window characteristic value.
///
/// Both fields are in 0.625 ms units. Wire form is 4 bytes: little-endian
/// interval followed by little-endian window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanIntervalWindow {
    pub le_scan_interval: u16,
    pub le_scan_window: u16,
}

impl ScanIntervalWindow {
    pub const fn new(le_scan_interval: u16, le_scan_window: u16) -> Self {
        Self {
            le_scan_interval,
            le_scan_window,
        }
    }

    /// Formats the value into a caller-supplied transmit buffer.
    ///
    /// The buffer must hold at least [`SCAN_INTERVAL_WINDOW_SIZE`] bytes;
    /// shorter buffers fail with `InvalidParameter`. Bytes past the wire
    /// size are left untouched.
    pub fn encode_into(&self, buffer: &mut [u8]) -> ScpsResult<()> {
        if buffer.len() < SCAN_INTERVAL_WINDOW_SIZE {
            return Err(ScpsError::InvalidParameter(format!(
                "scan interval window buffer too short: {} < {}",
                buffer.len(),
                SCAN_INTERVAL_WINDOW_SIZE
            )));
        }

        let mut cursor = Cursor::new(buffer);
        cursor
            .write_u16::<LittleEndian>(self.le_scan_interval)
            .and_then(|_| cursor.write_u16::<LittleEndian>(self.le_scan_window))
            .map_err(|err| ScpsError::Unknown(err.to_string()))?;

        Ok(())
    }

    /// Returns the 4-byte wire encoding.
    pub fn to_bytes(&self) -> [u8; SCAN_INTERVAL_WINDOW_SIZE] {
        let mut bytes = [0u8; SCAN_INTERVAL_WINDOW_SIZE];
        bytes[0..2].copy_from_slice(&self.le_scan_interval.to_le_bytes());
        bytes[2..4].copy_from_slice(&self.le_scan_window.to_le_bytes());
        bytes
    }

    /// Decodes a received characteristic value.
    ///
    /// Anything other than exactly 4 bytes is `MalformattedData`.
    pub fn from_bytes(bytes: &[u8]) -> ScpsResult<Self> {
        if bytes.len() != SCAN_INTERVAL_WINDOW_SIZE {
            return Err(ScpsError::MalformattedData);
        }

        let mut cursor = Cursor::new(bytes);
        let le_scan_interval = cursor
            .read_u16::<LittleEndian>()
            .map_err(|_| ScpsError::MalformattedData)?;
        let le_scan_window = cursor
            .read_u16::<LittleEndian>()
            .map_err(|_| ScpsError::MalformattedData)?;

        Ok(Self {
            le_scan_interval,
            le_scan_window,
        })
    }

    /// Checks the value against the LE controller limits: both fields in
    /// `0x0004..=0x4000` and the window no larger than the interval.
    pub fn validate(&self) -> ScpsResult<()> {
        let in_range = |value: u16| (LE_SCAN_TIMING_MIN..=LE_SCAN_TIMING_MAX).contains(&value);

        if !in_range(self.le_scan_interval) || !in_range(self.le_scan_window) {
            return Err(ScpsError::InvalidParameter(format!(
                "scan timing out of range: interval {:#06x}, window {:#06x}",
                self.le_scan_interval, self.le_scan_window
            )));
        }
        if self.le_scan_window > self.le_scan_interval {
            return Err(ScpsError::InvalidParameter(format!(
                "scan window {:#06x} exceeds interval {:#06x}",
                self.le_scan_window, self.le_scan_interval
            )));
        }

        Ok(())
    }
}

bitflags! {
    /// Client Characteristic Configuration descriptor value.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ClientConfiguration: u16 {
        const NOTIFY = 0x0001;
        const INDICATE = 0x0002;
    }
}

impl ClientConfiguration {
    /// Returns the 2-byte little-endian wire encoding.
    pub fn to_bytes(&self) -> [u8; CLIENT_CONFIGURATION_SIZE] {
        self.bits().to_le_bytes()
    }

    /// Decodes a received descriptor value. Wrong lengths and undefined
    /// bits are `MalformattedData`.
    pub fn from_bytes(bytes: &[u8]) -> ScpsResult<Self> {
        if bytes.len() != CLIENT_CONFIGURATION_SIZE {
            return Err(ScpsError::MalformattedData);
        }
        let raw = u16::from_le_bytes([bytes[0], bytes[1]]);
        Self::from_bits(raw).ok_or(ScpsError::MalformattedData)
    }
}

/// Which SCPS characteristic a configuration event refers to.
///
/// Scan Refresh is the only SCPS characteristic with a CCCD, but events
/// carry the discriminant so callers can route uniformly across profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharacteristicType {
    ScanRefresh,
}

/// Attribute handles an SCPS client caches after service discovery so
/// discovery only runs once per bond.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClientInformation {
    /// Scan Interval Window characteristic value handle.
    pub scan_interval_window: u16,
    /// Scan Refresh characteristic value handle.
    pub scan_refresh: u16,
    /// Scan Refresh CCCD handle.
    pub scan_refresh_client_configuration: u16,
}

impl ClientInformation {
    /// True once every handle has been discovered. The Scan Refresh
    /// characteristic is optional in the profile, so only the Scan
    /// Interval Window handle is mandatory.
    pub fn is_complete(&self) -> bool {
        self.scan_interval_window != 0
            && (self.scan_refresh == 0) == (self.scan_refresh_client_configuration == 0)
    }
}

/// Per-client state an SCPS server persists across connections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ServerInformation {
    /// Scan Refresh CCCD value the client last wrote.
    pub scan_refresh_client_configuration: ClientConfiguration,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_interval_window_wire_format() {
        let siw = ScanIntervalWindow::new(0x0010, 0x0020);
        assert_eq!(siw.to_bytes(), [0x10, 0x00, 0x20, 0x00]);

        let mut buffer = [0xFFu8; 6];
        siw.encode_into(&mut buffer).unwrap();
        assert_eq!(buffer, [0x10, 0x00, 0x20, 0x00, 0xFF, 0xFF]);
    }

    #[test]
    fn test_scan_interval_window_short_buffer() {
        let siw = ScanIntervalWindow::new(0x0010, 0x0020);
        let mut buffer = [0u8; 3];
        let err = siw.encode_into(&mut buffer).unwrap_err();
        assert_eq!(err.code(), -1000);
    }

    #[test]
    fn test_scan_interval_window_decode() {
        let siw = ScanIntervalWindow::from_bytes(&[0x10, 0x00, 0x20, 0x00]).unwrap();
        assert_eq!(siw, ScanIntervalWindow::new(0x0010, 0x0020));

        assert_eq!(
            ScanIntervalWindow::from_bytes(&[0x10, 0x00, 0x20])
                .unwrap_err()
                .code(),
            -1005
        );
        assert_eq!(
            ScanIntervalWindow::from_bytes(&[0x10, 0x00, 0x20, 0x00, 0x00])
                .unwrap_err()
                .code(),
            -1005
        );
    }

    #[test]
    fn test_scan_interval_window_validation() {
        assert!(ScanIntervalWindow::new(0x0010, 0x0010).validate().is_ok());
        // Window larger than interval
        assert!(ScanIntervalWindow::new(0x0010, 0x0020).validate().is_err());
        // Below controller minimum
        assert!(ScanIntervalWindow::new(0x0003, 0x0003).validate().is_err());
        // Above controller maximum
        assert!(ScanIntervalWindow::new(0x4001, 0x0010).validate().is_err());
    }

    #[test]
    fn test_client_configuration_codec() {
        assert_eq!(ClientConfiguration::NOTIFY.to_bytes(), [0x01, 0x00]);
        assert_eq!(
            ClientConfiguration::from_bytes(&[0x01, 0x00]).unwrap(),
            ClientConfiguration::NOTIFY
        );
        assert_eq!(
            ClientConfiguration::from_bytes(&[0x00, 0x00]).unwrap(),
            ClientConfiguration::empty()
        );
        // Undefined bits
        assert!(ClientConfiguration::from_bytes(&[0x04, 0x00]).is_err());
        // Wrong length
        assert!(ClientConfiguration::from_bytes(&[0x01]).is_err());
    }

    #[test]
    fn test_client_information_completeness() {
        let mut info = ClientInformation::default();
        assert!(!info.is_complete());

        info.scan_interval_window = 0x0003;
        assert!(info.is_complete());

        info.scan_refresh = 0x0005;
        assert!(!info.is_complete());

        info.scan_refresh_client_configuration = 0x0006;
        assert!(info.is_complete());
    }
}
