//! Types shared across the GATT engine seam
use super::constants::*;
use super::error::{GattError, GattResult};
use crate::uuid::Uuid;

/// Transport a GATT connection runs over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionType {
    LowEnergy,
    BrEdr,
}

/// A contiguous range of attribute handles occupied by a service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AttributeHandleGroup {
    pub starting_handle: u16,
    pub ending_handle: u16,
}

impl AttributeHandleGroup {
    pub const fn new(starting_handle: u16, ending_handle: u16) -> Self {
        Self {
            starting_handle,
            ending_handle,
        }
    }

    /// Number of handles in the range, zero when the range is inverted.
    pub fn len(&self) -> u16 {
        if self.ending_handle >= self.starting_handle {
            self.ending_handle - self.starting_handle + 1
        } else {
            0
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, handle: u16) -> bool {
        handle >= self.starting_handle && handle <= self.ending_handle
    }
}

/// Characteristic property bits from the declaration attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharacteristicProperties(pub u8);

impl CharacteristicProperties {
    pub const fn new(raw: u8) -> Self {
        Self(raw)
    }

    pub fn can_read(&self) -> bool {
        (self.0 & CHAR_PROP_READ) != 0
    }

    pub fn can_write(&self) -> bool {
        (self.0 & CHAR_PROP_WRITE) != 0
    }

    pub fn can_write_without_response(&self) -> bool {
        (self.0 & CHAR_PROP_WRITE_WITHOUT_RESPONSE) != 0
    }

    pub fn can_notify(&self) -> bool {
        (self.0 & CHAR_PROP_NOTIFY) != 0
    }

    pub fn can_indicate(&self) -> bool {
        (self.0 & CHAR_PROP_INDICATE) != 0
    }
}

/// Attribute permission bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributePermissions(u16);

impl AttributePermissions {
    pub const fn none() -> Self {
        Self(ATT_PERM_NONE)
    }

    pub const fn read_only() -> Self {
        Self(ATT_PERM_READ)
    }

    pub const fn write_only() -> Self {
        Self(ATT_PERM_WRITE)
    }

    pub const fn read_write() -> Self {
        Self(ATT_PERM_READ | ATT_PERM_WRITE)
    }

    pub fn value(&self) -> u16 {
        self.0
    }

    pub fn allows_read(&self) -> bool {
        (self.0 & ATT_PERM_READ) != 0
    }

    pub fn allows_write(&self) -> bool {
        (self.0 & ATT_PERM_WRITE) != 0
    }
}

/// One entry in a service's attribute table.
///
/// Entries are identified by their zero-based offset within the table;
/// the engine maps offsets onto concrete handles when the service is
/// registered.
#[derive(Debug, Clone)]
pub enum ServiceAttribute {
    /// Service declaration (attribute type 0x2800).
    PrimaryServiceDeclaration { service_uuid: Uuid },
    /// Characteristic declaration (attribute type 0x2803). The engine
    /// fills in the value handle when it materializes the table.
    CharacteristicDeclaration {
        properties: CharacteristicProperties,
        value_uuid: Uuid,
    },
    /// Characteristic value attribute.
    CharacteristicValue {
        value_uuid: Uuid,
        permissions: AttributePermissions,
        max_length: usize,
    },
    /// Descriptor attribute with an initial value.
    Descriptor {
        descriptor_uuid: Uuid,
        permissions: AttributePermissions,
        value: Vec<u8>,
    },
}

impl ServiceAttribute {
    /// Encodes a characteristic declaration value (properties byte,
    /// little-endian value handle, value UUID) once the value handle is
    /// known. Returns `None` for non-declaration entries.
    pub fn declaration_value(&self, value_handle: u16) -> Option<Vec<u8>> {
        match self {
            ServiceAttribute::CharacteristicDeclaration {
                properties,
                value_uuid,
            } => {
                let mut value = Vec::with_capacity(19);
                value.push(properties.0);
                value.extend_from_slice(&value_handle.to_le_bytes());
                if let Some(uuid16) = value_uuid.as_u16() {
                    value.extend_from_slice(&uuid16.to_le_bytes());
                } else {
                    value.extend_from_slice(value_uuid.as_bytes_le());
                }
                Some(value)
            }
            _ => None,
        }
    }
}

/// An ordered attribute table describing one service.
#[derive(Debug, Clone)]
pub struct ServiceDefinition {
    service_uuid: Uuid,
    attributes: Vec<ServiceAttribute>,
}

impl ServiceDefinition {
    /// Starts a primary service table. The declaration occupies offset 0.
    pub fn primary(service_uuid: Uuid) -> Self {
        Self {
            service_uuid,
            attributes: vec![ServiceAttribute::PrimaryServiceDeclaration { service_uuid }],
        }
    }

    pub fn service_uuid(&self) -> Uuid {
        self.service_uuid
    }

    /// Appends a characteristic declaration/value pair and returns the
    /// offset of the value attribute.
    pub fn push_characteristic(
        &mut self,
        value_uuid: Uuid,
        properties: CharacteristicProperties,
        permissions: AttributePermissions,
        max_length: usize,
    ) -> u16 {
        self.attributes.push(ServiceAttribute::CharacteristicDeclaration {
            properties,
            value_uuid,
        });
        self.attributes.push(ServiceAttribute::CharacteristicValue {
            value_uuid,
            permissions,
            max_length,
        });
        (self.attributes.len() - 1) as u16
    }

    /// Appends a descriptor and returns its offset.
    pub fn push_descriptor(
        &mut self,
        descriptor_uuid: Uuid,
        permissions: AttributePermissions,
        value: Vec<u8>,
    ) -> u16 {
        self.attributes.push(ServiceAttribute::Descriptor {
            descriptor_uuid,
            permissions,
            value,
        });
        (self.attributes.len() - 1) as u16
    }

    pub fn attributes(&self) -> &[ServiceAttribute] {
        &self.attributes
    }

    /// Number of attributes the service occupies once registered.
    pub fn attribute_count(&self) -> u32 {
        self.attributes.len() as u32
    }

    /// Checks the table shape an engine relies on: a leading service
    /// declaration, every characteristic declaration immediately followed
    /// by its value attribute, descriptors only after a value.
    pub fn validate(&self) -> GattResult<()> {
        let mut iter = self.attributes.iter().enumerate().peekable();

        match iter.next() {
            Some((_, ServiceAttribute::PrimaryServiceDeclaration { .. })) => {}
            _ => {
                return Err(GattError::InvalidServiceTableFormat(
                    "table must start with a service declaration".into(),
                ))
            }
        }

        let mut seen_value = false;
        while let Some((index, attr)) = iter.next() {
            match attr {
                ServiceAttribute::PrimaryServiceDeclaration { .. } => {
                    return Err(GattError::InvalidServiceTableFormat(format!(
                        "nested service declaration at offset {}",
                        index
                    )));
                }
                ServiceAttribute::CharacteristicDeclaration { value_uuid, .. } => {
                    match iter.peek() {
                        Some((_, ServiceAttribute::CharacteristicValue { value_uuid: vu, .. }))
                            if vu == value_uuid => {}
                        _ => {
                            return Err(GattError::InvalidServiceTableFormat(format!(
                                "declaration at offset {} has no matching value attribute",
                                index
                            )));
                        }
                    }
                }
                ServiceAttribute::CharacteristicValue { .. } => {
                    seen_value = true;
                }
                ServiceAttribute::Descriptor { .. } => {
                    if !seen_value {
                        return Err(GattError::InvalidServiceTableFormat(format!(
                            "descriptor at offset {} precedes any characteristic",
                            index
                        )));
                    }
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_group_len() {
        let group = AttributeHandleGroup::new(0x0010, 0x0015);
        assert_eq!(group.len(), 6);
        assert!(group.contains(0x0012));
        assert!(!group.contains(0x0016));

        let inverted = AttributeHandleGroup::new(0x0010, 0x000F);
        assert!(inverted.is_empty());
    }

    #[test]
    fn test_declaration_value_encoding() {
        let decl = ServiceAttribute::CharacteristicDeclaration {
            properties: CharacteristicProperties::new(CHAR_PROP_NOTIFY),
            value_uuid: Uuid::from_u16(0x2A31),
        };
        assert_eq!(
            decl.declaration_value(0x0025),
            Some(vec![0x10, 0x25, 0x00, 0x31, 0x2A])
        );

        let value = ServiceAttribute::CharacteristicValue {
            value_uuid: Uuid::from_u16(0x2A31),
            permissions: AttributePermissions::none(),
            max_length: 1,
        };
        assert!(value.declaration_value(0x0025).is_none());
    }

    #[test]
    fn test_table_validation() {
        let mut table = ServiceDefinition::primary(Uuid::from_u16(0x1813));
        table.push_characteristic(
            Uuid::from_u16(0x2A4F),
            CharacteristicProperties::new(CHAR_PROP_WRITE_WITHOUT_RESPONSE),
            AttributePermissions::write_only(),
            4,
        );
        assert!(table.validate().is_ok());

        let bare = ServiceDefinition {
            service_uuid: Uuid::from_u16(0x1813),
            attributes: vec![ServiceAttribute::Descriptor {
                descriptor_uuid: Uuid::from_u16(0x2902),
                permissions: AttributePermissions::read_write(),
                value: vec![0, 0],
            }],
        };
        assert!(bare.validate().is_err());
    }
}
