//! GAP types shared across the profile layer.

pub mod types;

pub use self::types::BdAddr;
