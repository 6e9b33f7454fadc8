//! Device configuration.

use serde::{Deserialize, Serialize};

use crate::cursor::{ReadExtent, ReadMode};
use crate::error::{DeviceError, Result};

/// Default buffer capacity in bytes.
pub const DEFAULT_CAPACITY: usize = 1024;

/// Default device name used in log output.
pub const DEFAULT_NAME: &str = "simple_driver";

/// Settings for a [`Device`](crate::Device).
///
/// Every field has a default, so an empty YAML/JSON document deserializes to
/// a 1024-byte device whose reads are clamped to the requested length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Name shown in log output.
    pub name: String,

    /// Buffer size in bytes. Must be greater than 0.
    pub capacity: usize,

    /// How much each read attempts to move.
    pub read_mode: ReadMode,

    /// Where reads stop.
    pub read_extent: ReadExtent,

    /// Limit the transfer primitive to this many bytes per call.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transfer_chunk: Option<usize>,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            capacity: DEFAULT_CAPACITY,
            read_mode: ReadMode::default(),
            read_extent: ReadExtent::default(),
            transfer_chunk: None,
        }
    }
}

impl DeviceConfig {
    /// Sets the capacity.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the read mode.
    pub fn with_read_mode(mut self, mode: ReadMode) -> Self {
        self.read_mode = mode;
        self
    }

    /// Sets the read extent.
    pub fn with_read_extent(mut self, extent: ReadExtent) -> Self {
        self.read_extent = extent;
        self
    }

    /// Sets the per-call transfer limit.
    pub fn with_transfer_chunk(mut self, chunk: usize) -> Self {
        self.transfer_chunk = Some(chunk);
        self
    }

    /// Checks that the configuration describes a usable device.
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(DeviceError::InvalidConfig(
                "capacity must be greater than 0".into(),
            ));
        }
        if self.transfer_chunk == Some(0) {
            return Err(DeviceError::InvalidConfig(
                "transfer_chunk must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = DeviceConfig::default();
        assert_eq!(cfg.capacity, 1024);
        assert_eq!(cfg.name, "simple_driver");
        assert_eq!(cfg.read_mode, ReadMode::Requested);
        assert_eq!(cfg.read_extent, ReadExtent::Capacity);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero() {
        assert!(DeviceConfig::default().with_capacity(0).validate().is_err());
        assert!(
            DeviceConfig::default()
                .with_transfer_chunk(0)
                .validate()
                .is_err()
        );
    }

    #[test]
    fn test_deserialize_partial() {
        let cfg: DeviceConfig =
            serde_json::from_str(r#"{"capacity": 64, "read_mode": "remainder"}"#).unwrap();
        assert_eq!(cfg.capacity, 64);
        assert_eq!(cfg.read_mode, ReadMode::Remainder);
        assert_eq!(cfg.read_extent, ReadExtent::Capacity);
        assert_eq!(cfg.name, DEFAULT_NAME);
    }

    #[test]
    fn test_serialize_skips_unset_chunk() {
        let json = serde_json::to_string(&DeviceConfig::default()).unwrap();
        assert!(!json.contains("transfer_chunk"));
        assert!(json.contains(r#""read_extent":"capacity""#));
    }
}
