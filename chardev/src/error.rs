//! Error types for device operations.

/// Result type alias for device operations.
pub type Result<T> = std::result::Result<T, DeviceError>;

/// Device operation error.
///
/// End-of-data, buffer-full and partial transfers are not errors: they are
/// reported through the byte count returned by `read`/`write`. Only misuse
/// of the device surfaces here.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeviceError {
    /// The session was closed, or was opened on a different device.
    #[error("chardev: invalid session {session} (device {device})")]
    InvalidSession { device: u64, session: u64 },

    /// The device configuration cannot be used.
    #[error("chardev: invalid config: {0}")]
    InvalidConfig(String),
}
