//! A fixed-capacity shared byte device.
//!
//! This crate models a minimal character device at user level: one buffer
//! of fixed capacity, opened by any number of callers, each reading with
//! its own cursor while all of them append through one shared write cursor.
//!
//! - [`ByteStore`]: the fixed-size backing array
//! - [`cursor`]: pure read/write arithmetic
//! - [`Transfer`]: the copy primitive, which may stop short
//! - [`Device`]: open/read/write/close over a single lock
//! - [`SessionAccounting`]: open and close counters
//!
//! # Reading and writing
//!
//! Neither call fails when the device runs out of data or space; both return
//! `Ok(0)` instead, and both may return fewer bytes than asked for. Callers
//! loop until they see a zero count.
//!
//! ```
//! use chardev::{Device, DeviceConfig, ReadExtent};
//!
//! let dev = Device::new(DeviceConfig::default().with_read_extent(ReadExtent::Written)).unwrap();
//! let mut session = dev.open();
//! dev.write(&session, b"hello", 0).unwrap();
//!
//! let mut out = Vec::new();
//! let mut chunk = [0u8; 2];
//! loop {
//!     let n = dev.read(&mut session, &mut chunk).unwrap();
//!     if n == 0 {
//!         break;
//!     }
//!     out.extend_from_slice(&chunk[..n]);
//! }
//! assert_eq!(out, b"hello");
//! dev.close(session).unwrap();
//! ```
//!
//! # Process-wide device
//!
//! [`global()`] returns a single device living for the rest of the process,
//! created on first use. [`init_global()`] creates it from a specific
//! configuration; once the device exists, later configurations are ignored.

mod accounting;
mod config;
pub mod cursor;
mod device;
mod error;
mod store;
mod transfer;

use once_cell::sync::OnceCell;

pub use accounting::SessionAccounting;
pub use config::{DEFAULT_CAPACITY, DEFAULT_NAME, DeviceConfig};
pub use cursor::{ReadExtent, ReadMode};
pub use device::{Device, DeviceStats, Session};
pub use error::{DeviceError, Result};
pub use store::ByteStore;
pub use transfer::{ChunkedCopy, SliceCopy, Transfer};

static GLOBAL: OnceCell<Device> = OnceCell::new();

/// Returns the process-wide device, creating it with defaults if needed.
pub fn global() -> &'static Device {
    GLOBAL.get_or_init(Device::default)
}

/// Creates the process-wide device from `config`.
///
/// Returns the existing device unchanged if one was already created.
pub fn init_global(config: DeviceConfig) -> Result<&'static Device> {
    GLOBAL.get_or_try_init(|| Device::new(config))
}
