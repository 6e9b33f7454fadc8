//! The shared device and its sessions.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::accounting::SessionAccounting;
use crate::config::DeviceConfig;
use crate::cursor::{self, ReadExtent};
use crate::error::{DeviceError, Result};
use crate::store::ByteStore;
use crate::transfer::{ChunkedCopy, SliceCopy, Transfer};

static NEXT_DEVICE_ID: AtomicU64 = AtomicU64::new(1);

/// A fixed-capacity byte device with open/read/write/close semantics.
///
/// The device owns one buffer, one write cursor shared by every session,
/// and the open/close counters. All of it sits behind a single lock, so
/// operations from different threads are serialized. `Device` is cheap to
/// clone; clones share the same state.
///
/// # Semantics
///
/// - **Open**: always succeeds, returns a [`Session`] reading from offset 0
/// - **Read**: moves bytes from the session's read offset; `0` means end of data
/// - **Write**: appends at `offset + write_cursor`; `0` means the device is full
/// - **Close**: consumes the session; it can no longer be used
///
/// # Example
///
/// ```
/// use chardev::{Device, DeviceConfig};
///
/// let dev = Device::new(DeviceConfig::default()).unwrap();
/// let writer = dev.open();
/// assert_eq!(dev.write(&writer, b"hello", 0).unwrap(), 5);
/// dev.close(writer).unwrap();
///
/// let mut reader = dev.open();
/// let mut buf = [0u8; 5];
/// assert_eq!(dev.read(&mut reader, &mut buf).unwrap(), 5);
/// assert_eq!(&buf, b"hello");
/// ```
pub struct Device {
    inner: Arc<DeviceInner>,
}

struct DeviceInner {
    id: u64,
    config: DeviceConfig,
    state: Mutex<DeviceState>,
}

struct DeviceState {
    store: ByteStore,
    write_cursor: usize,
    accounting: SessionAccounting,
    live: HashSet<u64>,
    next_session: u64,
    transfer: Box<dyn Transfer>,
}

/// A caller's handle on an open device.
///
/// Carries the caller's own read offset. Sessions are not `Clone`; closing
/// one consumes it.
#[derive(Debug)]
pub struct Session {
    device: u64,
    id: u64,
    read_offset: usize,
}

impl Session {
    /// Returns the session id, unique within its device.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Returns the offset of the next byte this session will read.
    pub fn read_offset(&self) -> usize {
        self.read_offset
    }
}

/// Point-in-time view of a device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceStats {
    pub name: String,
    pub capacity: usize,
    pub write_cursor: usize,
    pub open_count: u64,
    pub close_count: u64,
    pub live_sessions: usize,
}

impl Clone for Device {
    fn clone(&self) -> Self {
        Device {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl Default for Device {
    fn default() -> Self {
        Self::build(DeviceConfig::default(), Box::new(SliceCopy))
    }
}

impl fmt::Debug for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Device")
            .field("id", &self.inner.id)
            .field("name", &self.inner.config.name)
            .field("capacity", &self.inner.config.capacity)
            .finish_non_exhaustive()
    }
}

impl Device {
    /// Creates a device from `config`.
    ///
    /// The transfer primitive is [`SliceCopy`], or [`ChunkedCopy`] when
    /// `config.transfer_chunk` is set.
    pub fn new(config: DeviceConfig) -> Result<Self> {
        let transfer: Box<dyn Transfer> = match config.transfer_chunk {
            Some(chunk) => Box::new(ChunkedCopy::new(chunk)),
            None => Box::new(SliceCopy),
        };
        Self::with_transfer(config, transfer)
    }

    /// Creates a device using a caller-supplied transfer primitive.
    pub fn with_transfer(config: DeviceConfig, transfer: Box<dyn Transfer>) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config, transfer))
    }

    fn build(config: DeviceConfig, transfer: Box<dyn Transfer>) -> Self {
        let id = NEXT_DEVICE_ID.fetch_add(1, Ordering::Relaxed);
        info!(device = %config.name, id, capacity = config.capacity, "initializing device");
        Device {
            inner: Arc::new(DeviceInner {
                id,
                state: Mutex::new(DeviceState {
                    store: ByteStore::new(config.capacity),
                    write_cursor: 0,
                    accounting: SessionAccounting::new(),
                    live: HashSet::new(),
                    next_session: 1,
                    transfer,
                }),
                config,
            }),
        }
    }

    /// Returns the process-unique device id.
    pub fn id(&self) -> u64 {
        self.inner.id
    }

    /// Returns the device name.
    pub fn name(&self) -> &str {
        &self.inner.config.name
    }

    /// Returns the device configuration.
    pub fn config(&self) -> &DeviceConfig {
        &self.inner.config
    }

    /// Returns the buffer capacity.
    pub fn capacity(&self) -> usize {
        self.inner.config.capacity
    }

    /// Returns the offset of the next byte to be written.
    pub fn write_cursor(&self) -> usize {
        self.inner.state.lock().write_cursor
    }

    /// Returns a copy of the open/close counters.
    pub fn accounting(&self) -> SessionAccounting {
        self.inner.state.lock().accounting
    }

    /// Returns a snapshot of the device state.
    pub fn stats(&self) -> DeviceStats {
        let state = self.inner.state.lock();
        DeviceStats {
            name: self.inner.config.name.clone(),
            capacity: self.inner.config.capacity,
            write_cursor: state.write_cursor,
            open_count: state.accounting.opens(),
            close_count: state.accounting.closes(),
            live_sessions: state.live.len(),
        }
    }

    /// Returns a copy of the written bytes, `[0, write_cursor)`.
    pub fn contents(&self) -> Vec<u8> {
        let state = self.inner.state.lock();
        state.store.prefix(state.write_cursor).to_vec()
    }

    /// Opens a new session with its read offset at 0.
    pub fn open(&self) -> Session {
        let mut state = self.inner.state.lock();
        let opens = state.accounting.record_open();
        let id = state.next_session;
        state.next_session = state.next_session.wrapping_add(1);
        state.live.insert(id);
        info!(device = %self.inner.config.name, session = id, opens, "opening device");
        Session {
            device: self.inner.id,
            id,
            read_offset: 0,
        }
    }

    /// Reads into `dst` from the session's read offset.
    ///
    /// Returns the number of bytes moved and advances the session's offset
    /// by that much. `Ok(0)` means end of data. The count can be smaller
    /// than asked for when the transfer stops short.
    pub fn read(&self, session: &mut Session, dst: &mut [u8]) -> Result<usize> {
        let mut state = self.inner.state.lock();
        self.check(&state, session)?;

        let extent = match self.inner.config.read_extent {
            ReadExtent::Capacity => self.inner.config.capacity,
            ReadExtent::Written => state.write_cursor,
        };
        let Some(span) =
            cursor::plan_read(session.read_offset, extent, dst.len(), self.inner.config.read_mode)
        else {
            debug!(device = %self.inner.config.name, session = session.id, "reached the end of the device");
            return Ok(0);
        };

        let DeviceState {
            store, transfer, ..
        } = &mut *state;
        let moved = store.transfer_out(span.at, span.len, dst, transfer.as_mut());
        if moved < span.len {
            debug!(
                device = %self.inner.config.name,
                session = session.id,
                attempted = span.len,
                moved,
                "partial read transfer"
            );
        }
        session.read_offset += moved;
        debug!(
            device = %self.inner.config.name,
            session = session.id,
            bytes = moved,
            offset = session.read_offset,
            "reading"
        );
        Ok(moved)
    }

    /// Writes `src` at `offset` past the shared write cursor.
    ///
    /// Returns the number of bytes moved and advances the write cursor by
    /// that much; `offset` itself is left to the caller. `Ok(0)` means the
    /// device is out of space.
    pub fn write(&self, session: &Session, src: &[u8], offset: usize) -> Result<usize> {
        let mut state = self.inner.state.lock();
        self.check(&state, session)?;

        let span = cursor::plan_write(
            state.write_cursor,
            offset,
            src.len(),
            self.inner.config.capacity,
        );
        let moved = if span.is_empty() {
            0
        } else {
            let DeviceState {
                store, transfer, ..
            } = &mut *state;
            store.transfer_in(span.at, &src[..span.len], transfer.as_mut())
        };

        if moved == 0 {
            warn!(device = %self.inner.config.name, session = session.id, "device is out of space");
            return Ok(0);
        }
        if moved < span.len {
            debug!(
                device = %self.inner.config.name,
                session = session.id,
                attempted = span.len,
                moved,
                "partial write transfer"
            );
        }
        state.write_cursor += moved;
        debug!(
            device = %self.inner.config.name,
            session = session.id,
            bytes = moved,
            write_cursor = state.write_cursor,
            "writing"
        );
        Ok(moved)
    }

    /// Closes a session.
    ///
    /// Fails without touching the counters if the session does not belong
    /// to this device.
    pub fn close(&self, session: Session) -> Result<()> {
        let mut state = self.inner.state.lock();
        self.check(&state, &session)?;
        state.live.remove(&session.id);
        let closes = state.accounting.record_close();
        info!(device = %self.inner.config.name, session = session.id, closes, "closing device");
        Ok(())
    }

    fn check(&self, state: &DeviceState, session: &Session) -> Result<()> {
        if session.device != self.inner.id || !state.live.contains(&session.id) {
            return Err(DeviceError::InvalidSession {
                device: session.device,
                session: session.id,
            });
        }
        Ok(())
    }
}
