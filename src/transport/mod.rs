//! Device I/O abstraction
//!
//! The decode pipeline only ever sees this contract: discovery returns
//! candidate device identities, `open` yields a push-based stream of raw
//! report buffers, and the stream ending (or erroring) means the device went
//! away. The real transport reads USB HID devices; the mock transport replays
//! scripted sessions for tests.

pub mod cache;
pub mod hid;
pub mod mock;

pub use cache::DeviceCache;
pub use hid::HidTransport;
pub use mock::{MockSession, MockTransport};

use futures::channel::mpsc::UnboundedReceiver;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("device discovery failed: {0}")]
    Discovery(String),

    #[error("failed to open device: {0}")]
    Open(String),

    #[error("report stream error: {0}")]
    Read(String),
}

/// Identity of one candidate input device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceIdentity {
    pub vendor_id: u16,
    pub product_id: u16,

    /// Human-readable product name
    pub product: String,

    /// Platform-specific path used to open the device
    pub path: String,
}

/// Push-based stream of raw reports; `None` means the device disconnected
pub type ReportStream = UnboundedReceiver<Result<Vec<u8>, TransportError>>;

/// An opened device handle
///
/// Dropping the handle (or calling `close`) stops the reader; the stream
/// then drains any buffered reports and ends.
pub struct OpenDevice {
    pub identity: DeviceIdentity,
    pub reports: ReportStream,
    stop: Arc<AtomicBool>,
}

impl OpenDevice {
    pub(crate) fn new(identity: DeviceIdentity, reports: ReportStream, stop: Arc<AtomicBool>) -> Self {
        Self {
            identity,
            reports,
            stop,
        }
    }

    /// Release the device; the reader stops at its next timeout tick
    pub fn close(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
    }
}

impl Drop for OpenDevice {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
    }
}

/// Contract the supervisor depends on, independent of a specific transport
pub trait DeviceTransport: Send {
    /// Enumerate currently attached candidate devices
    fn discover(&mut self) -> Result<Vec<DeviceIdentity>, TransportError>;

    /// Open a device by identity and start its report stream
    fn open(&mut self, identity: &DeviceIdentity) -> Result<OpenDevice, TransportError>;
}
