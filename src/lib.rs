//! Padbridge: HID gamepad to symbolic action bridge
//!
//! This library decodes fixed-length HID gamepad reports into discrete,
//! edge-triggered events (button presses, axis state transitions), maps them
//! to symbolic actions via configuration, and supervises the device
//! connection so the pipeline survives disconnects.

pub mod dispatch;
pub mod gamepad;
pub mod mapping;
pub mod supervisor;
pub mod transport;

// Re-export commonly used items
pub use gamepad::{decode_report, AxisClass, AxisId, InputEvent, ReportLayout, TrackerState};
pub use mapping::{Action, Config, EventMapper};
pub use supervisor::{Supervisor, SupervisorState};
pub use transport::{DeviceIdentity, DeviceTransport};
