//! Gamepad report decoding
//!
//! This module turns raw fixed-length HID input reports into discrete,
//! edge-triggered events:
//! - Declarative report layout (byte offsets, masks, idle offsets)
//! - Trichotomous axis classification with deadzones
//! - Hat-switch and button-bitfield decoding
//! - The per-connection tracker state that makes events edge-triggered

pub mod decoder;
pub mod layout;
pub mod tracker;
pub mod types;

// Re-export commonly used items
pub use decoder::{decode_report, DecodeError};
pub use layout::{AxisSpec, ButtonSpec, HatSpec, IdleOrder, LayoutError, ReportLayout};
pub use tracker::{classify, TrackerState};
pub use types::{AxisClass, AxisId, InputEvent};
