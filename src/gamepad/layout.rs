//! Declarative report layout
//!
//! Every supported controller hardcodes the same kind of byte arithmetic:
//! which byte holds which axis, where the button bits live, what "no buttons
//! pressed" reads as. This module captures all of that as data so a new
//! controller is a configuration change, not a code change.

use crate::gamepad::types::AxisId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("report_len must be at least 1")]
    EmptyReport,

    #[error("axis {axis} offset {offset} is outside the {report_len}-byte report")]
    AxisOffsetOutOfRange {
        axis: AxisId,
        offset: usize,
        report_len: usize,
    },

    #[error("axis {axis}: deadzone {deadzone} must be smaller than center {center}")]
    DeadzoneTooWide {
        axis: AxisId,
        center: u8,
        deadzone: u8,
    },

    #[error("axis {axis}: center {center} + deadzone {deadzone} exceeds 255")]
    CenterTooHigh {
        axis: AxisId,
        center: u8,
        deadzone: u8,
    },

    #[error("axis {0} is declared more than once")]
    DuplicateAxis(AxisId),

    #[error("axis {0} is reserved for the hat switch when a hat is configured")]
    ReservedAxis(AxisId),

    #[error("button byte offset {offset} is outside the {report_len}-byte report")]
    ButtonOffsetOutOfRange { offset: usize, report_len: usize },

    #[error("button shift {0} must be below 16")]
    ShiftTooLarge(u32),

    #[error("button count {0} must be between 1 and 16")]
    BadButtonCount(u8),

    #[error("hat offset {offset} is outside the {report_len}-byte report")]
    HatOffsetOutOfRange { offset: usize, report_len: usize },

    #[error("hat mask must not be zero")]
    ZeroHatMask,
}

/// Where one analog axis lives in the report
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AxisSpec {
    /// Logical axis this byte feeds
    pub axis: AxisId,

    /// Byte offset in the report
    pub offset: usize,

    /// Rest value of the axis
    #[serde(default = "default_center")]
    pub center: u8,

    /// Tolerance band radius around the center
    #[serde(default = "default_deadzone")]
    pub deadzone: u8,
}

fn default_center() -> u8 {
    128
}

fn default_deadzone() -> u8 {
    50
}

/// Whether idle-offset subtraction happens before or after the low-byte mask
///
/// Both orderings exist in real devices and they do not commute, so the
/// layout has to say which one it means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdleOrder {
    /// Subtract the idle offset from the raw composed word, then mask.
    BeforeMask,
    /// Mask the low byte, compose, then subtract the idle offset.
    AfterMask,
}

impl Default for IdleOrder {
    fn default() -> Self {
        Self::AfterMask
    }
}

/// Where the button bitfield lives and how to normalize it
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ButtonSpec {
    /// Byte offset of the low button byte
    pub offset: usize,

    /// Optional second byte, composed as `low | (high << 8)`
    #[serde(default)]
    pub high_offset: Option<usize>,

    /// Mask applied to the low byte (0xF0 when a hat occupies the low nibble)
    #[serde(default = "default_mask")]
    pub mask: u8,

    /// Right shift so logical button 0 lands on bit 0
    #[serde(default)]
    pub shift: u32,

    /// Raw value this device reports when no buttons are pressed
    #[serde(default)]
    pub idle_offset: u16,

    /// Declared order of idle subtraction relative to masking
    #[serde(default)]
    pub idle_order: IdleOrder,

    /// Number of logical buttons
    #[serde(default = "default_button_count")]
    pub count: u8,
}

fn default_mask() -> u8 {
    0xFF
}

fn default_button_count() -> u8 {
    12
}

/// Where the hat switch lives in the report
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HatSpec {
    /// Byte offset of the hat byte
    pub offset: usize,

    /// Bits holding the hat value (default: the low nibble)
    #[serde(default = "default_hat_mask")]
    pub mask: u8,
}

fn default_hat_mask() -> u8 {
    0x0F
}

/// Complete description of where each logical input lives in a raw report
///
/// Loaded once and validated before any decoding happens; the decode path
/// trusts a validated layout and never re-checks geometry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportLayout {
    /// Minimum byte length of a report; shorter reports are truncated
    pub report_len: usize,

    /// Analog axes, in the order their transitions should be emitted
    #[serde(default)]
    pub axes: Vec<AxisSpec>,

    /// Button bitfield
    pub buttons: ButtonSpec,

    /// Optional hat switch, decoded into `dpad_x`/`dpad_y`
    #[serde(default)]
    pub hat: Option<HatSpec>,
}

impl ReportLayout {
    /// Validate the layout geometry
    ///
    /// An invalid layout is fatal at load time; a layout where the deadzone
    /// reaches the center (or past 255) would classify every byte as
    /// non-neutral or never leave neutral.
    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.report_len == 0 {
            return Err(LayoutError::EmptyReport);
        }

        let mut seen = HashSet::new();
        for axis in &self.axes {
            if axis.offset >= self.report_len {
                return Err(LayoutError::AxisOffsetOutOfRange {
                    axis: axis.axis,
                    offset: axis.offset,
                    report_len: self.report_len,
                });
            }
            if axis.deadzone >= axis.center {
                return Err(LayoutError::DeadzoneTooWide {
                    axis: axis.axis,
                    center: axis.center,
                    deadzone: axis.deadzone,
                });
            }
            if axis.center as u16 + axis.deadzone as u16 > 255 {
                return Err(LayoutError::CenterTooHigh {
                    axis: axis.axis,
                    center: axis.center,
                    deadzone: axis.deadzone,
                });
            }
            if !seen.insert(axis.axis) {
                return Err(LayoutError::DuplicateAxis(axis.axis));
            }
            if self.hat.is_some() && matches!(axis.axis, AxisId::DpadX | AxisId::DpadY) {
                return Err(LayoutError::ReservedAxis(axis.axis));
            }
        }

        let buttons = &self.buttons;
        if buttons.offset >= self.report_len {
            return Err(LayoutError::ButtonOffsetOutOfRange {
                offset: buttons.offset,
                report_len: self.report_len,
            });
        }
        if let Some(high) = buttons.high_offset {
            if high >= self.report_len {
                return Err(LayoutError::ButtonOffsetOutOfRange {
                    offset: high,
                    report_len: self.report_len,
                });
            }
        }
        if buttons.shift >= 16 {
            return Err(LayoutError::ShiftTooLarge(buttons.shift));
        }
        if buttons.count == 0 || buttons.count > 16 {
            return Err(LayoutError::BadButtonCount(buttons.count));
        }

        if let Some(hat) = &self.hat {
            if hat.offset >= self.report_len {
                return Err(LayoutError::HatOffsetOutOfRange {
                    offset: hat.offset,
                    report_len: self.report_len,
                });
            }
            if hat.mask == 0 {
                return Err(LayoutError::ZeroHatMask);
            }
        }

        Ok(())
    }
}
