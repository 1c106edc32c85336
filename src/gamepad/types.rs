//! Core gamepad value types
//!
//! This module defines the basic data types shared by the decoders, the
//! tracker state, and the event mapper: axis identifiers, the three-valued
//! axis classification, and the input events the pipeline emits.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Logical axis identifier
///
/// `DpadX`/`DpadY` are produced by the hat-switch decoder; the remaining
/// identifiers name analog axis bytes in the report layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisId {
    LeftX,
    LeftY,
    RightX,
    RightY,
    DpadX,
    DpadY,
}

impl fmt::Display for AxisId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AxisId::LeftX => "left_x",
            AxisId::LeftY => "left_y",
            AxisId::RightX => "right_x",
            AxisId::RightY => "right_y",
            AxisId::DpadX => "dpad_x",
            AxisId::DpadY => "dpad_y",
        };
        f.write_str(name)
    }
}

/// Three-valued axis classification
///
/// No continuous magnitude is surfaced; the pipeline is built for discrete
/// actions, not motion control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisClass {
    Low,
    Neutral,
    High,
}

impl Default for AxisClass {
    fn default() -> Self {
        Self::Neutral
    }
}

/// A discrete input event produced by one report tick
///
/// Only rising button edges and axis class *changes* are ever materialized.
/// A button or axis that keeps its logical state across reports produces
/// nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// A button changed from released to pressed. `pressed` is always true:
    /// releases update tracker state but are never emitted.
    ButtonEdge { index: u8, pressed: bool },

    /// An axis moved between classifications (`from` != `to`).
    AxisTransition {
        axis: AxisId,
        from: AxisClass,
        to: AxisClass,
    },
}
