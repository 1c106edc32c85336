//! Axis classification and per-connection tracker state
//!
//! The tracker holds the last-known logical state of every button and axis
//! for one connected device. Comparing against it is what makes the pipeline
//! edge-triggered: unchanged state produces no events, and resetting it on
//! reconnect is what prevents stuck buttons across sessions.

use crate::gamepad::types::{AxisClass, AxisId};
use std::collections::HashMap;

/// Classify a raw axis byte against a center and deadzone radius
///
/// The neutral band is open on both ends: a value exactly `deadzone` away
/// from the center already classifies as low/high.
pub fn classify(value: u8, center: u8, deadzone: u8) -> AxisClass {
    let value = value as i16;
    if value <= center as i16 - deadzone as i16 {
        AxisClass::Low
    } else if value >= center as i16 + deadzone as i16 {
        AxisClass::High
    } else {
        AxisClass::Neutral
    }
}

/// Last-known logical input state for one active connection
///
/// Created empty on connect and discarded (or `reset`) on every disconnect,
/// stream error, or stream end. A freshly (re)connected device is assumed to
/// start released/neutral regardless of what its last report said.
#[derive(Debug, Clone, Default)]
pub struct TrackerState {
    /// Pressed flags, button index -> bit
    pressed: u16,

    /// Last-known classification per axis; absent means neutral
    axes: HashMap<AxisId, AxisClass>,
}

impl TrackerState {
    /// Create an empty tracker (all buttons released, all axes neutral)
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset to the empty state
    pub fn reset(&mut self) {
        self.pressed = 0;
        self.axes.clear();
    }

    /// Whether a button is currently recorded as pressed
    pub fn is_pressed(&self, index: u8) -> bool {
        index < 16 && self.pressed & (1 << index) != 0
    }

    /// Record a button as pressed
    pub(crate) fn set_pressed(&mut self, index: u8) {
        self.pressed |= 1 << index;
    }

    /// Record a button as released
    pub(crate) fn clear_pressed(&mut self, index: u8) {
        self.pressed &= !(1 << index);
    }

    /// Last-known classification for an axis
    pub fn axis(&self, axis: AxisId) -> AxisClass {
        self.axes.get(&axis).copied().unwrap_or_default()
    }

    /// Store a new classification, returning `(prev, new)` if it changed
    ///
    /// State is updated unconditionally; the return value drives event
    /// emission only.
    pub(crate) fn transition(
        &mut self,
        axis: AxisId,
        new: AxisClass,
    ) -> Option<(AxisClass, AxisClass)> {
        let prev = self.axes.insert(axis, new).unwrap_or_default();
        if prev != new {
            Some((prev, new))
        } else {
            None
        }
    }
}
