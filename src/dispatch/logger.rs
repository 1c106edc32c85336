//! Logging dispatcher
//!
//! Writes resolved actions to the log instead of forwarding them anywhere.
//! Unknown inputs are logged with enough detail to find the right mapping
//! key for them.

use crate::dispatch::{ActionDispatcher, DispatchError};
use crate::gamepad::types::InputEvent;
use crate::mapping::mapper::Action;
use log::info;

/// Dispatcher that logs actions instead of forwarding them
#[derive(Debug, Clone, Copy, Default)]
pub struct LogDispatcher;

impl LogDispatcher {
    pub fn new() -> Self {
        Self
    }
}

impl ActionDispatcher for LogDispatcher {
    fn dispatch(&self, action: &Action) -> Result<(), DispatchError> {
        info!("Action: {}", action.name);
        Ok(())
    }

    fn no_mapping(&self, event: &InputEvent) {
        // This helps find the index/axis to put in the mapping config
        match event {
            InputEvent::ButtonEdge { index, .. } => {
                info!("Unmapped button pressed. Index is: {}", index);
            }
            InputEvent::AxisTransition { axis, to, .. } => {
                info!("Unmapped axis input: {} -> {:?}", axis, to);
            }
        }
    }
}
