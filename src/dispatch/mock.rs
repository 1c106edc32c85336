//! Mock dispatcher for testing
//!
//! Records every outcome so tests can assert exactly what the pipeline
//! produced, in order.

use crate::dispatch::{ActionDispatcher, DispatchError, DispatchNotice};
use crate::gamepad::types::InputEvent;
use crate::mapping::mapper::Action;
use std::sync::{Arc, Mutex};

/// Dispatcher that records outcomes instead of forwarding them
#[derive(Debug, Clone, Default)]
pub struct MockDispatcher {
    notices: Arc<Mutex<Vec<DispatchNotice>>>,
}

impl MockDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything recorded so far, in dispatch order
    pub fn notices(&self) -> Vec<DispatchNotice> {
        self.notices.lock().unwrap().clone()
    }

    /// Names of the recorded actions, in dispatch order
    pub fn action_names(&self) -> Vec<String> {
        self.notices
            .lock()
            .unwrap()
            .iter()
            .filter_map(|notice| match notice {
                DispatchNotice::Action(action) => Some(action.name.clone()),
                DispatchNotice::NoMapping(_) => None,
            })
            .collect()
    }

    /// Number of recorded outcomes
    pub fn len(&self) -> usize {
        self.notices.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ActionDispatcher for MockDispatcher {
    fn dispatch(&self, action: &Action) -> Result<(), DispatchError> {
        self.notices
            .lock()
            .unwrap()
            .push(DispatchNotice::Action(action.clone()));
        Ok(())
    }

    fn no_mapping(&self, event: &InputEvent) {
        self.notices
            .lock()
            .unwrap()
            .push(DispatchNotice::NoMapping(*event));
    }
}
