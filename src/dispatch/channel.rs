//! Channel dispatcher
//!
//! Forwards every outcome over a crossbeam channel so a consumer thread (a
//! remote-command forwarder, a recorder) can drain them off the supervisor's
//! task. The channel is bounded; a stalled consumer eventually fails
//! dispatches rather than growing without limit.

use crate::dispatch::{ActionDispatcher, DispatchError};
use crate::gamepad::types::InputEvent;
use crate::mapping::mapper::Action;
use crossbeam_channel::{Sender, TrySendError};

/// What went over the channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchNotice {
    Action(Action),
    NoMapping(InputEvent),
}

/// Dispatcher that forwards outcomes to a consumer thread
#[derive(Debug, Clone)]
pub struct ChannelDispatcher {
    sender: Sender<DispatchNotice>,
}

impl ChannelDispatcher {
    pub fn new(sender: Sender<DispatchNotice>) -> Self {
        Self { sender }
    }
}

impl ActionDispatcher for ChannelDispatcher {
    fn dispatch(&self, action: &Action) -> Result<(), DispatchError> {
        match self.sender.try_send(DispatchNotice::Action(action.clone())) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => {
                Err(DispatchError::Failed("consumer is not keeping up".into()))
            }
            Err(TrySendError::Disconnected(_)) => Err(DispatchError::Disconnected),
        }
    }

    fn no_mapping(&self, event: &InputEvent) {
        // Best effort; losing a "no mapping" notice is harmless
        let _ = self.sender.try_send(DispatchNotice::NoMapping(*event));
    }
}
