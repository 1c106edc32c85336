//! Action dispatcher abstraction
//!
//! The pipeline hands every resolved action (and every unmapped event) to a
//! dispatcher. What happens next - logging, forwarding to a remote command
//! endpoint - is the dispatcher's business; the core stays agnostic.

pub mod channel;
pub mod logger;
pub mod mock;

pub use channel::{ChannelDispatcher, DispatchNotice};
pub use logger::LogDispatcher;
pub use mock::MockDispatcher;

use crate::gamepad::types::InputEvent;
use crate::mapping::mapper::Action;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Dispatch failed: {0}")]
    Failed(String),

    #[error("Dispatch channel disconnected")]
    Disconnected,
}

/// Receives resolved actions and "no mapping" notices
pub trait ActionDispatcher: Send {
    /// Deliver a resolved action
    fn dispatch(&self, action: &Action) -> Result<(), DispatchError>;

    /// Note an event that resolved to no action; normal, not an error
    fn no_mapping(&self, event: &InputEvent);
}
