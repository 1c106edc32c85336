//! Mock transport for testing
//!
//! Replays scripted sessions instead of touching real hardware. Each call to
//! `open` consumes one session: its reports are delivered in order, then the
//! stream either ends cleanly (disconnect) or with the scripted error.

use crate::transport::{DeviceIdentity, DeviceTransport, OpenDevice, TransportError};
use futures::channel::mpsc;
use std::collections::VecDeque;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// One scripted device session
#[derive(Debug, Clone, Default)]
pub struct MockSession {
    /// Reports delivered in order
    pub reports: Vec<Vec<u8>>,

    /// When set, the stream ends with this error instead of a clean end
    pub error: Option<String>,
}

impl MockSession {
    pub fn new(reports: Vec<Vec<u8>>) -> Self {
        Self {
            reports,
            error: None,
        }
    }

    pub fn with_error(reports: Vec<Vec<u8>>, error: &str) -> Self {
        Self {
            reports,
            error: Some(error.to_string()),
        }
    }
}

/// Scripted transport; discovery reports the device only while sessions remain
pub struct MockTransport {
    identity: DeviceIdentity,
    sessions: VecDeque<MockSession>,
    open_failures: usize,
    opens: usize,
}

impl MockTransport {
    pub fn new(identity: DeviceIdentity, sessions: Vec<MockSession>) -> Self {
        Self {
            identity,
            sessions: sessions.into(),
            open_failures: 0,
            opens: 0,
        }
    }

    /// Fail the next `count` open attempts before serving sessions
    pub fn with_open_failures(mut self, count: usize) -> Self {
        self.open_failures = count;
        self
    }

    /// Number of successful opens so far
    pub fn opens(&self) -> usize {
        self.opens
    }

    /// A stand-in identity for tests
    pub fn test_identity() -> DeviceIdentity {
        DeviceIdentity {
            vendor_id: 1133,
            product_id: 0xC216,
            product: "Mock Gamepad".to_string(),
            path: "mock:0".to_string(),
        }
    }
}

impl DeviceTransport for MockTransport {
    fn discover(&mut self) -> Result<Vec<DeviceIdentity>, TransportError> {
        if self.sessions.is_empty() && self.open_failures == 0 {
            // Nothing left to serve; the device has "gone away"
            return Ok(Vec::new());
        }
        Ok(vec![self.identity.clone()])
    }

    fn open(&mut self, identity: &DeviceIdentity) -> Result<OpenDevice, TransportError> {
        if self.open_failures > 0 {
            self.open_failures -= 1;
            return Err(TransportError::Open("scripted open failure".to_string()));
        }

        let session = self
            .sessions
            .pop_front()
            .ok_or_else(|| TransportError::Open("no scripted sessions left".to_string()))?;
        self.opens += 1;

        let (sender, receiver) = mpsc::unbounded();
        for report in session.reports {
            let _ = sender.unbounded_send(Ok(report));
        }
        if let Some(error) = session.error {
            let _ = sender.unbounded_send(Err(TransportError::Read(error)));
        }
        // Dropping the sender ends the stream after the buffered items drain

        Ok(OpenDevice::new(
            identity.clone(),
            receiver,
            Arc::new(AtomicBool::new(false)),
        ))
    }
}
