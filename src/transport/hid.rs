//! hidapi-backed device transport
//!
//! Reads reports on a dedicated thread: hidapi's blocking read with a short
//! timeout, checking a shared stop flag between reads, pushing each report
//! into the stream the supervisor consumes.

use crate::transport::{DeviceIdentity, DeviceTransport, OpenDevice, TransportError};
use futures::channel::mpsc;
use hidapi::HidApi;
use log::{debug, warn};
use std::ffi::CString;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

/// Read timeout per loop iteration (milliseconds); bounds shutdown latency
const READ_TIMEOUT_MS: i32 = 250;

/// Largest report we accept from a device
const REPORT_BUF_LEN: usize = 64;

/// Real HID transport over the hidapi library
pub struct HidTransport {
    api: HidApi,
}

impl HidTransport {
    pub fn new() -> Result<Self, TransportError> {
        let api = HidApi::new().map_err(|e| TransportError::Discovery(e.to_string()))?;
        Ok(Self { api })
    }
}

impl DeviceTransport for HidTransport {
    fn discover(&mut self) -> Result<Vec<DeviceIdentity>, TransportError> {
        self.api
            .refresh_devices()
            .map_err(|e| TransportError::Discovery(e.to_string()))?;

        let devices = self
            .api
            .device_list()
            .map(|info| DeviceIdentity {
                vendor_id: info.vendor_id(),
                product_id: info.product_id(),
                product: info.product_string().unwrap_or("Unknown").to_string(),
                path: info.path().to_string_lossy().into_owned(),
            })
            .collect();

        Ok(devices)
    }

    fn open(&mut self, identity: &DeviceIdentity) -> Result<OpenDevice, TransportError> {
        let path = CString::new(identity.path.as_bytes())
            .map_err(|e| TransportError::Open(format!("bad device path: {}", e)))?;
        let device = self
            .api
            .open_path(&path)
            .map_err(|e| TransportError::Open(e.to_string()))?;

        let (sender, receiver) = mpsc::unbounded();
        let stop = Arc::new(AtomicBool::new(false));
        let reader_stop = Arc::clone(&stop);
        let product = identity.product.clone();

        thread::Builder::new()
            .name("hid-reader".to_string())
            .spawn(move || {
                let mut buf = [0u8; REPORT_BUF_LEN];

                while !reader_stop.load(Ordering::SeqCst) {
                    match device.read_timeout(&mut buf, READ_TIMEOUT_MS) {
                        // Timeout tick, loop back to check the stop flag
                        Ok(0) => continue,
                        Ok(n) => {
                            if sender.unbounded_send(Ok(buf[..n].to_vec())).is_err() {
                                // Receiver gone, nobody is listening anymore
                                break;
                            }
                        }
                        Err(e) => {
                            warn!("{}: read error: {}", product, e);
                            let _ = sender.unbounded_send(Err(TransportError::Read(e.to_string())));
                            break;
                        }
                    }
                }

                debug!("HID reader for {} exited", product);
            })
            .map_err(|e| TransportError::Open(format!("failed to spawn reader: {}", e)))?;

        Ok(OpenDevice::new(identity.clone(), receiver, stop))
    }
}
