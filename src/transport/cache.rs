//! Last-seen device cache
//!
//! Remembers controllers that have successfully connected before so that
//! discovery can try them first after a restart or reconnect.

use crate::transport::DeviceIdentity;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

/// Cache file name
const CACHE_FILENAME: &str = "padbridge_devices.json";

/// Get the cache file path (in the same directory as the executable or current dir)
fn get_cache_path() -> PathBuf {
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            return exe_dir.join(CACHE_FILENAME);
        }
    }

    PathBuf::from(CACHE_FILENAME)
}

/// Cached device information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedDevice {
    pub vendor_id: u16,
    pub product_id: u16,

    /// Human-readable product name
    #[serde(default)]
    pub product: String,

    /// Last path the device was opened at
    #[serde(default)]
    pub path: String,

    /// Last seen timestamp (Unix timestamp)
    #[serde(default)]
    pub last_seen: u64,
}

/// Device cache storage
///
/// A cache created with `new` is memory-only and `save` is a no-op; `load`
/// binds it to the cache file on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeviceCache {
    /// Map of "vendor:product" -> device info
    pub devices: HashMap<String, CachedDevice>,

    #[serde(skip)]
    path: Option<PathBuf>,
}

fn cache_key(vendor_id: u16, product_id: u16) -> String {
    format!("{:04x}:{:04x}", vendor_id, product_id)
}

impl DeviceCache {
    /// Create a new empty, memory-only cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the cache from disk
    pub fn load() -> Self {
        let path = get_cache_path();

        let mut cache = match fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<DeviceCache>(&content) {
                Ok(cache) => {
                    debug!("Loaded device cache from: {}", path.display());
                    cache
                }
                Err(e) => {
                    warn!("Failed to parse device cache: {}", e);
                    Self::new()
                }
            },
            Err(_) => {
                debug!("No existing device cache at: {}", path.display());
                Self::new()
            }
        };

        cache.path = Some(path);
        cache
    }

    /// Save the cache to disk (no-op for memory-only caches)
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;

        debug!("Saved device cache to: {}", path.display());
        Ok(())
    }

    /// Add or refresh a device
    pub fn add_device(&mut self, identity: &DeviceIdentity) {
        let timestamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();

        let cached = CachedDevice {
            vendor_id: identity.vendor_id,
            product_id: identity.product_id,
            product: identity.product.clone(),
            path: identity.path.clone(),
            last_seen: timestamp,
        };

        info!(
            "Caching device: {} ({:04x}:{:04x})",
            identity.product, identity.vendor_id, identity.product_id
        );
        self.devices
            .insert(cache_key(identity.vendor_id, identity.product_id), cached);
    }

    /// Whether this identity has connected before
    pub fn contains(&self, identity: &DeviceIdentity) -> bool {
        self.devices
            .contains_key(&cache_key(identity.vendor_id, identity.product_id))
    }

    /// Get a cached device by ids
    pub fn get(&self, vendor_id: u16, product_id: u16) -> Option<&CachedDevice> {
        self.devices.get(&cache_key(vendor_id, product_id))
    }

    /// Number of cached devices
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}
