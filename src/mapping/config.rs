//! Configuration loader and validator
//!
//! Loads the report layout, accepted device identities, and the event
//! mappings from a TOML file and validates everything before the supervisor
//! is allowed to start.

use crate::gamepad::layout::{LayoutError, ReportLayout};
use crate::gamepad::types::AxisId;
use crate::transport::DeviceIdentity;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid report layout: {0}")]
    Layout(#[from] LayoutError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// General settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Wait between discovery attempts while no device matches (milliseconds)
    #[serde(default = "default_search_backoff")]
    pub search_backoff_ms: u64,

    /// Wait after a failed device open before searching again (milliseconds)
    #[serde(default = "default_connect_backoff")]
    pub connect_backoff_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            search_backoff_ms: default_search_backoff(),
            connect_backoff_ms: default_connect_backoff(),
        }
    }
}

fn default_search_backoff() -> u64 {
    3000
}

fn default_connect_backoff() -> u64 {
    1000
}

/// One accepted device identity
///
/// A device matches when its vendor id equals `vendor_id` and, if
/// `product_id` is set, its product id matches too.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DeviceFilter {
    pub vendor_id: u16,

    #[serde(default)]
    pub product_id: Option<u16>,
}

impl DeviceFilter {
    pub fn matches(&self, identity: &DeviceIdentity) -> bool {
        self.vendor_id == identity.vendor_id
            && self
                .product_id
                .map_or(true, |product| product == identity.product_id)
    }
}

/// Action names for the non-neutral classes of one axis
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AxisActions {
    #[serde(default)]
    pub low: Option<String>,

    #[serde(default)]
    pub high: Option<String>,
}

/// Symbolic action names, keyed by input
///
/// Button keys are the button index as a string. Absence of an entry is not
/// an error; the event is reported as unmapped instead of dispatched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MappingConfig {
    #[serde(default)]
    pub buttons: HashMap<String, String>,

    #[serde(default)]
    pub axes: HashMap<AxisId, AxisActions>,
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub settings: Settings,

    /// Accepted device identities
    #[serde(default)]
    pub devices: Vec<DeviceFilter>,

    /// Report layout of the expected controller
    pub layout: ReportLayout,

    #[serde(default)]
    pub mappings: MappingConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_ref = path.as_ref();
        info!("Loading configuration from: {}", path_ref.display());

        let content = std::fs::read_to_string(path_ref)?;
        let config: Config = toml::from_str(&content)?;

        info!("✓ Config parsed successfully");
        debug!("  - Device filters: {}", config.devices.len());
        debug!("  - Button mappings: {}", config.mappings.buttons.len());
        debug!("  - Axis mappings: {}", config.mappings.axes.len());

        config.validate()?;
        info!("✓ Config validation passed");

        Ok(config)
    }

    /// Load default configuration from configs/default.toml
    pub fn load_default() -> Result<Self, ConfigError> {
        Self::load("configs/default.toml")
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.layout.validate()?;

        if self.devices.is_empty() {
            return Err(ConfigError::Invalid(
                "At least one device filter is required".into(),
            ));
        }

        if self.settings.search_backoff_ms == 0 || self.settings.connect_backoff_ms == 0 {
            return Err(ConfigError::Invalid(
                "Backoff intervals must be greater than zero".into(),
            ));
        }

        // Button mapping keys must name real button indices
        for key in self.mappings.buttons.keys() {
            let index: u8 = key.parse().map_err(|_| {
                ConfigError::Invalid(format!("Button mapping key '{}' is not an index", key))
            })?;
            if index >= self.layout.buttons.count {
                return Err(ConfigError::Invalid(format!(
                    "Button mapping key '{}' is out of range (layout has {} buttons)",
                    key, self.layout.buttons.count
                )));
            }
        }

        // Axis mappings must refer to an axis the layout actually produces
        for axis in self.mappings.axes.keys() {
            let produced = match axis {
                AxisId::DpadX | AxisId::DpadY => self.layout.hat.is_some(),
                other => self.layout.axes.iter().any(|a| a.axis == *other),
            };
            if !produced {
                return Err(ConfigError::Invalid(format!(
                    "Axis mapping for '{}' has no source in the layout",
                    axis
                )));
            }
        }

        Ok(())
    }
}
