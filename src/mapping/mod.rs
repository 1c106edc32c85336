//! Mapping module - resolves decoded input events to symbolic actions

pub mod config;
pub mod mapper;

pub use config::{Config, ConfigError, DeviceFilter, MappingConfig, Settings};
pub use mapper::{Action, EventMapper};
