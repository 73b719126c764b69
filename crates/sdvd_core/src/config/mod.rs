//! Configuration management for Simple DVD Creator.
//!
//! This module provides:
//! - TOML-based configuration with logical sections
//! - Atomic file writes (write to temp, then rename)
//! - Section-level updates (only changed section is modified)
//! - Validation on load with automatic defaults
//!
//! # Example
//!
//! ```no_run
//! use sdvd_core::config::{ConfigManager, ConfigSection};
//!
//! let mut config = ConfigManager::new(".config/simple-dvd.toml");
//! config.load_or_create().unwrap();
//!
//! println!("Workspace: {}", config.settings().paths.workdir);
//!
//! config.settings_mut().paths.last_input_path = "/videos/clip.mp4".into();
//! config.update_section(ConfigSection::Paths).unwrap();
//! ```

mod manager;
mod settings;

pub use manager::{ConfigError, ConfigManager, ConfigResult};
pub use settings::{
    BurnerEntry, ConfigSection, EncodingSettings, FallbackSettings, LoggingSettings,
    PathSettings, Settings, ToolEntry, ToolSettings,
};
