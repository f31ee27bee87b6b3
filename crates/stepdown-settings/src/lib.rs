//! # Stepdown Settings
//!
//! Persistent defaults for pass parameters and output style, read from a TOML
//! or JSON file in the platform config directory or an explicit path.

pub mod config;
pub mod error;

pub use config::{Config, OutputSettings, PassSettings};
pub use error::{SettingsError, SettingsResult};
