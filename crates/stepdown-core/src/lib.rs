//! # Stepdown Core
//!
//! Core types shared by every stepdown crate.
//! Provides the error taxonomy used for parsing and configuration failures,
//! and the structured pass events published while passes are generated.

pub mod core;
pub mod error;

pub use self::core::{
    event::{EventDispatcher, PassEvent},
    listener::{PassListener, TracingListener},
};

pub use error::{ConfigError, Error, GcodeError, Result};
