//! Kerbal control panel firmware library.
//!
//! Exposes the pure-logic modules (bit codec, virtual pin table, control
//! loop driver, output frame) for integration testing, along with the
//! embedded-hal chain drivers and adapters the binary wires together.
//! All ESP-IDF-specific code is guarded by `#[cfg(target_os = "espidf")]`
//! within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod codec;
pub mod config;
pub mod error;
pub mod input;
pub mod output;
pub mod pins;

pub mod adapters;
pub mod drivers;

pub use error::{ConfigError, Error, HardwareError, Result};
