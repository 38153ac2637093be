//! Unified error types for the panel firmware.
//!
//! A single `Error` enum that every subsystem converts into, keeping the
//! control loop's error handling uniform.  All variants are `Copy` so
//! they can be logged and passed around without allocation.
//!
//! Nothing here is fatal to the control loop: the query path reports
//! misconfiguration through [`PinState::NotReady`](crate::input::vpin::PinState)
//! and the driver logs hardware errors and keeps ticking.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The caller asked for something the wiring or table does not have.
    Config(ConfigError),
    /// A GPIO operation reported failure.
    Hardware(HardwareError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Hardware(e) => write!(f, "hardware: {e}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Virtual pin index is beyond the table limit.
    PinOutOfRange { index: usize },
    /// Virtual pin index is in range but nothing is wired to it.
    UnregisteredPin { index: usize },
    /// Edge-triggered read with no undelivered change.
    NotReady { index: usize },
    /// A bit vector handed to a chain has the wrong length.
    LengthMismatch { expected: usize, actual: usize },
    /// Chain length is zero, not a multiple of 8, or too large.
    ChainLength { bits: usize },
    /// A pin source points at a bit the input frame does not have.
    UnknownSource,
    /// A configuration field failed validation.
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PinOutOfRange { index } => write!(f, "virtual pin {index} out of range"),
            Self::UnregisteredPin { index } => write!(f, "virtual pin {index} not registered"),
            Self::NotReady { index } => write!(f, "virtual pin {index} has no new edge"),
            Self::LengthMismatch { expected, actual } => {
                write!(f, "bit vector length {actual}, chain expects {expected}")
            }
            Self::ChainLength { bits } => {
                write!(f, "chain length {bits} is not a non-zero multiple of 8 within limits")
            }
            Self::UnknownSource => write!(f, "pin source not present in input frame"),
            Self::Invalid(msg) => write!(f, "invalid: {msg}"),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Hardware errors
// ---------------------------------------------------------------------------

/// Only what the HAL or ADC driver can actually report.  A miswired or
/// unplugged chain reads back plausible garbage and never shows up here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HardwareError {
    /// Driving an output line failed.
    GpioWrite,
    /// Sampling an input line failed.
    GpioRead,
    /// An ADC conversion failed.
    AdcRead { channel: u8 },
}

impl fmt::Display for HardwareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GpioWrite => write!(f, "GPIO write failed"),
            Self::GpioRead => write!(f, "GPIO read failed"),
            Self::AdcRead { channel } => write!(f, "ADC channel {channel} read failed"),
        }
    }
}

impl From<HardwareError> for Error {
    fn from(e: HardwareError) -> Self {
        Self::Hardware(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
