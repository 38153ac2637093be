//! Panel configuration parameters
//!
//! Timing, debounce and chain wiring for the control panel.  Defaults
//! match the production board; a host tool or NVS layer can carry an
//! override as JSON or postcard.

use serde::{Deserialize, Serialize};

use crate::codec::{self, BitOrder};
use crate::error::{ConfigError, Result};
use crate::input::DirectInput;
use crate::input::vpin::MAX_VIRTUAL_PINS;

/// Length and wire order of one shift-register chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Number of bits in the chain (8 per register).
    pub length_bits: usize,
    /// Which bit of each byte travels first.
    pub bit_order: BitOrder,
}

impl ChainConfig {
    pub const fn new(length_bits: usize, bit_order: BitOrder) -> Self {
        Self {
            length_bits,
            bit_order,
        }
    }
}

/// Core panel configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelConfig {
    // --- Timing ---
    /// Control loop period (milliseconds)
    pub tick_interval_ms: u32,
    /// Hold time for each phase of the shift-in load pulse (microseconds)
    pub shift_pulse_us: u32,

    // --- Debounce ---
    /// Quiet period for buttons and toggle switches (milliseconds)
    pub debounce_ms: u32,
    /// Quiet period for rotary selector positions (milliseconds)
    pub selector_debounce_ms: u32,

    // --- Analog ---
    /// Joystick push buttons read as pressed at or below this ADC value (0-1023)
    pub analog_button_threshold: u16,

    // --- Chains ---
    pub input_a: ChainConfig,
    pub input_b: ChainConfig,
    pub output_a: ChainConfig,
    pub output_b: ChainConfig,
    pub output_c: ChainConfig,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            // Timing
            tick_interval_ms: 10, // 100 Hz
            shift_pulse_us: 5,

            // Debounce
            debounce_ms: 50,
            selector_debounce_ms: 100, // rotary wipers cross neighbours

            // Analog
            analog_button_threshold: 50,

            // Chains
            input_a: ChainConfig::new(64, BitOrder::MsbFirst),
            input_b: ChainConfig::new(24, BitOrder::MsbFirst),
            output_a: ChainConfig::new(64, BitOrder::MsbFirst),
            output_b: ChainConfig::new(64, BitOrder::MsbFirst),
            output_c: ChainConfig::new(16, BitOrder::MsbFirst),
        }
    }
}

impl PanelConfig {
    /// Reject configurations the firmware cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::Invalid("tick_interval_ms must be > 0").into());
        }
        if self.shift_pulse_us < 5 {
            return Err(ConfigError::Invalid("shift_pulse_us must be >= 5").into());
        }
        if self.analog_button_threshold > 1023 {
            return Err(ConfigError::Invalid("analog_button_threshold exceeds 10-bit range").into());
        }
        for chain in [
            &self.input_a,
            &self.input_b,
            &self.output_a,
            &self.output_b,
            &self.output_c,
        ] {
            codec::check_chain_len(chain.length_bits)?;
        }
        if self.input_pin_count() > MAX_VIRTUAL_PINS {
            return Err(ConfigError::Invalid("input chains exceed the virtual pin table").into());
        }
        Ok(())
    }

    /// Virtual pins needed for every input: both chains plus the
    /// joystick push buttons.
    pub fn input_pin_count(&self) -> usize {
        self.input_a.length_bits + self.input_b.length_bits + DirectInput::ALL.len()
    }

    /// Parse and validate a JSON override.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|_| ConfigError::Invalid("malformed JSON config"))?;
        config.validate()?;
        Ok(config)
    }

    /// Compact encoding for flash storage.
    pub fn to_postcard(&self) -> Result<Vec<u8>> {
        postcard::to_allocvec(self).map_err(|_| ConfigError::Invalid("config encode failed").into())
    }

    /// Decode and validate a stored config.
    pub fn from_postcard(bytes: &[u8]) -> Result<Self> {
        let config: Self =
            postcard::from_bytes(bytes).map_err(|_| ConfigError::Invalid("corrupted stored config"))?;
        config.validate()?;
        Ok(config)
    }
}
