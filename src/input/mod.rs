//! Raw input sampling model.
//!
//! Every tick the hardware adapter overwrites one [`InputFrame`]: a
//! [`RawBitVector`] per shift-in bank, the joystick push buttons derived
//! from analog thresholds, and the raw axis readings.  Virtual pins never
//! hold a reference into the frame; they carry a [`PinSource`] that is
//! resolved against the frame on each sample.
//!
//! ## Flattened numbering
//!
//! ```text
//!  bank A bits │ bank B bits │ direct inputs
//!  0 ..  lenA  │ .. +lenB    │ RotationButton, TranslationButton
//! ```

pub mod controls;
pub mod vpin;

use heapless::Vec;

use crate::codec::{self, MAX_CHAIN_BITS};
use crate::config::PanelConfig;
use crate::error::{ConfigError, Result};

/// Full-scale joystick reading.
pub const AXIS_MAX: u16 = 1023;

// ───────────────────────────────────────────────────────────────
// Banks
// ───────────────────────────────────────────────────────────────

/// A shift-in chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputBank {
    A,
    B,
}

impl InputBank {
    pub const ALL: [Self; 2] = [Self::A, Self::B];

    pub const fn index(self) -> usize {
        self as usize
    }
}

/// One scan of one chain.  Replaced wholesale, never patched bit by bit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBitVector {
    bits: Vec<bool, MAX_CHAIN_BITS>,
}

impl RawBitVector {
    /// All-off vector of `len` bits.
    pub fn new(len: usize) -> Result<Self> {
        codec::check_chain_len(len)?;
        let mut bits = Vec::new();
        // Capacity checked above.
        let _ = bits.resize(len, false);
        Ok(Self { bits })
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn get(&self, bit: usize) -> Option<bool> {
        self.bits.get(bit).copied()
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.bits
    }

    /// Overwrite every bit.  `bits` must have exactly this vector's length.
    pub fn replace(&mut self, bits: &[bool]) -> Result<()> {
        if bits.len() != self.bits.len() {
            return Err(ConfigError::LengthMismatch {
                expected: self.bits.len(),
                actual: bits.len(),
            }
            .into());
        }
        self.bits.copy_from_slice(bits);
        Ok(())
    }
}

// ───────────────────────────────────────────────────────────────
// Direct and analog inputs
// ───────────────────────────────────────────────────────────────

/// Buttons wired straight to an ADC line rather than a shift register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectInput {
    /// Rotation joystick push (EVA jump).
    RotationButton,
    /// Translation joystick push (enable look).
    TranslationButton,
}

impl DirectInput {
    pub const ALL: [Self; 2] = [Self::RotationButton, Self::TranslationButton];

    pub const fn index(self) -> usize {
        self as usize
    }

    /// ADC1 channel the button pulls low.
    pub const fn channel(self) -> u8 {
        match self {
            Self::RotationButton => crate::pins::ROTATION_BUTTON_ADC_CHANNEL,
            Self::TranslationButton => crate::pins::TRANSLATION_BUTTON_ADC_CHANNEL,
        }
    }
}

/// Analog axes, reported raw (0–1023) without debouncing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    RotationX,
    RotationY,
    RotationZ,
    TranslationX,
    TranslationY,
    TranslationZ,
    Throttle,
}

impl Axis {
    pub const ALL: [Self; 7] = [
        Self::RotationX,
        Self::RotationY,
        Self::RotationZ,
        Self::TranslationX,
        Self::TranslationY,
        Self::TranslationZ,
        Self::Throttle,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn channel(self) -> u8 {
        use crate::pins::*;
        match self {
            Self::RotationX => ROTATION_X_ADC_CHANNEL,
            Self::RotationY => ROTATION_Y_ADC_CHANNEL,
            Self::RotationZ => ROTATION_Z_ADC_CHANNEL,
            Self::TranslationX => TRANSLATION_X_ADC_CHANNEL,
            Self::TranslationY => TRANSLATION_Y_ADC_CHANNEL,
            Self::TranslationZ => TRANSLATION_Z_ADC_CHANNEL,
            Self::Throttle => THROTTLE_ADC_CHANNEL,
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Pin sources
// ───────────────────────────────────────────────────────────────

/// Where a virtual pin takes its raw value from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PinSource {
    Bank { bank: InputBank, bit: usize },
    Direct(DirectInput),
}

impl PinSource {
    pub const fn a(bit: usize) -> Self {
        Self::Bank {
            bank: InputBank::A,
            bit,
        }
    }

    pub const fn b(bit: usize) -> Self {
        Self::Bank {
            bank: InputBank::B,
            bit,
        }
    }
}

// ───────────────────────────────────────────────────────────────
// InputFrame
// ───────────────────────────────────────────────────────────────

/// Everything sampled in one tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFrame {
    banks: [RawBitVector; 2],
    direct: [bool; 2],
    axes: [u16; 7],
}

impl InputFrame {
    /// Empty frame sized from the configured input chains.
    pub fn new(config: &PanelConfig) -> Result<Self> {
        Self::with_lengths(config.input_a.length_bits, config.input_b.length_bits)
    }

    pub fn with_lengths(bank_a_bits: usize, bank_b_bits: usize) -> Result<Self> {
        Ok(Self {
            banks: [RawBitVector::new(bank_a_bits)?, RawBitVector::new(bank_b_bits)?],
            direct: [false; 2],
            axes: [0; 7],
        })
    }

    pub fn bank(&self, bank: InputBank) -> &RawBitVector {
        &self.banks[bank.index()]
    }

    pub fn bank_mut(&mut self, bank: InputBank) -> &mut RawBitVector {
        &mut self.banks[bank.index()]
    }

    pub fn direct(&self, input: DirectInput) -> bool {
        self.direct[input.index()]
    }

    pub fn set_direct(&mut self, input: DirectInput, pressed: bool) {
        self.direct[input.index()] = pressed;
    }

    pub fn axis(&self, axis: Axis) -> u16 {
        self.axes[axis.index()]
    }

    /// Store a raw reading, clamped to full scale.
    pub fn set_axis(&mut self, axis: Axis, raw: u16) {
        self.axes[axis.index()] = raw.min(AXIS_MAX);
    }

    /// Current raw value behind `source`, if the frame has that bit.
    pub fn resolve(&self, source: PinSource) -> Option<bool> {
        match source {
            PinSource::Bank { bank, bit } => self.bank(bank).get(bit),
            PinSource::Direct(input) => Some(self.direct(input)),
        }
    }

    /// Total number of addressable raw inputs.
    pub fn pin_count(&self) -> usize {
        self.banks.iter().map(RawBitVector::len).sum::<usize>() + DirectInput::ALL.len()
    }

    /// Flattened virtual pin number for `source`.
    pub fn flat_index(&self, source: PinSource) -> Option<usize> {
        match source {
            PinSource::Bank { bank, bit } => {
                if bit >= self.bank(bank).len() {
                    return None;
                }
                let offset: usize = InputBank::ALL[..bank.index()]
                    .iter()
                    .map(|b| self.bank(*b).len())
                    .sum();
                Some(offset + bit)
            }
            PinSource::Direct(input) => {
                let offset: usize = self.banks.iter().map(RawBitVector::len).sum();
                Some(offset + input.index())
            }
        }
    }

    /// Inverse of [`flat_index`](Self::flat_index).
    pub fn source_at(&self, mut flat: usize) -> Option<PinSource> {
        for bank in InputBank::ALL {
            let len = self.bank(bank).len();
            if flat < len {
                return Some(PinSource::Bank { bank, bit: flat });
            }
            flat -= len;
        }
        DirectInput::ALL.get(flat).map(|d| PinSource::Direct(*d))
    }
}
