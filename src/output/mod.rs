//! Output state for the LED chains and the speaker.
//!
//! [`OutputFrame`] holds the target state of every output.  The control
//! loop edits it between ticks and the output adapter flushes all of it
//! each tick, changed or not.
//!
//! ## Flattened numbering
//!
//! ```text
//!  bank A │ bank B     │ bank C      │ speaker
//!  0..63  │ 64..127    │ 128..143    │ 144
//! ```

use heapless::Vec;

use crate::codec::{self, MAX_CHAIN_BITS};
use crate::config::PanelConfig;
use crate::error::{ConfigError, Result};

/// LEDs per resource bar graph.
pub const BAR_LEDS: usize = 20;

/// A shift-out chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputBank {
    A,
    B,
    C,
}

impl OutputBank {
    pub const ALL: [Self; 3] = [Self::A, Self::B, Self::C];

    pub const fn index(self) -> usize {
        self as usize
    }
}

// ───────────────────────────────────────────────────────────────
// Named outputs
// ───────────────────────────────────────────────────────────────

/// Single indicator LEDs, addressed by flattened output pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Indicator {
    Power,

    TempWarning,
    GeeWarning,
    WarpWarning,
    BrakeWarning,
    SasWarning,
    RcsWarning,
    GearWarning,
    CommsWarning,
    AltWarning,
    PitchWarning,

    Stage,
    Abort,

    /// Custom action group 1..=10.
    Cag(u8),

    SasStabilityAssist,
    SasManeuver,
    SasPrograde,
    SasRetrograde,
    SasNormal,
    SasAntiNormal,
    SasRadialIn,
    SasRadialOut,
    SasTarget,
    SasAntiTarget,
}

impl Indicator {
    /// Flattened output pin, or `None` for a CAG number outside 1..=10.
    pub const fn pin(self) -> Option<usize> {
        let pin = match self {
            Self::Power => 0,

            // B37..B46
            Self::TempWarning => 101,
            Self::GeeWarning => 102,
            Self::WarpWarning => 103,
            Self::BrakeWarning => 104,
            Self::SasWarning => 105,
            Self::RcsWarning => 106,
            Self::GearWarning => 107,
            Self::CommsWarning => 108,
            Self::AltWarning => 109,
            Self::PitchWarning => 110,

            Self::Stage => 111,
            Self::Abort => 113,

            Self::Cag(n) => {
                if n < 1 || n > 10 {
                    return None;
                }
                114 + n as usize
            }

            // B63, then C0..C8
            Self::SasStabilityAssist => 127,
            Self::SasManeuver => 128,
            Self::SasPrograde => 129,
            Self::SasRetrograde => 130,
            Self::SasNormal => 131,
            Self::SasAntiNormal => 132,
            Self::SasRadialIn => 133,
            Self::SasRadialOut => 134,
            Self::SasTarget => 135,
            Self::SasAntiTarget => 136,
        };
        Some(pin)
    }
}

/// Twenty-LED resource gauges, each a contiguous run of output pins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceBar {
    SolidFuel,
    LiquidFuel,
    Oxidizer,
    Monopropellant,
    Electricity,
}

impl ResourceBar {
    pub const ALL: [Self; 5] = [
        Self::SolidFuel,
        Self::LiquidFuel,
        Self::Oxidizer,
        Self::Monopropellant,
        Self::Electricity,
    ];

    /// Flattened pin of the bar's first LED.
    pub const fn first_pin(self) -> usize {
        1 + self as usize * BAR_LEDS
    }
}

/// Number of lit LEDs for a fill level, rounded to the nearest LED.
pub fn bar_lit_count(percent: u8) -> usize {
    (usize::from(percent.min(100)) * BAR_LEDS + 50) / 100
}

// ───────────────────────────────────────────────────────────────
// OutputFrame
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFrame {
    banks: [Vec<bool, MAX_CHAIN_BITS>; 3],
    speaker: bool,
}

impl OutputFrame {
    /// All-off frame sized from the configured output chains.
    pub fn new(config: &PanelConfig) -> Result<Self> {
        Self::with_lengths(
            config.output_a.length_bits,
            config.output_b.length_bits,
            config.output_c.length_bits,
        )
    }

    pub fn with_lengths(a_bits: usize, b_bits: usize, c_bits: usize) -> Result<Self> {
        Ok(Self {
            banks: [off_bank(a_bits)?, off_bank(b_bits)?, off_bank(c_bits)?],
            speaker: false,
        })
    }

    pub fn bank(&self, bank: OutputBank) -> &[bool] {
        &self.banks[bank.index()]
    }

    pub fn get(&self, bank: OutputBank, bit: usize) -> Option<bool> {
        self.banks[bank.index()].get(bit).copied()
    }

    pub fn set(&mut self, bank: OutputBank, bit: usize, on: bool) -> Result<()> {
        let slot = self.banks[bank.index()]
            .get_mut(bit)
            .ok_or(ConfigError::PinOutOfRange { index: bit })?;
        *slot = on;
        Ok(())
    }

    pub fn speaker(&self) -> bool {
        self.speaker
    }

    pub fn set_speaker(&mut self, on: bool) {
        self.speaker = on;
    }

    /// Bits across all chains, not counting the speaker.
    pub fn chain_bits(&self) -> usize {
        self.banks.iter().map(|b| b.len()).sum()
    }

    /// Flattened pin number of the speaker.
    pub fn speaker_pin(&self) -> usize {
        self.chain_bits()
    }

    /// Every flattened output pin, speaker included.
    pub fn pin_count(&self) -> usize {
        self.chain_bits() + 1
    }

    fn locate(&self, mut pin: usize) -> Option<(OutputBank, usize)> {
        for bank in OutputBank::ALL {
            let len = self.banks[bank.index()].len();
            if pin < len {
                return Some((bank, pin));
            }
            pin -= len;
        }
        None
    }

    /// LED at a flattened chain pin.  Never the speaker.
    fn led(&self, pin: usize) -> Option<bool> {
        let (bank, bit) = self.locate(pin)?;
        self.get(bank, bit)
    }

    fn set_led(&mut self, pin: usize, on: bool) -> Result<()> {
        let (bank, bit) = self
            .locate(pin)
            .ok_or(ConfigError::PinOutOfRange { index: pin })?;
        self.set(bank, bit, on)
    }

    pub fn get_flat(&self, pin: usize) -> Option<bool> {
        if pin == self.speaker_pin() {
            return Some(self.speaker);
        }
        self.led(pin)
    }

    pub fn set_flat(&mut self, pin: usize, on: bool) -> Result<()> {
        if pin == self.speaker_pin() {
            self.speaker = on;
            return Ok(());
        }
        self.set_led(pin, on)
    }

    /// Overwrite every chain bit in flattened order.  The speaker is left
    /// alone.
    pub fn set_all(&mut self, states: &[bool]) -> Result<()> {
        let expected = self.chain_bits();
        if states.len() != expected {
            return Err(ConfigError::LengthMismatch {
                expected,
                actual: states.len(),
            }
            .into());
        }
        let mut rest = states;
        for bank in &mut self.banks {
            let (head, tail) = rest.split_at(bank.len());
            bank.copy_from_slice(head);
            rest = tail;
        }
        Ok(())
    }

    /// Every chain bit to `on`.  The speaker is left alone.
    pub fn fill(&mut self, on: bool) {
        for bank in &mut self.banks {
            bank.iter_mut().for_each(|b| *b = on);
        }
    }

    /// Everything off, speaker included.
    pub fn clear(&mut self) {
        for bank in &mut self.banks {
            bank.iter_mut().for_each(|b| *b = false);
        }
        self.speaker = false;
    }

    /// `None` if the indicator's pin is past the configured chains.
    pub fn indicator(&self, indicator: Indicator) -> Option<bool> {
        self.led(indicator.pin()?)
    }

    /// Fails with `PinOutOfRange` if the chains are too short for the
    /// indicator; the speaker slot is never touched.
    pub fn set_indicator(&mut self, indicator: Indicator, on: bool) -> Result<()> {
        let pin = indicator
            .pin()
            .ok_or(ConfigError::Invalid("action group number must be 1..=10"))?;
        self.set_led(pin, on)
    }

    /// Set each LED of a bar, first element at the bar's first pin.
    pub fn set_bar(&mut self, bar: ResourceBar, states: &[bool; BAR_LEDS]) -> Result<()> {
        let first = bar.first_pin();
        if first + BAR_LEDS > self.chain_bits() {
            return Err(ConfigError::PinOutOfRange {
                index: first + BAR_LEDS - 1,
            }
            .into());
        }
        for (offset, on) in states.iter().enumerate() {
            self.set_led(first + offset, *on)?;
        }
        Ok(())
    }

    /// Light the bar from its first LED up to `percent` (clamped to 100).
    pub fn set_bar_level(&mut self, bar: ResourceBar, percent: u8) -> Result<()> {
        let lit = bar_lit_count(percent);
        let mut states = [false; BAR_LEDS];
        states[..lit].iter_mut().for_each(|s| *s = true);
        self.set_bar(bar, &states)
    }

    pub fn bar(&self, bar: ResourceBar) -> Option<[bool; BAR_LEDS]> {
        let mut states = [false; BAR_LEDS];
        for (offset, slot) in states.iter_mut().enumerate() {
            *slot = self.led(bar.first_pin() + offset)?;
        }
        Some(states)
    }
}

fn off_bank(len: usize) -> Result<Vec<bool, MAX_CHAIN_BITS>> {
    codec::check_chain_len(len)?;
    let mut bits = Vec::new();
    // Capacity checked above.
    let _ = bits.resize(len, false);
    Ok(bits)
}
