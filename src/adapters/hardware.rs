//! Hardware adapter: bridges the shift chains and ADC to the port traits.
//!
//! [`PanelInputs`] scans both input chains, thresholds the joystick push
//! buttons and reads the axes into an [`InputFrame`].  [`PanelOutputs`]
//! writes an [`OutputFrame`] to the three LED chains and the speaker
//! line.  This is the only module that drives the chains; everything it
//! holds is generic over embedded-hal, so the integration tests run it
//! against simulated registers.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::app::ports::{AnalogPort, InputPort, OutputPort};
use crate::codec::MAX_CHAIN_BITS;
use crate::config::{ChainConfig, PanelConfig};
use crate::drivers::shift_in::ShiftIn;
use crate::drivers::shift_out::ShiftOut;
use crate::error::{ConfigError, Error, HardwareError, Result};
use crate::input::{Axis, DirectInput, InputBank, InputFrame, RawBitVector};
use crate::output::{OutputBank, OutputFrame};

fn check_wiring(len_bits: usize, chain: &ChainConfig) -> Result<()> {
    if len_bits != chain.length_bits {
        return Err(ConfigError::LengthMismatch {
            expected: chain.length_bits,
            actual: len_bits,
        }
        .into());
    }
    Ok(())
}

// ───────────────────────────────────────────────────────────────
// Inputs
// ───────────────────────────────────────────────────────────────

/// Concrete [`InputPort`] over two shift-in chains and the ADC.
pub struct PanelInputs<A, B, ADC, D> {
    bank_a: A,
    bank_b: B,
    analog: ADC,
    delay: D,
    button_threshold: u16,
}

impl<A, B, ADC, D> PanelInputs<A, B, ADC, D>
where
    A: ShiftIn,
    B: ShiftIn,
    ADC: AnalogPort,
    D: DelayNs,
{
    /// Fails if a chain's length disagrees with `config`.
    pub fn new(bank_a: A, bank_b: B, analog: ADC, delay: D, config: &PanelConfig) -> Result<Self> {
        check_wiring(bank_a.len_bits(), &config.input_a)?;
        check_wiring(bank_b.len_bits(), &config.input_b)?;
        Ok(Self {
            bank_a,
            bank_b,
            analog,
            delay,
            button_threshold: config.analog_button_threshold,
        })
    }

    pub fn analog_mut(&mut self) -> &mut ADC {
        &mut self.analog
    }
}

/// Clock one chain into a stack buffer, then swap the bank's contents.
fn scan_chain<C: ShiftIn, D: DelayNs>(
    chain: &mut C,
    delay: &mut D,
    target: &mut RawBitVector,
) -> Result<()> {
    let len = chain.len_bits();
    if len > MAX_CHAIN_BITS {
        return Err(ConfigError::ChainLength { bits: len }.into());
    }
    let mut buf = [false; MAX_CHAIN_BITS];
    chain.read_into(delay, &mut buf[..len])?;
    target.replace(&buf[..len])
}

impl<A, B, ADC, D> InputPort for PanelInputs<A, B, ADC, D>
where
    A: ShiftIn,
    B: ShiftIn,
    ADC: AnalogPort,
    D: DelayNs,
{
    fn scan(&mut self, frame: &mut InputFrame) -> Result<()> {
        scan_chain(&mut self.bank_a, &mut self.delay, frame.bank_mut(InputBank::A))?;
        scan_chain(&mut self.bank_b, &mut self.delay, frame.bank_mut(InputBank::B))?;

        // Push buttons pull their line to ground.
        for input in DirectInput::ALL {
            let raw = self.analog.read_channel(input.channel())?;
            frame.set_direct(input, raw <= self.button_threshold);
        }
        for axis in Axis::ALL {
            frame.set_axis(axis, self.analog.read_channel(axis.channel())?);
        }
        Ok(())
    }
}

// ───────────────────────────────────────────────────────────────
// Outputs
// ───────────────────────────────────────────────────────────────

/// Concrete [`OutputPort`] over three shift-out chains and the speaker.
pub struct PanelOutputs<A, B, C, SPK> {
    bank_a: A,
    bank_b: B,
    bank_c: C,
    speaker: SPK,
}

impl<A, B, C, SPK> PanelOutputs<A, B, C, SPK>
where
    A: ShiftOut,
    B: ShiftOut,
    C: ShiftOut,
    SPK: OutputPin,
{
    /// Fails if a chain's length disagrees with `config`.
    pub fn new(bank_a: A, bank_b: B, bank_c: C, speaker: SPK, config: &PanelConfig) -> Result<Self> {
        check_wiring(bank_a.len_bits(), &config.output_a)?;
        check_wiring(bank_b.len_bits(), &config.output_b)?;
        check_wiring(bank_c.len_bits(), &config.output_c)?;
        Ok(Self {
            bank_a,
            bank_b,
            bank_c,
            speaker,
        })
    }
}

impl<A, B, C, SPK> OutputPort for PanelOutputs<A, B, C, SPK>
where
    A: ShiftOut,
    B: ShiftOut,
    C: ShiftOut,
    SPK: OutputPin,
{
    /// Every chain is written even if an earlier one fails; the first
    /// error is returned.
    fn flush(&mut self, frame: &OutputFrame) -> Result<()> {
        let a = self.bank_a.write(frame.bank(OutputBank::A));
        let b = self.bank_b.write(frame.bank(OutputBank::B));
        let c = self.bank_c.write(frame.bank(OutputBank::C));
        let speaker = self
            .speaker
            .set_state(frame.speaker().into())
            .map_err(|_| Error::from(HardwareError::GpioWrite));
        a.and(b).and(c).and(speaker)
    }
}
