//! Parallel-in / serial-out chain driver (74HC165 family).
//!
//! ## Wire protocol
//!
//! ```text
//!  LOAD  ‾‾‾‾\____/‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾
//!             ≥5µs ≥5µs
//!  CLK   ____________/‾‾‾‾\_/‾‾\_/‾‾\_ ... _/‾‾‾‾‾‾‾‾
//!  CE    ‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾\___________ ... ______/‾‾
//!  DATA  ---------------- b0 | b1 | b2  ...  bN-1
//! ```
//!
//! The load pulse latches every parallel input.  Clock is raised *before*
//! clock-enable drops so the enable edge does not count as a shift.  Each
//! bit is sampled, then the rising clock edge moves the next one onto the
//! data line.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use crate::codec::{self, BitOrder, ChainBytes};
use crate::config::ChainConfig;
use crate::error::{ConfigError, HardwareError, Result};

/// Anything that can clock a whole input chain into a bit slice.
pub trait ShiftIn {
    fn len_bits(&self) -> usize;

    /// Fill `out` (exactly [`len_bits`](Self::len_bits) long) with one
    /// scan, or fail and leave it untouched.
    fn read_into<D: DelayNs>(&mut self, delay: &mut D, out: &mut [bool]) -> Result<()>;
}

pub struct ShiftInChain<DATA, CLK, CE, LOAD> {
    data: DATA,
    clock: CLK,
    clock_enable: CE,
    load: LOAD,
    len_bits: usize,
    order: BitOrder,
    pulse_us: u32,
}

impl<DATA, CLK, CE, LOAD> ShiftInChain<DATA, CLK, CE, LOAD>
where
    DATA: InputPin,
    CLK: OutputPin,
    CE: OutputPin,
    LOAD: OutputPin,
{
    /// Build a chain driver.  Fails if the configured length is not a
    /// non-zero multiple of 8; that is a wiring description error and
    /// the chain cannot be read at all.
    pub fn new(
        data: DATA,
        clock: CLK,
        clock_enable: CE,
        load: LOAD,
        chain: ChainConfig,
        pulse_us: u32,
    ) -> Result<Self> {
        codec::check_chain_len(chain.length_bits)?;
        Ok(Self {
            data,
            clock,
            clock_enable,
            load,
            len_bits: chain.length_bits,
            order: chain.bit_order,
            pulse_us,
        })
    }

    /// Number of inputs in the chain.
    pub fn len_bits(&self) -> usize {
        self.len_bits
    }

    /// Latch and clock in every register; one byte per register.
    pub fn read_bytes(&mut self, delay: &mut impl DelayNs) -> Result<ChainBytes> {
        // Latch parallel inputs.
        self.load.set_low().map_err(|_| HardwareError::GpioWrite)?;
        delay.delay_us(self.pulse_us);
        self.load.set_high().map_err(|_| HardwareError::GpioWrite)?;
        delay.delay_us(self.pulse_us);

        // Enable shifting.
        self.clock.set_high().map_err(|_| HardwareError::GpioWrite)?;
        self.clock_enable
            .set_low()
            .map_err(|_| HardwareError::GpioWrite)?;

        let mut bytes = ChainBytes::new();
        for _ in 0..self.len_bits / 8 {
            let mut wire = [false; 8];
            for slot in &mut wire {
                *slot = self.data.is_high().map_err(|_| HardwareError::GpioRead)?;
                self.clock.set_low().map_err(|_| HardwareError::GpioWrite)?;
                self.clock.set_high().map_err(|_| HardwareError::GpioWrite)?;
            }
            // Length validated in new().
            let _ = bytes.push(codec::deserialize_byte(wire, self.order));
        }

        self.clock_enable
            .set_high()
            .map_err(|_| HardwareError::GpioWrite)?;
        Ok(bytes)
    }

    /// Read the chain into `out`.  `out` is only written once every bit
    /// has been clocked in, so a failed read leaves it as it was.
    pub fn read_into(&mut self, delay: &mut impl DelayNs, out: &mut [bool]) -> Result<()> {
        if out.len() != self.len_bits {
            return Err(ConfigError::LengthMismatch {
                expected: self.len_bits,
                actual: out.len(),
            }
            .into());
        }
        let bytes = self.read_bytes(delay)?;
        codec::unpack(&bytes, out)
    }
}

impl<DATA, CLK, CE, LOAD> ShiftIn for ShiftInChain<DATA, CLK, CE, LOAD>
where
    DATA: InputPin,
    CLK: OutputPin,
    CE: OutputPin,
    LOAD: OutputPin,
{
    fn len_bits(&self) -> usize {
        self.len_bits
    }

    fn read_into<D: DelayNs>(&mut self, delay: &mut D, out: &mut [bool]) -> Result<()> {
        ShiftInChain::read_into(self, delay, out)
    }
}
