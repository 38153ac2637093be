//! Serial-in / parallel-out chain driver (74HC595 family).
//!
//! Latch drops, every byte is clocked out from the last register's byte
//! to the first, then latch rises and all outputs update at once.  The
//! latch is never raised part way through a frame.

use embedded_hal::digital::OutputPin;

use crate::codec::{self, BitOrder};
use crate::config::ChainConfig;
use crate::error::{ConfigError, HardwareError, Result};

/// Anything that can latch a whole bit slice onto an output chain.
pub trait ShiftOut {
    fn len_bits(&self) -> usize;

    fn write(&mut self, bits: &[bool]) -> Result<()>;
}

pub struct ShiftOutChain<DATA, LATCH, CLK> {
    data: DATA,
    latch: LATCH,
    clock: CLK,
    len_bits: usize,
    order: BitOrder,
}

impl<DATA, LATCH, CLK> ShiftOutChain<DATA, LATCH, CLK>
where
    DATA: OutputPin,
    LATCH: OutputPin,
    CLK: OutputPin,
{
    pub fn new(data: DATA, latch: LATCH, clock: CLK, chain: ChainConfig) -> Result<Self> {
        codec::check_chain_len(chain.length_bits)?;
        Ok(Self {
            data,
            latch,
            clock,
            len_bits: chain.length_bits,
            order: chain.bit_order,
        })
    }

    pub fn len_bits(&self) -> usize {
        self.len_bits
    }

    /// Transmit `bits` and commit them to the register outputs.
    pub fn write(&mut self, bits: &[bool]) -> Result<()> {
        if bits.len() != self.len_bits {
            return Err(ConfigError::LengthMismatch {
                expected: self.len_bits,
                actual: bits.len(),
            }
            .into());
        }
        let bytes = codec::pack(bits)?;

        self.latch.set_low().map_err(|_| HardwareError::GpioWrite)?;
        for bit in codec::transmit_order(&bytes, self.order) {
            self.data
                .set_state(bit.into())
                .map_err(|_| HardwareError::GpioWrite)?;
            self.clock.set_high().map_err(|_| HardwareError::GpioWrite)?;
            self.clock.set_low().map_err(|_| HardwareError::GpioWrite)?;
        }
        self.latch.set_high().map_err(|_| HardwareError::GpioWrite)?;
        Ok(())
    }
}

impl<DATA, LATCH, CLK> ShiftOut for ShiftOutChain<DATA, LATCH, CLK>
where
    DATA: OutputPin,
    LATCH: OutputPin,
    CLK: OutputPin,
{
    fn len_bits(&self) -> usize {
        self.len_bits
    }

    fn write(&mut self, bits: &[bool]) -> Result<()> {
        ShiftOutChain::write(self, bits)
    }
}
