//! Shift-register bit codec.
//!
//! Pure packing and wire-order logic shared by the shift-in and shift-out
//! chain drivers.  Nothing here touches a pin.
//!
//! ## Conventions
//!
//! - Vector index `i` lives in byte `i / 8`, bit `i % 8` (bit 0 = LSB).
//! - Within one byte, [`BitOrder`] decides which bit travels first on the
//!   wire.  This is a property of how a chain is wired, so it is configured
//!   per chain.
//! - On shift-out, bytes go out last-to-first: the last byte clocked stays
//!   in the first register of the chain.

use heapless::Vec;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Longest supported chain in bits (16 cascaded 8-bit registers).
pub const MAX_CHAIN_BITS: usize = 128;
/// Longest supported chain in bytes.
pub const MAX_CHAIN_BYTES: usize = MAX_CHAIN_BITS / 8;

/// Packed chain contents, one byte per register.
pub type ChainBytes = Vec<u8, MAX_CHAIN_BYTES>;

/// Order in which the bits of one byte travel over the serial line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BitOrder {
    /// Bit 7 first.
    #[default]
    MsbFirst,
    /// Bit 0 first.
    LsbFirst,
}

impl BitOrder {
    /// Bit position (0 = LSB) carried by the `n`th wire slot of a byte.
    #[inline]
    pub const fn bit_at(self, n: usize) -> usize {
        match self {
            Self::MsbFirst => 7 - n,
            Self::LsbFirst => n,
        }
    }
}

/// Reject lengths no chain can have.
pub fn check_chain_len(bits: usize) -> Result<()> {
    if bits == 0 || bits % 8 != 0 || bits > MAX_CHAIN_BITS {
        return Err(ConfigError::ChainLength { bits }.into());
    }
    Ok(())
}

/// Pack a bit vector into bytes.  `bits.len()` must be a valid chain length.
pub fn pack(bits: &[bool]) -> Result<ChainBytes> {
    check_chain_len(bits.len())?;
    let mut bytes = ChainBytes::new();
    for chunk in bits.chunks(8) {
        let byte = chunk
            .iter()
            .enumerate()
            .fold(0u8, |acc, (bit, &on)| if on { acc | (1 << bit) } else { acc });
        // Capacity checked by check_chain_len.
        let _ = bytes.push(byte);
    }
    Ok(bytes)
}

/// Unpack `bytes` into `out`, which must be exactly `bytes.len() * 8` long.
pub fn unpack(bytes: &[u8], out: &mut [bool]) -> Result<()> {
    if out.len() != bytes.len() * 8 {
        return Err(ConfigError::LengthMismatch {
            expected: bytes.len() * 8,
            actual: out.len(),
        }
        .into());
    }
    for (i, slot) in out.iter_mut().enumerate() {
        *slot = bytes[i / 8] & (1 << (i % 8)) != 0;
    }
    Ok(())
}

/// Wire sequence for one byte.
pub fn serialize_byte(byte: u8, order: BitOrder) -> [bool; 8] {
    let mut wire = [false; 8];
    for (n, slot) in wire.iter_mut().enumerate() {
        *slot = byte & (1 << order.bit_at(n)) != 0;
    }
    wire
}

/// Rebuild a byte from its wire sequence.
pub fn deserialize_byte(wire: [bool; 8], order: BitOrder) -> u8 {
    wire.iter()
        .enumerate()
        .fold(0u8, |acc, (n, &on)| if on { acc | (1 << order.bit_at(n)) } else { acc })
}

/// Full shift-out wire sequence for a packed chain: last byte first, each
/// byte in `order`.
pub fn transmit_order(bytes: &[u8], order: BitOrder) -> impl Iterator<Item = bool> + '_ {
    bytes
        .iter()
        .rev()
        .flat_map(move |&b| serialize_byte(b, order))
}
