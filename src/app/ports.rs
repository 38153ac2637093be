//! Port traits: the hexagonal boundary between the control loop and the
//! panel hardware.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ControlLoopDriver (domain)
//! ```
//!
//! Driven adapters (shift chains, ADC, clock) implement these traits.
//! The [`ControlLoopDriver`](super::driver::ControlLoopDriver) consumes
//! them via generics, so the debounce logic never touches a pin and runs
//! unchanged against the mocks in `tests/`.

use crate::error::Result;
use crate::input::InputFrame;
use crate::output::OutputFrame;

// ───────────────────────────────────────────────────────────────
// Input port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Fills an [`InputFrame`] with one complete scan of the panel.
pub trait InputPort {
    /// Scan every input into `frame`.
    ///
    /// On error the frame may hold a partial scan; the driver scans into
    /// a scratch frame and only adopts it on success.
    fn scan(&mut self, frame: &mut InputFrame) -> Result<()>;
}

// ───────────────────────────────────────────────────────────────
// Analog port (driven adapter: ADC → input adapter)
// ───────────────────────────────────────────────────────────────

/// Raw analog readings, already scaled to 0–1023.
pub trait AnalogPort {
    /// A failed conversion is an error, never a substitute reading.
    fn read_channel(&mut self, channel: u8) -> Result<u16>;
}

// ───────────────────────────────────────────────────────────────
// Output port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Pushes an [`OutputFrame`] to the LED chains and speaker.
pub trait OutputPort {
    /// Write every output, changed or not.
    fn flush(&mut self, frame: &OutputFrame) -> Result<()>;
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Monotonic millisecond counter.  Wraps at `u32::MAX`; consumers use
/// wrapping arithmetic.
pub trait ClockPort {
    fn now_ms(&self) -> u32;
}
