//! Control loop driver, the hexagonal core.
//!
//! [`ControlLoopDriver`] owns the input frame, the virtual pin table and
//! the input hardware.  Each tick it scans the panel and runs the
//! debounce pass; between ticks callers query pins, named controls,
//! selectors and axes.
//!
//! ```text
//!  InputPort ──▶ ┌──────────────────────────┐ ──▶ read / read_control
//!   (scan)       │    ControlLoopDriver     │ ──▶ selector / axis
//!                │  InputFrame · PinTable   │
//!                └──────────────────────────┘
//! ```
//!
//! Output logic lives elsewhere; the driver only turns raw samples into
//! logical inputs.

use core::mem;

use log::{debug, info, warn};

use crate::config::PanelConfig;
use crate::error::Result;
use crate::input::controls::{self, Control, Selector};
use crate::input::vpin::{PinState, ReadMode, VirtualPinTable};
use crate::input::{Axis, InputFrame};

use super::ports::InputPort;

/// Outcome of one [`ControlLoopDriver::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    /// Stable transitions committed this tick.
    pub transitions: usize,
    /// `false` if the scan failed and the previous frame was reused.
    pub scan_ok: bool,
}

pub struct ControlLoopDriver<I: InputPort> {
    inputs: I,
    config: PanelConfig,
    frame: InputFrame,
    /// Scan target; swapped with `frame` on success.
    scratch: InputFrame,
    table: VirtualPinTable,
    tick_count: u64,
    scan_failures: u64,
}

impl<I: InputPort> ControlLoopDriver<I> {
    /// Build the driver.  Does **not** scan; call [`init`](Self::init)
    /// next.
    pub fn new(inputs: I, config: PanelConfig) -> Result<Self> {
        config.validate()?;
        let frame = InputFrame::new(&config)?;
        Ok(Self {
            inputs,
            scratch: frame.clone(),
            frame,
            config,
            table: VirtualPinTable::new(),
            tick_count: 0,
            scan_failures: 0,
        })
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Take a first scan, wire every raw input to its virtual pin and
    /// consume the power-on states so edge readers only see later
    /// changes.  Calling it again rebuilds the table from scratch.
    ///
    /// The new table replaces the old one only if every pin registers;
    /// on error the driver keeps its previous frame and table.
    pub fn init(&mut self, now_ms: u32) -> Result<()> {
        self.inputs.scan(&mut self.scratch)?;

        let mut table = VirtualPinTable::new();
        for (index, source, debounce_ms) in controls::layout(&self.scratch, &self.config) {
            table.register_pin(index, source, debounce_ms, &self.scratch, now_ms)?;
        }
        table.mark_all_consumed(now_ms);

        mem::swap(&mut self.frame, &mut self.scratch);
        self.table = table;

        info!(
            "control loop: {} virtual pins wired, debounce {}ms / selectors {}ms",
            self.table.registered(),
            self.config.debounce_ms,
            self.config.selector_debounce_ms
        );
        Ok(())
    }

    /// One control-loop iteration.  Never fails: a failed scan is logged
    /// and the previous frame is sampled again.
    pub fn tick(&mut self, now_ms: u32) -> TickReport {
        self.tick_count += 1;

        let scan_ok = match self.inputs.scan(&mut self.scratch) {
            Ok(()) => {
                mem::swap(&mut self.frame, &mut self.scratch);
                true
            }
            Err(e) => {
                self.scan_failures += 1;
                warn!(
                    "control loop: scan failed ({}), reusing previous frame [{} failures]",
                    e, self.scan_failures
                );
                false
            }
        };

        let transitions = self.table.sample(&self.frame, now_ms);
        if transitions > 0 {
            debug!("tick {}: {} transitions", self.tick_count, transitions);
        }

        TickReport {
            transitions,
            scan_ok,
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Read a virtual pin by number.
    pub fn read(&mut self, index: usize, mode: ReadMode) -> PinState {
        self.table.read(index, mode)
    }

    /// Typed variant of [`read`](Self::read).
    pub fn try_read(&mut self, index: usize, mode: ReadMode) -> Result<bool> {
        self.table.try_read(index, mode)
    }

    /// Read a named control.
    pub fn read_control(&mut self, control: Control, mode: ReadMode) -> PinState {
        match self.frame.flat_index(control.source()) {
            Some(index) => self.table.read(index, mode),
            None => PinState::NotReady,
        }
    }

    /// Raw joystick or throttle reading, 0–1023.  Not debounced.
    pub fn axis(&self, axis: Axis) -> u16 {
        self.frame.axis(axis)
    }

    /// First selector position whose stable level is on.
    pub fn selector(&self, selector: Selector) -> Option<u8> {
        (0..selector.positions()).find_map(|position| {
            let index = self.frame.flat_index(selector.source(position)?)?;
            let on = self.table.pin(index)?.stable();
            on.then_some(position as u8)
        })
    }

    /// Hide every pending edge, e.g. after a mode switch.
    pub fn consume_all(&mut self, now_ms: u32) {
        self.table.mark_all_consumed(now_ms);
    }

    // ── Accessors ─────────────────────────────────────────────

    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    /// Frame the last debounce pass ran on.
    pub fn frame(&self) -> &InputFrame {
        &self.frame
    }

    pub fn table(&self) -> &VirtualPinTable {
        &self.table
    }

    pub fn inputs_mut(&mut self) -> &mut I {
        &mut self.inputs
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn scan_failures(&self) -> u64 {
        self.scan_failures
    }
}
