//! Debounced virtual pin table.
//!
//! Turns raw, bouncing samples into stable logical inputs that callers
//! query either as a level ("is the switch on?") or as an edge ("fire
//! once per press").
//!
//! ## Per-pin state machine
//!
//! ```text
//!              raw != raw_last
//!   ┌────────┐ ───────────────▶ ┌─────────────────┐
//!   │ Stable │                  │ PendingDebounce │ ◀─┐ raw changes again:
//!   └────────┘ ◀─────────────── └─────────────────┘ ──┘ timer restarts
//!        ▲      raw back to stable        │
//!        │      (no transition)           │ debounce_ms elapsed since
//!        └────────────────────────────────┘ the last raw change:
//!                                           stable = raw, edge armed
//! ```
//!
//! The quiet period is measured from the most recent raw change, so a
//! contact that keeps bouncing never commits until it settles.

use log::debug;

use super::{InputFrame, PinSource};
use crate::error::{ConfigError, Result};

/// Upper bound on virtual pin numbers.
pub const MAX_VIRTUAL_PINS: usize = 256;

/// How a caller wants to observe a pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadMode {
    /// Current stable value, every time.
    Level,
    /// Stable value once per accepted change, then `NotReady`.
    Edge,
}

/// Result of a virtual pin query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinState {
    On,
    Off,
    /// Unwired or out-of-range pin, or an edge read with nothing new.
    NotReady,
}

impl PinState {
    fn from_level(on: bool) -> Self {
        if on { Self::On } else { Self::Off }
    }

    pub fn is_on(self) -> bool {
        self == Self::On
    }

    /// `Some(level)` for `On`/`Off`, `None` for `NotReady`.
    pub fn level(self) -> Option<bool> {
        match self {
            Self::On => Some(true),
            Self::Off => Some(false),
            Self::NotReady => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebounceState {
    Stable,
    PendingDebounce,
}

/// One logical input channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VirtualPin {
    source: PinSource,
    raw_last: bool,
    stable: bool,
    last_change_ms: u32,
    debounce_ms: u32,
    delivered: bool,
}

impl VirtualPin {
    fn new(source: PinSource, raw: bool, debounce_ms: u32, now_ms: u32) -> Self {
        Self {
            source,
            raw_last: raw,
            stable: raw,
            last_change_ms: now_ms,
            debounce_ms,
            delivered: false,
        }
    }

    /// Feed one raw sample.  Returns `true` when the stable value changed.
    fn sample(&mut self, raw: bool, now_ms: u32) -> bool {
        if raw != self.raw_last {
            self.raw_last = raw;
            self.last_change_ms = now_ms;
        }
        if self.raw_last != self.stable
            && now_ms.wrapping_sub(self.last_change_ms) >= self.debounce_ms
        {
            self.stable = self.raw_last;
            self.delivered = false;
            return true;
        }
        false
    }

    pub fn source(&self) -> PinSource {
        self.source
    }

    pub fn stable(&self) -> bool {
        self.stable
    }

    pub fn raw_last(&self) -> bool {
        self.raw_last
    }

    pub fn debounce_ms(&self) -> u32 {
        self.debounce_ms
    }

    pub fn delivered(&self) -> bool {
        self.delivered
    }

    pub fn state(&self) -> DebounceState {
        if self.raw_last == self.stable {
            DebounceState::Stable
        } else {
            DebounceState::PendingDebounce
        }
    }
}

/// Dense table of virtual pins, indexed by virtual pin number.
#[derive(Debug, Clone, Default)]
pub struct VirtualPinTable {
    pins: Vec<Option<VirtualPin>>,
}

impl VirtualPinTable {
    pub fn new() -> Self {
        Self { pins: Vec::new() }
    }

    /// Wire `index` to `source`.
    ///
    /// Grows the table if needed without touching other entries.  Calling
    /// again for the same index replaces the wiring and restarts the pin
    /// as settled on its current raw value.
    pub fn register_pin(
        &mut self,
        index: usize,
        source: PinSource,
        debounce_ms: u32,
        frame: &InputFrame,
        now_ms: u32,
    ) -> Result<()> {
        if index >= MAX_VIRTUAL_PINS {
            return Err(ConfigError::PinOutOfRange { index }.into());
        }
        let raw = frame.resolve(source).ok_or(ConfigError::UnknownSource)?;
        if index >= self.pins.len() {
            self.pins.resize(index + 1, None);
        }
        self.pins[index] = Some(VirtualPin::new(source, raw, debounce_ms, now_ms));
        debug!("vpin {}: registered {:?} ({}ms)", index, source, debounce_ms);
        Ok(())
    }

    /// Remove the wiring at `index`; later reads return `NotReady`.
    pub fn unregister_pin(&mut self, index: usize) -> Option<VirtualPin> {
        self.pins.get_mut(index).and_then(Option::take)
    }

    /// Run the debounce pass over every registered pin.  Returns the
    /// number of stable transitions committed.
    pub fn sample(&mut self, frame: &InputFrame, now_ms: u32) -> usize {
        let mut committed = 0;
        for (index, slot) in self.pins.iter_mut().enumerate() {
            let Some(pin) = slot else { continue };
            // A source the frame no longer has keeps its last state.
            let Some(raw) = frame.resolve(pin.source) else {
                continue;
            };
            if pin.sample(raw, now_ms) {
                debug!("vpin {}: -> {}", index, if pin.stable { "on" } else { "off" });
                committed += 1;
            }
        }
        committed
    }

    /// Query a pin.  Never panics; anything unanswerable is `NotReady`.
    pub fn read(&mut self, index: usize, mode: ReadMode) -> PinState {
        let Some(pin) = self.pins.get_mut(index).and_then(Option::as_mut) else {
            return PinState::NotReady;
        };
        match mode {
            ReadMode::Level => PinState::from_level(pin.stable),
            ReadMode::Edge if pin.delivered => PinState::NotReady,
            ReadMode::Edge => {
                pin.delivered = true;
                PinState::from_level(pin.stable)
            }
        }
    }

    /// Typed variant of [`read`](Self::read).
    pub fn try_read(&mut self, index: usize, mode: ReadMode) -> Result<bool> {
        if index >= MAX_VIRTUAL_PINS {
            return Err(ConfigError::PinOutOfRange { index }.into());
        }
        if self.pin(index).is_none() {
            return Err(ConfigError::UnregisteredPin { index }.into());
        }
        self.read(index, mode)
            .level()
            .ok_or_else(|| ConfigError::NotReady { index }.into())
    }

    /// Treat every current stable value as already delivered and restart
    /// debounce timers at `now_ms`.  Used after (re)initialisation so the
    /// power-on switch positions are not reported as changes.
    pub fn mark_all_consumed(&mut self, now_ms: u32) {
        for pin in self.pins.iter_mut().flatten() {
            pin.delivered = true;
            pin.last_change_ms = now_ms;
        }
    }

    pub fn pin(&self, index: usize) -> Option<&VirtualPin> {
        self.pins.get(index).and_then(Option::as_ref)
    }

    /// Whether `index` has an unconfirmed raw change.
    pub fn is_pending(&self, index: usize) -> bool {
        self.pin(index)
            .is_some_and(|p| p.state() == DebounceState::PendingDebounce)
    }

    /// Table length (highest registered index + 1, or more).
    pub fn len(&self) -> usize {
        self.pins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pins.is_empty()
    }

    /// Number of wired pins.
    pub fn registered(&self) -> usize {
        self.pins.iter().filter(|p| p.is_some()).count()
    }
}
