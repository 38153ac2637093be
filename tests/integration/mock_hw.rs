//! Simulated panel hardware for integration tests.
//!
//! Models the 74HC165 and 74HC595 chips at the pin level, behind the
//! embedded-hal traits, so the real chain drivers and adapters run
//! unchanged.  Every line change is logged with a simulated timestamp
//! advanced only by [`SimDelay`].

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, ErrorKind, ErrorType, InputPin, OutputPin};

use kerbal_panel::app::ports::AnalogPort;
use kerbal_panel::codec::BitOrder;
use kerbal_panel::config::{ChainConfig, PanelConfig};
use kerbal_panel::drivers::shift_in::ShiftInChain;
use kerbal_panel::drivers::shift_out::ShiftOutChain;
use kerbal_panel::error::HardwareError;
use kerbal_panel::pins;

/// Simulated time in nanoseconds, shared by delays and chips.
pub type SimClock = Rc<Cell<u64>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line {
    Clock,
    ClockEnable,
    Load,
    Data,
    Latch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub at_ns: u64,
    pub line: Line,
    pub high: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinFault;

impl digital::Error for PinFault {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

// ── Delay ─────────────────────────────────────────────────────

pub struct SimDelay {
    pub clock: SimClock,
}

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.clock.set(self.clock.get() + u64::from(ns));
    }
}

// ── 74HC165 (parallel in, serial out) ─────────────────────────

pub struct Sim165 {
    /// Parallel input levels, register `i / 8`, bit `i % 8`.
    pub inputs: Vec<bool>,
    /// How the chip's A..H pins map onto byte bits.
    pub wiring: BitOrder,
    pub log: Vec<Edge>,
    pub fail_reads: bool,
    clock: SimClock,
    shift: VecDeque<bool>,
    clock_high: bool,
    ce_low: bool,
    load_low: bool,
}

impl Sim165 {
    pub fn new(len_bits: usize, wiring: BitOrder, clock: SimClock) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self {
            inputs: vec![false; len_bits],
            wiring,
            log: Vec::new(),
            fail_reads: false,
            clock,
            shift: VecDeque::new(),
            clock_high: false,
            ce_low: false,
            load_low: false,
        }))
    }

    /// Serial order: register 0 first, pin H down to pin A.
    fn parallel_load(&mut self) {
        self.shift.clear();
        for reg in 0..self.inputs.len() / 8 {
            for pin in (0..8).rev() {
                let bit = match self.wiring {
                    BitOrder::MsbFirst => pin,
                    BitOrder::LsbFirst => 7 - pin,
                };
                self.shift.push_back(self.inputs[reg * 8 + bit]);
            }
        }
    }

    fn drive(&mut self, line: Line, high: bool) {
        self.log.push(Edge {
            at_ns: self.clock.get(),
            line,
            high,
        });
        match line {
            Line::Load => {
                self.load_low = !high;
                if self.load_low {
                    self.parallel_load();
                }
            }
            Line::ClockEnable => self.ce_low = !high,
            Line::Clock => {
                let rising = high && !self.clock_high;
                self.clock_high = high;
                if rising && self.ce_low && !self.load_low {
                    // Serial input tied low.
                    self.shift.pop_front();
                    self.shift.push_back(false);
                }
            }
            Line::Data | Line::Latch => {}
        }
    }

    /// First logged time of a line reaching `high`.
    pub fn first(&self, line: Line, high: bool) -> Option<u64> {
        self.log
            .iter()
            .find(|e| e.line == line && e.high == high)
            .map(|e| e.at_ns)
    }
}

pub struct Pin165 {
    chip: Rc<RefCell<Sim165>>,
    line: Line,
}

impl ErrorType for Pin165 {
    type Error = PinFault;
}

impl OutputPin for Pin165 {
    fn set_low(&mut self) -> Result<(), PinFault> {
        self.chip.borrow_mut().drive(self.line, false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), PinFault> {
        self.chip.borrow_mut().drive(self.line, true);
        Ok(())
    }
}

impl InputPin for Pin165 {
    fn is_high(&mut self) -> Result<bool, PinFault> {
        let chip = self.chip.borrow();
        if chip.fail_reads {
            return Err(PinFault);
        }
        Ok(chip.shift.front().copied().unwrap_or(false))
    }

    fn is_low(&mut self) -> Result<bool, PinFault> {
        self.is_high().map(|h| !h)
    }
}

pub type SimInChain = ShiftInChain<Pin165, Pin165, Pin165, Pin165>;

/// Chain driver wired to a fresh simulated 74HC165 chain.
pub fn shift_in(chain: ChainConfig, clock: &SimClock) -> (SimInChain, Rc<RefCell<Sim165>>) {
    let chip = Sim165::new(chain.length_bits, chain.bit_order, clock.clone());
    let pin = |line| Pin165 {
        chip: chip.clone(),
        line,
    };
    let driver = ShiftInChain::new(
        pin(Line::Data),
        pin(Line::Clock),
        pin(Line::ClockEnable),
        pin(Line::Load),
        chain,
        5,
    )
    .unwrap();
    (driver, chip)
}

// ── 74HC595 (serial in, parallel out) ─────────────────────────

pub struct Sim595 {
    pub wiring: BitOrder,
    /// Latched output levels, register `i / 8`, bit `i % 8`.
    pub outputs: Vec<bool>,
    /// Data level at every rising clock edge since the last latch drop.
    pub frames: Vec<Vec<bool>>,
    pub latches: usize,
    pub fail_writes: bool,
    storage: Vec<bool>,
    data: bool,
    clock_high: bool,
}

impl Sim595 {
    pub fn new(len_bits: usize, wiring: BitOrder) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self {
            wiring,
            outputs: vec![false; len_bits],
            frames: Vec::new(),
            latches: 0,
            fail_writes: false,
            storage: vec![false; len_bits],
            data: false,
            clock_high: false,
        }))
    }

    fn drive(&mut self, line: Line, high: bool) {
        match line {
            Line::Data => self.data = high,
            Line::Clock => {
                let rising = high && !self.clock_high;
                self.clock_high = high;
                if rising {
                    // Register 0 pin A takes the new bit; everything moves
                    // one place down the chain.
                    self.storage.rotate_right(1);
                    self.storage[0] = self.data;
                    if let Some(frame) = self.frames.last_mut() {
                        frame.push(self.data);
                    }
                }
            }
            Line::Latch if high => {
                self.latches += 1;
                for (i, out) in self.outputs.iter_mut().enumerate() {
                    let pin = match self.wiring {
                        BitOrder::MsbFirst => i % 8,
                        BitOrder::LsbFirst => 7 - i % 8,
                    };
                    *out = self.storage[i / 8 * 8 + pin];
                }
            }
            Line::Latch => self.frames.push(Vec::new()),
            Line::Load | Line::ClockEnable => {}
        }
    }
}

pub struct Pin595 {
    chip: Rc<RefCell<Sim595>>,
    line: Line,
}

impl ErrorType for Pin595 {
    type Error = PinFault;
}

impl OutputPin for Pin595 {
    fn set_low(&mut self) -> Result<(), PinFault> {
        let mut chip = self.chip.borrow_mut();
        if chip.fail_writes {
            return Err(PinFault);
        }
        chip.drive(self.line, false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), PinFault> {
        let mut chip = self.chip.borrow_mut();
        if chip.fail_writes {
            return Err(PinFault);
        }
        chip.drive(self.line, true);
        Ok(())
    }
}

pub type SimOutChain = ShiftOutChain<Pin595, Pin595, Pin595>;

pub fn shift_out(chain: ChainConfig) -> (SimOutChain, Rc<RefCell<Sim595>>) {
    let chip = Sim595::new(chain.length_bits, chain.bit_order);
    let pin = |line| Pin595 {
        chip: chip.clone(),
        line,
    };
    let driver = ShiftOutChain::new(pin(Line::Data), pin(Line::Latch), pin(Line::Clock), chain).unwrap();
    (driver, chip)
}

// ── Direct lines ──────────────────────────────────────────────

/// Plain output line, e.g. the speaker.
#[derive(Clone, Default)]
pub struct SimLine {
    pub level: Rc<Cell<bool>>,
}

impl ErrorType for SimLine {
    type Error = Infallible;
}

impl OutputPin for SimLine {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.level.set(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.level.set(true);
        Ok(())
    }
}

/// ADC stand-in; every channel starts centred.
#[derive(Clone)]
pub struct MockAnalog {
    pub channels: Rc<RefCell<[u16; pins::ADC_CHANNEL_COUNT as usize]>>,
    /// Channel whose conversions fail, if any.
    pub failing: Rc<Cell<Option<u8>>>,
}

impl MockAnalog {
    pub fn centred() -> Self {
        Self {
            channels: Rc::new(RefCell::new([512; pins::ADC_CHANNEL_COUNT as usize])),
            failing: Rc::new(Cell::new(None)),
        }
    }

    pub fn set(&self, channel: u8, raw: u16) {
        self.channels.borrow_mut()[channel as usize] = raw;
    }

    pub fn fail(&self, channel: Option<u8>) {
        self.failing.set(channel);
    }
}

impl AnalogPort for MockAnalog {
    fn read_channel(&mut self, channel: u8) -> kerbal_panel::Result<u16> {
        if self.failing.get() == Some(channel) {
            return Err(HardwareError::AdcRead { channel }.into());
        }
        Ok(self.channels.borrow()[channel as usize])
    }
}

// ── Whole panel ───────────────────────────────────────────────

pub type SimInputs = kerbal_panel::adapters::hardware::PanelInputs<SimInChain, SimInChain, MockAnalog, SimDelay>;

/// Input side of the default panel on simulated chips.
pub struct SimPanel {
    pub bank_a: Rc<RefCell<Sim165>>,
    pub bank_b: Rc<RefCell<Sim165>>,
    pub analog: MockAnalog,
    pub clock: SimClock,
}

impl SimPanel {
    pub fn build(config: &PanelConfig) -> (SimInputs, Self) {
        let clock = SimClock::default();
        let (chain_a, bank_a) = shift_in(config.input_a, &clock);
        let (chain_b, bank_b) = shift_in(config.input_b, &clock);
        let analog = MockAnalog::centred();
        let delay = SimDelay {
            clock: clock.clone(),
        };
        let inputs = kerbal_panel::adapters::hardware::PanelInputs::new(
            chain_a,
            chain_b,
            analog.clone(),
            delay,
            config,
        )
        .unwrap();
        (
            inputs,
            Self {
                bank_a,
                bank_b,
                analog,
                clock,
            },
        )
    }
}
