//! Kerbal control panel firmware: main entry point.
//!
//! Hexagonal architecture with a fixed-period control loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  PanelInputs          PanelOutputs          MonotonicClock     │
//! │  (74HC165 ×2 + ADC1)  (74HC595 ×3 + spkr)   (ClockPort)        │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │          ControlLoopDriver (pure logic)                │    │
//! │  │  InputFrame · VirtualPinTable · debounce               │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::{Result, anyhow};
use esp_idf_hal::delay::{Ets, FreeRtos};
use esp_idf_hal::gpio::{AnyInputPin, AnyOutputPin, PinDriver};
use log::{info, warn};

use kerbal_panel::adapters::hardware::{PanelInputs, PanelOutputs};
use kerbal_panel::adapters::time::MonotonicClock;
use kerbal_panel::app::driver::ControlLoopDriver;
use kerbal_panel::app::ports::{ClockPort, InputPort, OutputPort};
use kerbal_panel::config::PanelConfig;
use kerbal_panel::drivers::hw_init;
use kerbal_panel::drivers::shift_in::ShiftInChain;
use kerbal_panel::drivers::shift_out::ShiftOutChain;
use kerbal_panel::input::controls::{Control, Selector};
use kerbal_panel::input::vpin::{PinState, ReadMode};
use kerbal_panel::output::{Indicator, OutputFrame};
use kerbal_panel::pins;

/// Output driver for a raw GPIO number.
fn out_pin(gpio: i32) -> Result<PinDriver<'static, AnyOutputPin, esp_idf_hal::gpio::Output>> {
    // SAFETY: every GPIO in `pins` is claimed exactly once, here at boot.
    Ok(PinDriver::output(unsafe { AnyOutputPin::new(gpio) })?)
}

/// Input driver for a raw GPIO number.
fn in_pin(gpio: i32) -> Result<PinDriver<'static, AnyInputPin, esp_idf_hal::gpio::Input>> {
    // SAFETY: as above.
    Ok(PinDriver::input(unsafe { AnyInputPin::new(gpio) })?)
}

/// Local feedback that needs no game link: power LED, lamp test while
/// the debug switch is on, and a log line per staging/abort press.
fn local_feedback<I: InputPort>(driver: &mut ControlLoopDriver<I>, leds: &mut OutputFrame) {
    let lamp_test = driver
        .read_control(Control::DebugSwitch, ReadMode::Level)
        .is_on();
    if lamp_test {
        leds.fill(true);
    } else {
        leds.clear();
    }
    if let Err(e) = leds.set_indicator(Indicator::Power, true) {
        warn!("panel: power LED not wired ({})", e);
    }

    for (control, name) in [(Control::StageButton, "stage"), (Control::AbortButton, "abort")] {
        if driver.read_control(control, ReadMode::Edge) == PinState::On {
            info!("panel: {} pressed", name);
        }
    }
}

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Kerbal panel v{}                 ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let config = PanelConfig::default();
    config.validate()?;

    // ── 3. Peripherals ────────────────────────────────────────
    let adc = hw_init::init_adc().map_err(|e| anyhow!("{e}"))?;

    let chain_in_a = ShiftInChain::new(
        in_pin(pins::SHIFT_IN_A_DATA_GPIO)?,
        out_pin(pins::SHIFT_IN_A_CLOCK_GPIO)?,
        out_pin(pins::SHIFT_IN_A_CLOCK_ENABLE_GPIO)?,
        out_pin(pins::SHIFT_IN_A_LOAD_GPIO)?,
        config.input_a,
        config.shift_pulse_us,
    )?;
    let chain_in_b = ShiftInChain::new(
        in_pin(pins::SHIFT_IN_B_DATA_GPIO)?,
        out_pin(pins::SHIFT_IN_B_CLOCK_GPIO)?,
        out_pin(pins::SHIFT_IN_B_CLOCK_ENABLE_GPIO)?,
        out_pin(pins::SHIFT_IN_B_LOAD_GPIO)?,
        config.input_b,
        config.shift_pulse_us,
    )?;
    let inputs = PanelInputs::new(chain_in_a, chain_in_b, adc, Ets, &config)?;

    let mut outputs = PanelOutputs::new(
        ShiftOutChain::new(
            out_pin(pins::SHIFT_OUT_A_DATA_GPIO)?,
            out_pin(pins::SHIFT_OUT_A_LATCH_GPIO)?,
            out_pin(pins::SHIFT_OUT_A_CLOCK_GPIO)?,
            config.output_a,
        )?,
        ShiftOutChain::new(
            out_pin(pins::SHIFT_OUT_B_DATA_GPIO)?,
            out_pin(pins::SHIFT_OUT_B_LATCH_GPIO)?,
            out_pin(pins::SHIFT_OUT_B_CLOCK_GPIO)?,
            config.output_b,
        )?,
        ShiftOutChain::new(
            out_pin(pins::SHIFT_OUT_C_DATA_GPIO)?,
            out_pin(pins::SHIFT_OUT_C_LATCH_GPIO)?,
            out_pin(pins::SHIFT_OUT_C_CLOCK_GPIO)?,
            config.output_c,
        )?,
        out_pin(pins::SPEAKER_GPIO)?,
        &config,
    )?;

    // ── 4. Outputs dark before the first scan ─────────────────
    let mut leds = OutputFrame::new(&config)?;
    if let Err(e) = outputs.flush(&leds) {
        warn!("outputs: initial flush failed ({})", e);
    }

    // ── 5. Control loop ───────────────────────────────────────
    let clock = MonotonicClock::new();
    let tick_ms = config.tick_interval_ms;
    let mut driver = ControlLoopDriver::new(inputs, config)?;
    driver.init(clock.now_ms())?;

    info!(
        "System ready: info={:?} direction={:?}. Entering control loop.",
        driver.selector(Selector::Info),
        driver.selector(Selector::Direction)
    );

    let mut last_info = driver.selector(Selector::Info);
    loop {
        let report = driver.tick(clock.now_ms());

        if report.transitions > 0 {
            let info_mode = driver.selector(Selector::Info);
            if info_mode != last_info {
                info!("panel: info page {:?} -> {:?}", last_info, info_mode);
                last_info = info_mode;
            }
        }

        local_feedback(&mut driver, &mut leds);
        if let Err(e) = outputs.flush(&leds) {
            warn!("outputs: flush failed ({})", e);
        }

        FreeRtos::delay_ms(tick_ms);
    }
}
