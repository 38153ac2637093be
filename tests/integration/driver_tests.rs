//! Control loop driver running on the simulated panel.
//!
//! Drives the real `PanelInputs`/`PanelOutputs` adapters over simulated
//! chips, so these cover scan → debounce → query end to end.

use kerbal_panel::adapters::hardware::PanelOutputs;
use kerbal_panel::app::driver::{ControlLoopDriver, TickReport};
use kerbal_panel::app::ports::OutputPort;
use kerbal_panel::config::PanelConfig;
use kerbal_panel::input::controls::{Control, Selector};
use kerbal_panel::input::vpin::{PinState, ReadMode};
use kerbal_panel::input::{Axis, PinSource};
use kerbal_panel::output::{Indicator, OutputBank, OutputFrame, ResourceBar};
use kerbal_panel::pins;

use crate::mock_hw::{SimInputs, SimLine, SimPanel, shift_out};

fn panel() -> (ControlLoopDriver<SimInputs>, SimPanel) {
    let config = PanelConfig::default();
    let (inputs, sim) = SimPanel::build(&config);
    let driver = ControlLoopDriver::new(inputs, config).unwrap();
    (driver, sim)
}

fn press(sim: &SimPanel, source: PinSource, on: bool) {
    match source {
        PinSource::Bank { bank, bit } => {
            let chip = match bank {
                kerbal_panel::input::InputBank::A => &sim.bank_a,
                kerbal_panel::input::InputBank::B => &sim.bank_b,
            };
            chip.borrow_mut().inputs[bit] = on;
        }
        PinSource::Direct(input) => {
            sim.analog.set(input.channel(), if on { 0 } else { 1023 });
        }
    }
}

#[test]
fn boot_state_is_level_only() {
    let (mut driver, sim) = panel();
    press(&sim, Control::SasSwitch.source(), true);
    press(&sim, Control::LightsSwitch.source(), true);
    driver.init(0).unwrap();

    assert_eq!(driver.read_control(Control::SasSwitch, ReadMode::Level), PinState::On);
    assert_eq!(driver.read_control(Control::SasSwitch, ReadMode::Edge), PinState::NotReady);
    assert_eq!(driver.read_control(Control::LightsSwitch, ReadMode::Level), PinState::On);
    assert_eq!(driver.read_control(Control::GearSwitch, ReadMode::Level), PinState::Off);
}

#[test]
fn stage_press_scenario() {
    let (mut driver, sim) = panel();
    driver.init(0).unwrap();

    // Contact bounces for 20ms, then holds.
    let stage = Control::StageButton.source();
    let mut now = 0;
    for (t, level) in [(10, true), (15, false), (20, true), (30, false), (35, true)] {
        press(&sim, stage, level);
        now = t;
        let report = driver.tick(now);
        assert_eq!(report.transitions, 0, "t={t}");
    }
    // Quiet from 35ms: nothing before 85ms.
    assert_eq!(driver.tick(80).transitions, 0);
    assert_eq!(driver.read_control(Control::StageButton, ReadMode::Edge), PinState::NotReady);

    now += 50;
    assert_eq!(
        driver.tick(now),
        TickReport {
            transitions: 1,
            scan_ok: true
        }
    );
    assert_eq!(driver.read_control(Control::StageButton, ReadMode::Edge), PinState::On);
    assert_eq!(driver.read_control(Control::StageButton, ReadMode::Edge), PinState::NotReady);
    assert_eq!(driver.read_control(Control::StageButton, ReadMode::Level), PinState::On);

    // Release.
    press(&sim, stage, false);
    driver.tick(200);
    driver.tick(250);
    assert_eq!(driver.read_control(Control::StageButton, ReadMode::Edge), PinState::Off);
}

#[test]
fn bank_b_controls_map_past_bank_a() {
    let (mut driver, sim) = panel();
    driver.init(0).unwrap();

    press(&sim, Control::RcsSwitch.source(), true);
    driver.tick(10);
    driver.tick(60);
    // B16 → virtual pin 80.
    assert_eq!(driver.read(80, ReadMode::Level), PinState::On);
    assert_eq!(driver.read_control(Control::RcsSwitch, ReadMode::Edge), PinState::On);
}

#[test]
fn joystick_buttons_use_analog_threshold() {
    let (mut driver, sim) = panel();
    driver.init(0).unwrap();
    assert_eq!(driver.read_control(Control::JumpButton, ReadMode::Level), PinState::Off);

    // 50 is the threshold: at or below counts as pressed.
    sim.analog.set(pins::ROTATION_BUTTON_ADC_CHANNEL, 50);
    sim.analog.set(pins::TRANSLATION_BUTTON_ADC_CHANNEL, 51);
    driver.tick(10);
    driver.tick(60);
    assert_eq!(driver.read_control(Control::JumpButton, ReadMode::Edge), PinState::On);
    assert_eq!(driver.read_control(Control::EnableLookButton, ReadMode::Level), PinState::Off);
}

#[test]
fn axes_are_raw_and_immediate() {
    let (mut driver, sim) = panel();
    driver.init(0).unwrap();
    assert_eq!(driver.axis(Axis::Throttle), 512);

    sim.analog.set(pins::THROTTLE_ADC_CHANNEL, 900);
    sim.analog.set(pins::ROTATION_Y_ADC_CHANNEL, 3);
    driver.tick(10);
    assert_eq!(driver.axis(Axis::Throttle), 900);
    assert_eq!(driver.axis(Axis::RotationY), 3);
}

#[test]
fn selectors_resolve_after_their_longer_window() {
    let (mut driver, sim) = panel();
    press(&sim, Selector::Direction.source(2).unwrap(), true);
    driver.init(0).unwrap();
    assert_eq!(driver.selector(Selector::Direction), Some(2));

    // Wiper moves to position 3.
    press(&sim, Selector::Direction.source(2).unwrap(), false);
    press(&sim, Selector::Direction.source(3).unwrap(), true);
    driver.tick(10);
    driver.tick(60);
    assert_eq!(driver.selector(Selector::Direction), Some(2));
    driver.tick(110);
    assert_eq!(driver.selector(Selector::Direction), Some(3));
}

#[test]
fn read_failure_keeps_debouncing_last_good_frame() {
    let (mut driver, sim) = panel();
    driver.init(0).unwrap();

    press(&sim, Control::AbortButton.source(), true);
    assert!(driver.tick(10).scan_ok);

    sim.bank_a.borrow_mut().fail_reads = true;
    press(&sim, Control::AbortButton.source(), false);
    let report = driver.tick(60);
    assert!(!report.scan_ok);
    assert_eq!(report.transitions, 1);
    assert_eq!(driver.read_control(Control::AbortButton, ReadMode::Edge), PinState::On);

    sim.bank_a.borrow_mut().fail_reads = false;
    driver.tick(70);
    driver.tick(120);
    assert_eq!(driver.read_control(Control::AbortButton, ReadMode::Edge), PinState::Off);
    assert_eq!(driver.scan_failures(), 1);
}

#[test]
fn adc_failure_is_a_failed_scan_not_a_press() {
    let (mut driver, sim) = panel();
    sim.analog.set(pins::THROTTLE_ADC_CHANNEL, 700);
    driver.init(0).unwrap();

    sim.analog.fail(Some(pins::ROTATION_BUTTON_ADC_CHANNEL));
    for now in [10, 60, 120] {
        assert!(!driver.tick(now).scan_ok);
    }
    assert_eq!(driver.read_control(Control::JumpButton, ReadMode::Edge), PinState::NotReady);
    assert_eq!(driver.read_control(Control::JumpButton, ReadMode::Level), PinState::Off);
    assert_eq!(driver.axis(Axis::Throttle), 700);
    assert_eq!(driver.scan_failures(), 3);

    sim.analog.fail(None);
    assert!(driver.tick(130).scan_ok);
}

#[test]
fn unknown_pins_are_not_ready() {
    let (mut driver, _sim) = panel();
    driver.init(0).unwrap();
    assert_eq!(driver.read(999, ReadMode::Level), PinState::NotReady);
    assert_eq!(driver.read(90, ReadMode::Edge), PinState::NotReady);
    assert!(driver.try_read(999, ReadMode::Level).is_err());
}

#[test]
fn outputs_flush_every_chain_and_speaker() {
    let config = PanelConfig::default();
    let (a, chip_a) = shift_out(config.output_a);
    let (b, chip_b) = shift_out(config.output_b);
    let (c, chip_c) = shift_out(config.output_c);
    let speaker = SimLine::default();
    let mut outputs = PanelOutputs::new(a, b, c, speaker.clone(), &config).unwrap();

    let mut leds = OutputFrame::new(&config).unwrap();
    leds.set_indicator(Indicator::Power, true).unwrap();
    leds.set_indicator(Indicator::SasManeuver, true).unwrap();
    leds.set_bar_level(ResourceBar::LiquidFuel, 100).unwrap();
    leds.set_speaker(true);
    outputs.flush(&leds).unwrap();

    assert_eq!(chip_a.borrow().outputs, leds.bank(OutputBank::A));
    assert_eq!(chip_b.borrow().outputs, leds.bank(OutputBank::B));
    assert_eq!(chip_c.borrow().outputs, leds.bank(OutputBank::C));
    assert!(chip_a.borrow().outputs[21] && chip_a.borrow().outputs[40]);
    assert!(chip_c.borrow().outputs[0]);
    assert!(speaker.level.get());

    // Unchanged frame is still written.
    outputs.flush(&leds).unwrap();
    assert_eq!(chip_b.borrow().latches, 2);
}

#[test]
fn outputs_keep_writing_after_one_chain_fails() {
    let config = PanelConfig::default();
    let (a, chip_a) = shift_out(config.output_a);
    let (b, _chip_b) = shift_out(config.output_b);
    let (c, chip_c) = shift_out(config.output_c);
    let mut outputs = PanelOutputs::new(a, b, c, SimLine::default(), &config).unwrap();

    chip_a.borrow_mut().fail_writes = true;
    let mut leds = OutputFrame::new(&config).unwrap();
    leds.set_indicator(Indicator::SasTarget, true).unwrap();
    assert!(outputs.flush(&leds).is_err());
    assert!(chip_c.borrow().outputs[7]);
}

#[test]
fn output_adapter_rejects_mismatched_wiring() {
    let config = PanelConfig::default();
    let (a, _) = shift_out(config.output_a);
    let (b, _) = shift_out(config.output_b);
    let (c, _) = shift_out(config.output_a);
    assert!(PanelOutputs::new(a, b, c, SimLine::default(), &config).is_err());
}
