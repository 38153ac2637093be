//! Physical control layout of the panel.
//!
//! Names every switch and button and where it is wired.  A control's
//! virtual pin number is the flattened index of its [`PinSource`], so the
//! table can be filled by walking the whole input frame and the names are
//! only needed at query time.
//!
//! Bank B bits 17..23 are spare positions on the third register.

use super::{DirectInput, InputBank, InputFrame, PinSource};
use crate::config::PanelConfig;

/// A named two-state input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    // ── Misc ──────────────────────────────────────────────
    DebugSwitch,
    SoundSwitch,
    InputEnableButton,

    // ── Warning acknowledge buttons ───────────────────────
    TempWarningButton,
    GeeWarningButton,
    WarpWarningButton,
    BrakeWarningButton,
    SasWarningButton,
    RcsWarningButton,
    GearWarningButton,
    CommsWarningButton,
    AltWarningButton,
    PitchWarningButton,

    // ── Display controls ──────────────────────────────────
    StageViewSwitch,
    VerticalVelocitySwitch,
    ReferenceModeButton,
    RadarAltitudeSwitch,

    // ── Staging / abort ───────────────────────────────────
    StageButton,
    StageLockSwitch,
    AbortButton,
    AbortLockSwitch,

    // ── Action groups ─────────────────────────────────────
    DockingSwitch,
    PrecisionSwitch,
    LightsSwitch,
    GearSwitch,
    BrakeSwitch,

    // ── View ──────────────────────────────────────────────
    ScreenshotButton,
    UiSwitch,
    NavSwitch,
    ViewSwitch,
    FocusButton,
    CamModeButton,
    CamResetButton,
    EnableLookButton,

    // ── Warp & pause ──────────────────────────────────────
    WarpLockSwitch,
    PhysWarpSwitch,
    CancelWarpButton,
    DecreaseWarpButton,
    IncreaseWarpButton,
    PauseButton,

    // ── SAS & RCS ─────────────────────────────────────────
    SasStabilityAssistButton,
    SasManeuverButton,
    SasProgradeButton,
    SasRetrogradeButton,
    SasNormalButton,
    SasAntiNormalButton,
    SasRadialInButton,
    SasRadialOutButton,
    SasTargetButton,
    SasAntiTargetButton,
    SasSwitch,
    RcsSwitch,

    // ── EVA ───────────────────────────────────────────────
    BoardButton,
    GrabButton,
    JumpButton,

    // ── Throttle / joysticks ──────────────────────────────
    ThrottleLockSwitch,
    TransHoldButton,
    TransResetButton,
    RotHoldButton,
    RotResetButton,
}

impl Control {
    pub const fn source(self) -> PinSource {
        match self {
            Self::DebugSwitch => PinSource::a(0),
            Self::SoundSwitch => PinSource::a(1),
            Self::InputEnableButton => PinSource::a(2),

            Self::TempWarningButton => PinSource::a(3),
            Self::GeeWarningButton => PinSource::a(4),
            Self::WarpWarningButton => PinSource::a(5),
            Self::BrakeWarningButton => PinSource::a(6),
            Self::SasWarningButton => PinSource::a(7),
            Self::RcsWarningButton => PinSource::a(8),
            Self::GearWarningButton => PinSource::a(9),
            Self::CommsWarningButton => PinSource::a(10),
            Self::AltWarningButton => PinSource::a(11),
            Self::PitchWarningButton => PinSource::a(12),

            Self::StageViewSwitch => PinSource::a(13),
            Self::VerticalVelocitySwitch => PinSource::a(14),
            Self::ReferenceModeButton => PinSource::a(15),
            Self::RadarAltitudeSwitch => PinSource::a(16),

            // 17..=28 info selector, 29..=39 direction selector
            Self::StageButton => PinSource::a(40),
            Self::StageLockSwitch => PinSource::a(41),
            Self::AbortButton => PinSource::a(42),
            Self::AbortLockSwitch => PinSource::a(43),

            Self::DockingSwitch => PinSource::a(44),
            Self::PrecisionSwitch => PinSource::a(45),
            Self::LightsSwitch => PinSource::a(46),
            Self::GearSwitch => PinSource::a(47),
            Self::BrakeSwitch => PinSource::a(48),

            Self::ScreenshotButton => PinSource::a(49),
            Self::UiSwitch => PinSource::a(50),
            Self::NavSwitch => PinSource::a(51),
            Self::ViewSwitch => PinSource::a(52),
            Self::FocusButton => PinSource::a(53),
            Self::CamModeButton => PinSource::a(54),
            Self::CamResetButton => PinSource::a(55),
            Self::EnableLookButton => PinSource::Direct(DirectInput::TranslationButton),

            Self::ThrottleLockSwitch => PinSource::a(56),
            Self::WarpLockSwitch => PinSource::a(57),
            Self::PhysWarpSwitch => PinSource::a(58),
            Self::CancelWarpButton => PinSource::a(59),
            Self::DecreaseWarpButton => PinSource::a(60),
            Self::IncreaseWarpButton => PinSource::a(61),
            Self::PauseButton => PinSource::a(62),
            Self::BoardButton => PinSource::a(63),

            Self::GrabButton => PinSource::b(0),
            Self::TransHoldButton => PinSource::b(1),
            Self::TransResetButton => PinSource::b(2),
            Self::RotHoldButton => PinSource::b(3),
            Self::RotResetButton => PinSource::b(4),
            Self::SasStabilityAssistButton => PinSource::b(5),
            Self::SasManeuverButton => PinSource::b(6),
            Self::SasProgradeButton => PinSource::b(7),
            Self::SasRetrogradeButton => PinSource::b(8),
            Self::SasNormalButton => PinSource::b(9),
            Self::SasAntiNormalButton => PinSource::b(10),
            Self::SasRadialInButton => PinSource::b(11),
            Self::SasRadialOutButton => PinSource::b(12),
            Self::SasTargetButton => PinSource::b(13),
            Self::SasAntiTargetButton => PinSource::b(14),
            Self::SasSwitch => PinSource::b(15),
            Self::RcsSwitch => PinSource::b(16),

            Self::JumpButton => PinSource::Direct(DirectInput::RotationButton),
        }
    }
}

/// Multi-position rotary switch, one input per position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Selector {
    /// Info display page.
    Info,
    /// Direction display mode.
    Direction,
}

impl Selector {
    pub const ALL: [Self; 2] = [Self::Info, Self::Direction];

    /// First bank A bit of the selector.
    pub const fn base_bit(self) -> usize {
        match self {
            Self::Info => 17,
            Self::Direction => 29,
        }
    }

    pub const fn positions(self) -> usize {
        match self {
            Self::Info => 12,
            Self::Direction => 11,
        }
    }

    /// Source for `position`, if the selector has it.
    pub const fn source(self, position: usize) -> Option<PinSource> {
        if position < self.positions() {
            Some(PinSource::a(self.base_bit() + position))
        } else {
            None
        }
    }

    /// Whether `source` is one of this selector's positions.
    pub fn contains(self, source: PinSource) -> bool {
        match source {
            PinSource::Bank {
                bank: InputBank::A,
                bit,
            } => (self.base_bit()..self.base_bit() + self.positions()).contains(&bit),
            _ => false,
        }
    }
}

/// Debounce interval for a raw input.  Selector wipers brush past
/// neighbouring contacts, so they get the longer window.
pub fn debounce_for(source: PinSource, config: &PanelConfig) -> u32 {
    if Selector::ALL.iter().any(|s| s.contains(source)) {
        config.selector_debounce_ms
    } else {
        config.debounce_ms
    }
}

/// Every raw input in flattened order with its debounce interval.
pub fn layout<'a>(
    frame: &'a InputFrame,
    config: &'a PanelConfig,
) -> impl Iterator<Item = (usize, PinSource, u32)> + 'a {
    (0..frame.pin_count()).filter_map(move |flat| {
        let source = frame.source_at(flat)?;
        Some((flat, source, debounce_for(source, config)))
    })
}
