//! GPIO / peripheral pin assignments for the panel main board (ESP32-S3).
//!
//! Single source of truth: the binary builds every pin driver from this
//! module rather than hard-coding pin numbers.  Change a pin here and it
//! propagates everywhere.

// ---------------------------------------------------------------------------
// Shift-out chains (74HC595): indicator LEDs
// ---------------------------------------------------------------------------

/// Chain A: power LED and the first 63 resource-bar LEDs (8 registers).
pub const SHIFT_OUT_A_DATA_GPIO: i32 = 11;
pub const SHIFT_OUT_A_LATCH_GPIO: i32 = 12;
pub const SHIFT_OUT_A_CLOCK_GPIO: i32 = 13;

/// Chain B: remaining resource bars, warnings, stage/abort, CAGs (8 registers).
pub const SHIFT_OUT_B_DATA_GPIO: i32 = 14;
pub const SHIFT_OUT_B_LATCH_GPIO: i32 = 15;
pub const SHIFT_OUT_B_CLOCK_GPIO: i32 = 16;

/// Chain C: SAS mode LEDs (2 registers).
pub const SHIFT_OUT_C_DATA_GPIO: i32 = 17;
pub const SHIFT_OUT_C_LATCH_GPIO: i32 = 18;
pub const SHIFT_OUT_C_CLOCK_GPIO: i32 = 21;

// ---------------------------------------------------------------------------
// Shift-in chains (74HC165): switches and buttons
// ---------------------------------------------------------------------------

/// Chain A: 8 registers, 64 inputs.
pub const SHIFT_IN_A_DATA_GPIO: i32 = 38;
pub const SHIFT_IN_A_CLOCK_ENABLE_GPIO: i32 = 39;
pub const SHIFT_IN_A_CLOCK_GPIO: i32 = 40;
pub const SHIFT_IN_A_LOAD_GPIO: i32 = 41;

/// Chain B: 3 registers, 24 inputs.
pub const SHIFT_IN_B_DATA_GPIO: i32 = 42;
pub const SHIFT_IN_B_CLOCK_ENABLE_GPIO: i32 = 47;
pub const SHIFT_IN_B_CLOCK_GPIO: i32 = 48;
pub const SHIFT_IN_B_LOAD_GPIO: i32 = 10;

// ---------------------------------------------------------------------------
// Analog inputs (ADC1): joysticks, throttle, joystick push buttons
// ---------------------------------------------------------------------------
//
// ADC1 channel N sits on GPIO N+1 on the ESP32-S3.

/// Rotation joystick X (roll).
pub const ROTATION_X_ADC_CHANNEL: u8 = 0;
/// Rotation joystick Y (pitch).
pub const ROTATION_Y_ADC_CHANNEL: u8 = 1;
/// Rotation joystick Z (yaw).
pub const ROTATION_Z_ADC_CHANNEL: u8 = 2;
/// Rotation joystick push button (pulls the line low when pressed).
pub const ROTATION_BUTTON_ADC_CHANNEL: u8 = 3;
/// Translation joystick X (left/right).
pub const TRANSLATION_X_ADC_CHANNEL: u8 = 4;
/// Translation joystick Y (forward/back).
pub const TRANSLATION_Y_ADC_CHANNEL: u8 = 5;
/// Translation joystick Z (up/down).
pub const TRANSLATION_Z_ADC_CHANNEL: u8 = 6;
/// Translation joystick push button (pulls the line low when pressed).
pub const TRANSLATION_BUTTON_ADC_CHANNEL: u8 = 7;
/// Throttle slider.
pub const THROTTLE_ADC_CHANNEL: u8 = 8;

/// Number of ADC1 channels in use.
pub const ADC_CHANNEL_COUNT: u8 = 9;

// ---------------------------------------------------------------------------
// Direct outputs
// ---------------------------------------------------------------------------

/// Piezo speaker enable line.
pub const SPEAKER_GPIO: i32 = 35;
