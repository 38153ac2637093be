//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements  | Connects to                         |
//! |------------|-------------|-------------------------------------|
//! | `hardware` | InputPort   | 74HC165 chains A/B, ADC1            |
//! |            | OutputPort  | 74HC595 chains A/B/C, speaker GPIO  |
//! | `time`     | ClockPort   | ESP32 system timer                  |
//!
//! The ADC side of [`AnalogPort`](crate::app::ports::AnalogPort) lives in
//! [`drivers::hw_init`](crate::drivers::hw_init).

pub mod hardware;
pub mod time;
