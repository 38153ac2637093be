//! Shift-register chain drivers and peripheral initialisation.

pub mod hw_init;
pub mod shift_in;
pub mod shift_out;
