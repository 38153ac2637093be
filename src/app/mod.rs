//! Application core: pure domain logic, zero I/O.
//!
//! The control loop turns raw panel scans into debounced logical inputs.
//! All interaction with hardware happens through **port traits** defined
//! in [`ports`], keeping this layer fully testable without real
//! peripherals.

pub mod driver;
pub mod ports;
