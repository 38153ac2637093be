//! One-shot ADC initialization and the analog read path.
//!
//! Configures ADC1 in oneshot mode for the joystick, throttle and
//! joystick-button channels using raw ESP-IDF sys calls.  Called once
//! from `main()` before the control loop starts; the returned [`Adc1`]
//! is handed to the input adapter as its [`AnalogPort`].

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;
#[cfg(target_os = "espidf")]
use log::info;

use crate::app::ports::AnalogPort;
use crate::error::{HardwareError, Result};
use crate::input::AXIS_MAX;
#[cfg(target_os = "espidf")]
use crate::pins;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    AdcInitFailed(i32),
    AdcChannelFailed { channel: u8, rc: i32 },
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::AdcInitFailed(rc) => write!(f, "ADC1 init failed (rc={})", rc),
            Self::AdcChannelFailed { channel, rc } => {
                write!(f, "ADC1 channel {} config failed (rc={})", channel, rc)
            }
        }
    }
}

/// Scale a 12-bit conversion to the panel's 10-bit range.
pub fn scale_reading(raw: i32) -> u16 {
    ((raw.clamp(0, 4095) as u16) >> 2).min(AXIS_MAX)
}

// ── ADC (oneshot) ─────────────────────────────────────────────

/// ADC1 oneshot unit.
pub struct Adc1 {
    #[cfg(target_os = "espidf")]
    handle: adc_oneshot_unit_handle_t,
}

#[cfg(target_os = "espidf")]
pub fn init_adc() -> core::result::Result<Adc1, HwInitError> {
    let init_cfg = adc_oneshot_unit_init_cfg_t {
        unit_id: adc_unit_t_ADC_UNIT_1,
        ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
        ..Default::default()
    };
    let mut handle: adc_oneshot_unit_handle_t = core::ptr::null_mut();
    // SAFETY: called once from main() before the control loop; the handle
    // is owned by the returned Adc1 from here on.
    let ret = unsafe { adc_oneshot_new_unit(&init_cfg, &mut handle) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::AdcInitFailed(ret));
    }

    let chan_cfg = adc_oneshot_chan_cfg_t {
        atten: adc_atten_t_ADC_ATTEN_DB_12,
        bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
    };
    for channel in 0..pins::ADC_CHANNEL_COUNT {
        // SAFETY: handle was created above and is not shared yet.
        let ret = unsafe { adc_oneshot_config_channel(handle, channel as adc_channel_t, &chan_cfg) };
        if ret != ESP_OK as i32 {
            return Err(HwInitError::AdcChannelFailed { channel, rc: ret });
        }
    }

    info!("hw_init: ADC1 configured (CH0-{})", pins::ADC_CHANNEL_COUNT - 1);
    Ok(Adc1 { handle })
}

#[cfg(not(target_os = "espidf"))]
pub fn init_adc() -> core::result::Result<Adc1, HwInitError> {
    log::info!("hw_init(sim): ADC init skipped");
    Ok(Adc1 {})
}

#[cfg(target_os = "espidf")]
impl AnalogPort for Adc1 {
    fn read_channel(&mut self, channel: u8) -> Result<u16> {
        let mut raw: i32 = 0;
        // SAFETY: handle is valid for the life of Adc1; single-threaded
        // main-loop access only.
        let ret = unsafe { adc_oneshot_read(self.handle, channel as adc_channel_t, &mut raw) };
        if ret != ESP_OK as i32 {
            return Err(HardwareError::AdcRead { channel }.into());
        }
        Ok(scale_reading(raw))
    }
}

/// Simulation: every channel sits at mid-scale, so axes are centred and
/// the push buttons read released.
#[cfg(not(target_os = "espidf"))]
impl AnalogPort for Adc1 {
    fn read_channel(&mut self, channel: u8) -> Result<u16> {
        if channel >= crate::pins::ADC_CHANNEL_COUNT {
            return Err(HardwareError::AdcRead { channel }.into());
        }
        Ok(AXIS_MAX / 2 + 1)
    }
}
