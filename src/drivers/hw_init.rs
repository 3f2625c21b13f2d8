//! One-shot ADC unit for the battery divider.
//!
//! Configures ADC1 through raw ESP-IDF sys calls and exposes a channel as a
//! [`PolledAdc`] for the [`SupplyMonitor`](crate::sensors::supply::SupplyMonitor).
//! The oneshot driver converts synchronously, so a conversion is complete as
//! soon as the read call returns successfully.  A failed read never
//! completes and the monitor's poll budget turns it into a timeout.
//!
//! On host builds the unit is simulated with a fixed raw reading.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

use crate::sensors::supply::PolledAdc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    AdcInitFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::AdcInitFailed(rc) => write!(f, "ADC1 init failed (rc={})", rc),
        }
    }
}

impl core::error::Error for HwInitError {}

pub struct OneshotAdc {
    #[cfg(target_os = "espidf")]
    handle: adc_oneshot_unit_handle_t,
    #[cfg(target_os = "espidf")]
    channel: u32,
    #[cfg(not(target_os = "espidf"))]
    sim_raw: Option<u16>,
    last: Option<u16>,
}

#[cfg(target_os = "espidf")]
impl OneshotAdc {
    /// Claim ADC1 and configure `channel` for 12-bit reads at 12 dB.
    pub fn new(channel: u32) -> Result<Self, HwInitError> {
        let init_cfg = adc_oneshot_unit_init_cfg_t {
            unit_id: adc_unit_t_ADC_UNIT_1,
            ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
            ..Default::default()
        };
        let mut handle: adc_oneshot_unit_handle_t = core::ptr::null_mut();
        // SAFETY: called once from main() before the duty cycle starts.
        let ret = unsafe { adc_oneshot_new_unit(&init_cfg, &mut handle) };
        if ret != ESP_OK as i32 {
            return Err(HwInitError::AdcInitFailed(ret));
        }

        let chan_cfg = adc_oneshot_chan_cfg_t {
            atten: adc_atten_t_ADC_ATTEN_DB_12,
            bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
        };
        // SAFETY: `handle` was just initialised by adc_oneshot_new_unit.
        let ret = unsafe { adc_oneshot_config_channel(handle, channel, &chan_cfg) };
        if ret != ESP_OK as i32 {
            return Err(HwInitError::AdcInitFailed(ret));
        }

        log::info!("hw_init: ADC1 CH{channel} configured (battery divider)");
        Ok(Self {
            handle,
            channel,
            last: None,
        })
    }

    fn sample(&mut self) -> Option<u16> {
        let mut raw: i32 = 0;
        // SAFETY: handle is valid for the lifetime of self; single-threaded
        // access from the duty cycle.
        let ret = unsafe { adc_oneshot_read(self.handle, self.channel, &mut raw) };
        (ret == ESP_OK as i32).then(|| raw.max(0) as u16)
    }
}

#[cfg(not(target_os = "espidf"))]
impl OneshotAdc {
    /// Simulated unit returning `raw` on every conversion, or never
    /// completing when `None`.
    pub fn simulated(raw: Option<u16>) -> Self {
        Self {
            sim_raw: raw,
            last: None,
        }
    }

    fn sample(&mut self) -> Option<u16> {
        self.sim_raw
    }
}

impl PolledAdc for OneshotAdc {
    fn start_conversion(&mut self) {
        self.last = self.sample();
    }

    fn conversion_complete(&mut self) -> bool {
        self.last.is_some()
    }

    fn read_raw(&mut self) -> u16 {
        self.last.take().unwrap_or(0)
    }
}
