//! Power adapter: time passing within and between duty cycles.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: the update window is a FreeRTOS delay (radio stays up), the
//! measure interval is a timer-woken light sleep so RAM, and with it the
//! reporting session, survives.
//! On host: both block the calling thread.

use log::debug;

use crate::app::ports::PowerPort;

#[derive(Debug, Default)]
pub struct SystemPower {
    /// Total time slept since construction.
    pub slept_ms: u64,
}

impl SystemPower {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PowerPort for SystemPower {
    fn wait_ms(&mut self, ms: u32) {
        debug!("Power: awake wait {ms} ms");
        delay_ms(ms);
    }

    fn sleep_ms(&mut self, ms: u32) {
        debug!("Power: sleeping {ms} ms");
        light_sleep_ms(ms);
        self.slept_ms += u64::from(ms);
    }
}

#[cfg(target_os = "espidf")]
fn delay_ms(ms: u32) {
    esp_idf_hal::delay::FreeRtos::delay_ms(ms);
}

#[cfg(not(target_os = "espidf"))]
fn delay_ms(ms: u32) {
    std::thread::sleep(std::time::Duration::from_millis(u64::from(ms)));
}

#[cfg(target_os = "espidf")]
fn light_sleep_ms(ms: u32) {
    use esp_idf_svc::sys::{ESP_OK, esp_light_sleep_start, esp_sleep_enable_timer_wakeup};

    // SAFETY: plain ESP-IDF calls from the single duty-cycle thread.
    let ret = unsafe {
        esp_sleep_enable_timer_wakeup(u64::from(ms) * 1_000);
        esp_light_sleep_start()
    };
    if ret != ESP_OK as i32 {
        // Sleep was rejected (e.g. a wakeup source already pending); keep
        // the cadence with an ordinary delay instead.
        log::warn!("Power: light sleep rejected (rc={ret}), delaying");
        delay_ms(ms);
    }
}

#[cfg(not(target_os = "espidf"))]
fn light_sleep_ms(ms: u32) {
    delay_ms(ms);
}
