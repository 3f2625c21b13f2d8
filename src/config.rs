//! Node configuration parameters
//!
//! All tunables of the reporting policy.  Resolved once at startup and never
//! changed while the node runs; the optional behaviours (battery voltage
//! channel, post-transmission update window) are plain flags so both paths
//! stay testable in one build.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Sketch name announced to the controller during presentation.
pub const SKETCH_NAME: &str = "Sensebender Micro";
/// Sketch version announced to the controller during presentation.
pub const SKETCH_VERSION: &str = "0.2";

/// Child sensor id for temperature readings.
pub const CHILD_ID_TEMP: u8 = 1;
/// Child sensor id for humidity readings.
pub const CHILD_ID_HUM: u8 = 2;
/// Child sensor id for the supply voltage (when the battery channel is enabled).
pub const CHILD_ID_BATT: u8 = 199;

/// Upper bound on the humidity smoothing window (storage is fixed-size).
pub const MAX_SMOOTHING_WINDOW: usize = 16;

/// Core reporting configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeConfig {
    // --- Timing ---
    /// Deep-sleep duration between wake cycles (milliseconds)
    pub measure_interval_ms: u32,
    /// Number of wake cycles after which a transmission is forced
    pub force_transmit_interval: u32,
    /// Awake wait after a transmission so an update command can arrive (milliseconds)
    pub update_wait_ms: u32,
    /// Whether the post-transmission update window is opened at all
    pub update_window_enabled: bool,

    // --- Thresholds ---
    /// Temperature change (°C) since the last report that triggers a transmission
    pub temp_threshold_c: f32,
    /// Smoothed humidity change (%RH) since the last report that triggers a transmission
    pub humidity_threshold_pct: f32,
    /// Number of humidity samples in the moving average
    pub smoothing_window: usize,

    // --- Battery ---
    /// Cycles after which a transmitting cycle also forces a battery report
    pub battery_report_cycles: u32,
    /// Supply voltage (mV) that maps to 0 %
    pub battery_empty_mv: i32,
    /// Millivolts per percentage point above `battery_empty_mv`
    pub battery_mv_per_percent: i32,
    /// Whether the raw voltage is also sent on [`CHILD_ID_BATT`]
    pub battery_channel_enabled: bool,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            // Timing
            measure_interval_ms: 60_000, // 60 s
            force_transmit_interval: 30, // every 30 min at 60 s cycles
            update_wait_ms: 300,
            update_window_enabled: true,

            // Thresholds
            temp_threshold_c: 0.3,
            humidity_threshold_pct: 0.3,
            smoothing_window: 2,

            // Battery
            battery_report_cycles: 60,
            battery_empty_mv: 1900, // lowest operating voltage
            battery_mv_per_percent: 14,
            battery_channel_enabled: true,
        }
    }
}

impl NodeConfig {
    /// Reject values that would stall or break the reporting policy.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.measure_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed("measure_interval_ms must be > 0"));
        }
        if self.force_transmit_interval == 0 {
            return Err(ConfigError::ValidationFailed(
                "force_transmit_interval must be > 0",
            ));
        }
        if !(1..=MAX_SMOOTHING_WINDOW).contains(&self.smoothing_window) {
            return Err(ConfigError::ValidationFailed(
                "smoothing_window must be within 1..=16",
            ));
        }
        if !self.temp_threshold_c.is_finite() || self.temp_threshold_c < 0.0 {
            return Err(ConfigError::ValidationFailed(
                "temp_threshold_c must be finite and non-negative",
            ));
        }
        if !self.humidity_threshold_pct.is_finite() || self.humidity_threshold_pct < 0.0 {
            return Err(ConfigError::ValidationFailed(
                "humidity_threshold_pct must be finite and non-negative",
            ));
        }
        if self.battery_mv_per_percent <= 0 {
            return Err(ConfigError::ValidationFailed(
                "battery_mv_per_percent must be > 0",
            ));
        }
        Ok(())
    }

    /// Compact JSON rendering for the boot log.
    pub fn to_json(&self) -> Option<serde_json::Value> {
        serde_json::to_value(self).ok()
    }
}
