//! Sensor subsystem: the measurement type and the concrete drivers.
//!
//! [`si7021`] implements [`SensorPort`](crate::app::ports::SensorPort) and
//! [`supply`] implements [`SupplyPort`](crate::app::ports::SupplyPort).  The
//! reporting engine only sees [`MeasurementSample`]s and millivolts.

pub mod si7021;
pub mod supply;

/// One temperature/humidity reading, produced once per duty cycle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MeasurementSample {
    /// Temperature in °C.
    pub temperature_c: f32,
    /// Instantaneous relative humidity in %RH (smoothed by the decision engine).
    pub humidity_pct: f32,
}

impl MeasurementSample {
    pub const fn new(temperature_c: f32, humidity_pct: f32) -> Self {
        Self {
            temperature_c,
            humidity_pct,
        }
    }
}
