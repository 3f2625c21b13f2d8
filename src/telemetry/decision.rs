//! Transmission decision engine.
//!
//! Compares a fresh sample against what was last put on the air and decides
//! whether this cycle transmits.  Humidity is compared (and sent) as the
//! smoothed value; temperature is compared raw.
//!
//! Transmit when, checked in order:
//!
//! 1. the controller forced it (interval elapsed),
//! 2. the humidity difference is NaN (no baseline yet),
//! 3. `|Δtemperature| ≥ temp_threshold_c`,
//! 4. `|Δhumidity| ≥ humidity_threshold_pct`.
//!
//! A transmitting cycle also checks whether the opportunistic battery
//! report is due.

use log::{debug, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::{EventSink, RadioPort, SupplyPort};
use crate::config::{CHILD_ID_HUM, CHILD_ID_TEMP, NodeConfig};
use crate::sensors::MeasurementSample;

use super::{BatteryScheduler, ReportSession, SampleSmoother};

const MEASUREMENT_PRECISION: u8 = 1;

/// First condition that made a cycle transmit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransmitReason {
    Forced,
    /// Humidity difference was NaN (empty window or unreported baseline).
    NoBaseline,
    Temperature,
    Humidity,
}

/// What a single decision step did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportOutcome {
    /// `Some` when the measurement was transmitted.
    pub reason: Option<TransmitReason>,
    /// The opportunistic battery report ran and sent something.
    pub battery_reported: bool,
}

pub struct DecisionEngine {
    smoother: SampleSmoother,
    temp_threshold_c: f32,
    humidity_threshold_pct: f32,
    battery_report_cycles: u32,
}

impl DecisionEngine {
    pub fn new(config: &NodeConfig) -> Self {
        Self {
            smoother: SampleSmoother::new(config.smoothing_window),
            temp_threshold_c: config.temp_threshold_c,
            humidity_threshold_pct: config.humidity_threshold_pct,
            battery_report_cycles: config.battery_report_cycles,
        }
    }

    pub fn smoother(&self) -> &SampleSmoother {
        &self.smoother
    }

    /// Drop every buffered humidity sample.
    pub fn clear_history(&mut self) {
        self.smoother.clear();
    }

    /// Classify the sample against the last reported state.
    ///
    /// Pushes the humidity into the smoothing window; returns the reason to
    /// transmit (if any) and the smoothed humidity.
    pub fn evaluate(
        &mut self,
        session: &ReportSession,
        sample: MeasurementSample,
        force: bool,
    ) -> (Option<TransmitReason>, f32) {
        let diff_temp = (session.last.temperature_c - sample.temperature_c).abs();

        self.smoother.add_value(sample.humidity_pct);
        let humidity = self.smoother.average();
        let diff_hum = (session.last.humidity_pct - humidity).abs();

        debug!("Decision: dT={diff_temp:.2} dH={diff_hum:.2} force={force}");

        let reason = if force {
            Some(TransmitReason::Forced)
        } else if diff_hum.is_nan() {
            Some(TransmitReason::NoBaseline)
        } else if diff_temp >= self.temp_threshold_c {
            Some(TransmitReason::Temperature)
        } else if diff_hum >= self.humidity_threshold_pct {
            Some(TransmitReason::Humidity)
        } else {
            None
        };

        (reason, humidity)
    }

    /// Run one decision step and perform whatever transmissions it implies.
    pub fn report(
        &mut self,
        session: &mut ReportSession,
        sample: MeasurementSample,
        force: bool,
        battery: &BatteryScheduler,
        hw: &mut (impl RadioPort + SupplyPort),
        sink: &mut impl EventSink,
    ) -> ReportOutcome {
        let (reason, humidity) = self.evaluate(session, sample, force);

        let Some(reason) = reason else {
            sink.emit(&AppEvent::MeasurementSuppressed {
                temperature_c: sample.temperature_c,
                humidity_pct: humidity,
            });
            return ReportOutcome::default();
        };

        session.counters.measure_count = 0;

        if let Err(e) = hw.emit(CHILD_ID_TEMP, sample.temperature_c, MEASUREMENT_PRECISION) {
            warn!("Decision: temperature emit failed: {e}");
        }
        if let Err(e) = hw.emit(CHILD_ID_HUM, humidity, MEASUREMENT_PRECISION) {
            warn!("Decision: humidity emit failed: {e}");
        }

        session.last.temperature_c = sample.temperature_c;
        session.last.humidity_pct = humidity;
        session.transmitted = true;

        info!(
            "Sent T={:.1}C H={:.1}% ({:?})",
            sample.temperature_c, humidity, reason
        );
        sink.emit(&AppEvent::MeasurementSent {
            reason,
            temperature_c: sample.temperature_c,
            humidity_pct: humidity,
        });

        let mut battery_reported = false;
        if session.counters.send_battery_count > self.battery_report_cycles {
            battery_reported = battery.report(true, session, hw, sink);
            session.counters.send_battery_count = 0;
        }

        ReportOutcome {
            reason: Some(reason),
            battery_reported,
        }
    }
}
