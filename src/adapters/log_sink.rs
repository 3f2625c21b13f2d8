//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to the
//! logger (UART console in production).  Per-cycle noise goes to `debug`,
//! anything a field technician would want goes to `info` or `warn`.

use log::{debug, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::fsm::SelfTestVerdict;
use crate::fsm::context::ProbeOutcome;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started { children } => {
                info!("START | presented {} children", children);
            }
            AppEvent::MeasurementSent {
                reason,
                temperature_c,
                humidity_pct,
            } => {
                info!(
                    "SEND  | T={:.1}\u{00b0}C H={:.1}% | reason={:?}",
                    temperature_c, humidity_pct, reason
                );
            }
            AppEvent::MeasurementSuppressed {
                temperature_c,
                humidity_pct,
            } => {
                debug!(
                    "QUIET | T={:.1}\u{00b0}C H={:.1}% within thresholds",
                    temperature_c, humidity_pct
                );
            }
            AppEvent::SensorFault(e) => {
                warn!("FAULT | sensor: {}", e);
            }
            AppEvent::BatteryReported {
                millivolts,
                percent,
                forced,
            } => {
                info!(
                    "BATT  | {}mV {}%{}",
                    millivolts,
                    percent,
                    if *forced { " (forced)" } else { "" }
                );
            }
            AppEvent::UpdateWindowOpened { wait_ms } => {
                debug!("OTA   | listening {}ms", wait_ms);
            }
            AppEvent::CycleCompleted(r) => {
                debug!(
                    "CYCLE | #{} forced={} reason={:?} batt={} window={}",
                    r.cycle, r.forced, r.reason, r.battery_reported, r.update_window_opened
                );
            }
            AppEvent::SelfTestProbe { peripheral, outcome } => {
                let text = match outcome {
                    ProbeOutcome::Passed => "ok",
                    ProbeOutcome::Failed => "failed",
                    ProbeOutcome::Pending => "pending",
                };
                info!("TEST  | {} {}", peripheral.name(), text);
            }
            AppEvent::SelfTestFinished(verdict) => match verdict {
                SelfTestVerdict::Passed => info!("TEST  | passed"),
                SelfTestVerdict::Failed => warn!("TEST  | failed"),
            },
        }
    }
}
