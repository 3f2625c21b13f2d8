//! Outbound application events.
//!
//! The [`NodeService`](super::service::NodeService) and
//! [`SelfTest`](super::self_test::SelfTest) emit these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other side
//! decide what to do with them: log to serial, count them in a test, etc.

use crate::error::SensorError;
use crate::fsm::SelfTestVerdict;
use crate::fsm::context::{Peripheral, ProbeOutcome};
use crate::telemetry::TransmitReason;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// Node presented to the controller and ready to run cycles.
    Started { children: usize },

    /// Temperature and smoothed humidity went out.
    MeasurementSent {
        reason: TransmitReason,
        temperature_c: f32,
        humidity_pct: f32,
    },

    /// The sample stayed within both thresholds.
    MeasurementSuppressed { temperature_c: f32, humidity_pct: f32 },

    /// The sensor could not be read this cycle.
    SensorFault(SensorError),

    /// Supply voltage and battery level went out.
    BatteryReported {
        millivolts: i32,
        percent: u8,
        forced: bool,
    },

    /// The radio is held awake for an over-the-air update request.
    UpdateWindowOpened { wait_ms: u32 },

    /// One duty cycle finished; the node is about to sleep.
    CycleCompleted(CycleReport),

    /// A self-test probe finished.
    SelfTestProbe {
        peripheral: Peripheral,
        outcome: ProbeOutcome,
    },

    /// The self-test reached a verdict.
    SelfTestFinished(SelfTestVerdict),
}

/// Summary of a single wake cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CycleReport {
    /// 1-based cycle number since start.
    pub cycle: u64,
    /// The forced-transmit interval elapsed on this wake.
    pub forced: bool,
    /// `Some` when the measurement was transmitted.
    pub reason: Option<TransmitReason>,
    pub battery_reported: bool,
    pub update_window_opened: bool,
    pub sensor_error: Option<SensorError>,
}

impl CycleReport {
    pub fn transmitted(&self) -> bool {
        self.reason.is_some() || self.battery_reported
    }
}
