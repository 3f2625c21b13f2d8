//! Node service: the duty-cycle controller and hexagonal core.
//!
//! [`NodeService`] owns the reporting session, the decision engine and the
//! battery scheduler.  All I/O flows through port traits injected at call
//! sites, so the whole policy runs against mock adapters on the host.
//!
//! ```text
//!   SensorPort ──▶ ┌──────────────────────────┐ ──▶ RadioPort
//!   SupplyPort ──▶ │       NodeService        │ ──▶ PowerPort
//!                  │ Session · Decision · Batt│ ──▶ EventSink
//!                  └──────────────────────────┘
//! ```
//!
//! One cycle is always: measure → decide → battery check → (update
//! window) → sleep.

use embedded_hal::digital::InputPin;
use log::{debug, info, warn};

use crate::config::{
    CHILD_ID_BATT, CHILD_ID_HUM, CHILD_ID_TEMP, NodeConfig, SKETCH_NAME, SKETCH_VERSION,
};
use crate::telemetry::{BatteryScheduler, DecisionEngine, ReportSession};

use super::events::{AppEvent, CycleReport};
use super::ports::{ChildKind, ChildSensor, EventSink, PowerPort, RadioPort, SensorPort, SupplyPort};

/// Children presented at startup; the voltage child only when enabled.
const CHILDREN: [ChildSensor; 3] = [
    ChildSensor {
        id: CHILD_ID_TEMP,
        kind: ChildKind::Temperature,
    },
    ChildSensor {
        id: CHILD_ID_HUM,
        kind: ChildKind::Humidity,
    },
    ChildSensor {
        id: CHILD_ID_BATT,
        kind: ChildKind::Power,
    },
];

// ───────────────────────────────────────────────────────────────
// Boot mode
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootMode {
    Normal,
    SelfTest,
}

impl BootMode {
    /// The test pin is pulled up; a jumper to ground selects the self-test.
    /// An unreadable pin boots normally.
    pub fn from_test_pin<P: InputPin>(pin: &mut P) -> Self {
        match pin.is_low() {
            Ok(true) => Self::SelfTest,
            Ok(false) => Self::Normal,
            Err(e) => {
                warn!("Test pin unreadable ({e:?}), booting normally");
                Self::Normal
            }
        }
    }
}

// ───────────────────────────────────────────────────────────────
// NodeService
// ───────────────────────────────────────────────────────────────

/// Where the controller is within a duty cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CyclePhase {
    Idle,
    Measuring,
    AwaitingUpdateWindow,
    Sleeping,
}

pub struct NodeService {
    config: NodeConfig,
    session: ReportSession,
    engine: DecisionEngine,
    battery: BatteryScheduler,
    phase: CyclePhase,
    cycle_count: u64,
}

impl NodeService {
    /// Does **not** talk to the radio; call [`start`](Self::start) next.
    pub fn new(config: NodeConfig) -> Self {
        let engine = DecisionEngine::new(&config);
        let battery = BatteryScheduler::new(&config);
        Self {
            config,
            session: ReportSession::new(),
            engine,
            battery,
            phase: CyclePhase::Idle,
            cycle_count: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Present the node, bring up the sensor and send the first reports.
    ///
    /// Startup transmissions never open an update window.
    pub fn start(
        &mut self,
        hw: &mut (impl SensorPort + RadioPort + SupplyPort),
        sink: &mut impl EventSink,
    ) {
        let children = if self.config.battery_channel_enabled {
            &CHILDREN[..]
        } else {
            &CHILDREN[..2]
        };
        if let Err(e) = hw.present(SKETCH_NAME, SKETCH_VERSION, children) {
            warn!("Presentation failed: {e}");
        }

        if let Err(e) = hw.begin() {
            warn!("Sensor init failed: {e}");
        }
        self.engine.clear_history();

        match hw.read_sample() {
            Ok(sample) => {
                self.engine
                    .report(&mut self.session, sample, false, &self.battery, hw, sink);
            }
            Err(e) => {
                warn!("Initial measurement failed: {e}");
                sink.emit(&AppEvent::SensorFault(e));
            }
        }
        self.battery.report(false, &mut self.session, hw, sink);

        sink.emit(&AppEvent::Started {
            children: children.len(),
        });
        info!("{SKETCH_NAME} {SKETCH_VERSION} online");
    }

    // ── Per-cycle orchestration ───────────────────────────────

    /// Run one full wake cycle, ending with the node asleep for
    /// `measure_interval_ms`.
    pub fn run_cycle(
        &mut self,
        hw: &mut (impl SensorPort + RadioPort + SupplyPort + PowerPort),
        sink: &mut impl EventSink,
    ) -> CycleReport {
        self.cycle_count += 1;
        self.set_phase(CyclePhase::Measuring);

        let forced = self.session.begin_cycle(self.config.force_transmit_interval);
        let mut report = CycleReport {
            cycle: self.cycle_count,
            forced,
            ..CycleReport::default()
        };

        match hw.read_sample() {
            Ok(sample) => {
                let outcome =
                    self.engine
                        .report(&mut self.session, sample, forced, &self.battery, hw, sink);
                report.reason = outcome.reason;
                report.battery_reported = outcome.battery_reported;
            }
            Err(e) => {
                warn!("Sensor read failed: {e}");
                report.sensor_error = Some(e);
                sink.emit(&AppEvent::SensorFault(e));
            }
        }

        if self.session.transmitted && self.config.update_window_enabled {
            self.set_phase(CyclePhase::AwaitingUpdateWindow);
            sink.emit(&AppEvent::UpdateWindowOpened {
                wait_ms: self.config.update_wait_ms,
            });
            hw.wait_ms(self.config.update_wait_ms);
            report.update_window_opened = true;
        }

        sink.emit(&AppEvent::CycleCompleted(report));

        self.set_phase(CyclePhase::Sleeping);
        hw.sleep_ms(self.config.measure_interval_ms);
        self.set_phase(CyclePhase::Idle);

        report
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn phase(&self) -> CyclePhase {
        self.phase
    }

    pub fn session(&self) -> &ReportSession {
        &self.session
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    pub fn cycle_count(&self) -> u64 {
        self.cycle_count
    }

    /// Number of humidity samples currently in the smoothing window.
    pub fn smoothing_len(&self) -> usize {
        self.engine.smoother().len()
    }

    fn set_phase(&mut self, phase: CyclePhase) {
        debug!("Cycle {}: {:?} -> {:?}", self.cycle_count, self.phase, phase);
        self.phase = phase;
    }
}
