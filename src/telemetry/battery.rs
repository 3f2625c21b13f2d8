//! Battery report scheduler.
//!
//! Sends the supply voltage and the derived battery-level percentage only
//! when the reading changed since the last report.  A forced report clears
//! the remembered value first, so it always goes out.

use log::{debug, warn};

use crate::app::events::AppEvent;
use crate::app::ports::{EventSink, RadioPort, SupplyPort};
use crate::config::{CHILD_ID_BATT, NodeConfig};

use super::ReportSession;
use super::session::BATTERY_FORCED;

/// Decimal places used for the voltage child.
const VOLTAGE_PRECISION: u8 = 3;

/// Linear millivolt → percent mapping, truncated and clamped to `0..=100`.
pub fn battery_percent(millivolts: i32, empty_mv: i32, mv_per_percent: i32) -> u8 {
    if mv_per_percent <= 0 {
        return 0;
    }
    ((millivolts - empty_mv) / mv_per_percent).clamp(0, 100) as u8
}

#[derive(Debug, Clone, Copy)]
pub struct BatteryScheduler {
    empty_mv: i32,
    mv_per_percent: i32,
    channel_enabled: bool,
}

impl BatteryScheduler {
    pub fn new(config: &NodeConfig) -> Self {
        Self {
            empty_mv: config.battery_empty_mv,
            mv_per_percent: config.battery_mv_per_percent,
            channel_enabled: config.battery_channel_enabled,
        }
    }

    /// Measure the supply and report it if it changed.
    ///
    /// Returns `true` when anything was put on the air.
    pub fn report(
        &self,
        force: bool,
        session: &mut ReportSession,
        hw: &mut (impl SupplyPort + RadioPort),
        sink: &mut impl EventSink,
    ) -> bool {
        if force {
            session.last.battery_mv = BATTERY_FORCED;
        }

        let millivolts = match hw.read_millivolts() {
            Ok(mv) => mv,
            Err(e) => {
                warn!("Battery: supply read failed: {e}");
                return false;
            }
        };

        if millivolts == session.last.battery_mv {
            debug!("Battery: {millivolts} mV unchanged");
            return false;
        }

        session.last.battery_mv = millivolts;

        if self.channel_enabled {
            let volts = millivolts as f32 / 1000.0;
            if let Err(e) = hw.emit(CHILD_ID_BATT, volts, VOLTAGE_PRECISION) {
                warn!("Battery: voltage emit failed: {e}");
            }
        }

        let percent = battery_percent(millivolts, self.empty_mv, self.mv_per_percent);
        if let Err(e) = hw.emit_battery_percent(percent) {
            warn!("Battery: level emit failed: {e}");
        }

        session.transmitted = true;
        sink.emit(&AppEvent::BatteryReported {
            millivolts,
            percent,
            forced: force,
        });
        true
    }
}
