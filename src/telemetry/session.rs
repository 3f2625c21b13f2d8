//! Per-process reporting state shared by the decision engine and the
//! battery scheduler.
//!
//! `ReportSession` is owned by the duty-cycle controller and lent out by
//! `&mut` for each step of a cycle; nothing else mutates it.

/// "Never reported" marker for the last-sent values.  Far enough from any
/// real reading that the first cycle always exceeds every threshold.
pub const NEVER_REPORTED: f32 = -100.0;
/// "Never reported" marker for the last-sent supply voltage.
pub const BATTERY_NEVER_REPORTED: i32 = -100;
/// Marker written by a forced battery report so the next reading differs.
pub const BATTERY_FORCED: i32 = -1;

/// Values most recently put on the air.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LastReportedState {
    pub temperature_c: f32,
    pub humidity_pct: f32,
    pub battery_mv: i32,
}

impl Default for LastReportedState {
    fn default() -> Self {
        Self {
            temperature_c: NEVER_REPORTED,
            humidity_pct: NEVER_REPORTED,
            battery_mv: BATTERY_NEVER_REPORTED,
        }
    }
}

/// Wake-cycle counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleCounters {
    /// Cycles since the last measurement transmission.
    pub measure_count: u32,
    /// Cycles since the last opportunistic battery report.
    pub send_battery_count: u32,
}

/// All mutable reporting state of a running node.
#[derive(Debug, Clone, Default)]
pub struct ReportSession {
    pub last: LastReportedState,
    pub counters: CycleCounters,
    /// Set by any emission during the current cycle; cleared at wake.
    pub transmitted: bool,
}

impl ReportSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance both counters for a new wake.  Returns `true` when the
    /// forced-transmit interval has elapsed, in which case the measurement
    /// counter restarts at zero.
    pub fn begin_cycle(&mut self, force_transmit_interval: u32) -> bool {
        self.transmitted = false;
        self.counters.measure_count += 1;
        self.counters.send_battery_count = self.counters.send_battery_count.saturating_add(1);

        if self.counters.measure_count >= force_transmit_interval {
            self.counters.measure_count = 0;
            true
        } else {
            false
        }
    }
}
