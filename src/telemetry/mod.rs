//! Reporting policy: what to send, and when.
//!
//! - [`session`]: last-reported values and cycle counters
//! - [`smoother`]: humidity moving average
//! - [`decision`]: threshold / forced transmission decision
//! - [`battery`]: change-driven battery reports

pub mod battery;
pub mod decision;
pub mod session;
pub mod smoother;

pub use battery::{BatteryScheduler, battery_percent};
pub use decision::{DecisionEngine, ReportOutcome, TransmitReason};
pub use session::{CycleCounters, LastReportedState, ReportSession};
pub use smoother::SampleSmoother;
