//! Port traits: the hexagonal boundary between the reporting policy and the
//! node's collaborators.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ NodeService / SelfTest (domain)
//! ```
//!
//! Drivers and adapters implement these traits.  The
//! [`NodeService`](super::service::NodeService) and the self-test state
//! machine consume them via generics, so the policy never touches a bus or a
//! register directly and every path runs against mocks on the host.

use crate::error::{IdentityStatus, RadioError, SensorError, StorageError, SupplyError};
use crate::sensors::MeasurementSample;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Temperature/humidity acquisition.
pub trait SensorPort {
    /// Initialise the sensor.  Only the self-test treats failure as a verdict.
    fn begin(&mut self) -> Result<(), SensorError>;

    /// Take one temperature + humidity reading.
    fn read_sample(&mut self) -> Result<MeasurementSample, SensorError>;
}

// ───────────────────────────────────────────────────────────────
// Supply port (driven adapter: ADC → domain)
// ───────────────────────────────────────────────────────────────

/// Instantaneous supply voltage.
pub trait SupplyPort {
    /// Blocking, bounded read of the supply voltage in millivolts.
    fn read_millivolts(&mut self) -> Result<i32, SupplyError>;
}

// ───────────────────────────────────────────────────────────────
// Radio port (driven adapter: domain → network)
// ───────────────────────────────────────────────────────────────

/// Kind of a child sensor announced during presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ChildKind {
    Temperature,
    Humidity,
    Power,
}

/// One child sensor announced to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChildSensor {
    pub id: u8,
    pub kind: ChildKind,
}

/// Outbound telemetry.
///
/// Implementations deliver on a best-effort basis; the engine logs failures
/// and carries on.
pub trait RadioPort {
    /// Register the node and its children with the controller.  Called once
    /// before normal operation.
    fn present(
        &mut self,
        sketch_name: &str,
        sketch_version: &str,
        children: &[ChildSensor],
    ) -> Result<(), RadioError>;

    /// Send a value on a child channel with `precision` decimals.
    fn emit(&mut self, child_id: u8, value: f32, precision: u8) -> Result<(), RadioError>;

    /// Send the standardised battery-level percentage.
    fn emit_battery_percent(&mut self, percent: u8) -> Result<(), RadioError>;
}

// ───────────────────────────────────────────────────────────────
// Power port (driven adapter: domain → sleep controller)
// ───────────────────────────────────────────────────────────────

/// Time passing between and within duty cycles.
pub trait PowerPort {
    /// Stay awake (radio listening) for `ms` milliseconds.
    fn wait_ms(&mut self, ms: u32);

    /// Enter low-power sleep for `ms` milliseconds.
    fn sleep_ms(&mut self, ms: u32);
}

// ───────────────────────────────────────────────────────────────
// Self-test only ports
// ───────────────────────────────────────────────────────────────

/// External flash storage.
pub trait StoragePort {
    /// Bring the flash out of power-down and verify its identity.
    fn initialize(&mut self) -> Result<(), StorageError>;
}

/// Cryptographic identity chip.
pub trait IdentityPort {
    /// Wake the chip from sleep.
    fn wake(&mut self) -> Result<(), IdentityStatus>;

    /// Read the 9-byte factory serial number.  Requires a prior [`wake`](Self::wake).
    fn serial_number(&mut self) -> Result<[u8; 9], IdentityStatus>;
}

/// Everything the self-test state machine probes.
pub trait SelfTestPorts: SensorPort + StoragePort + IdentityPort {}

impl<T: SensorPort + StoragePort + IdentityPort> SelfTestPorts for T {}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
