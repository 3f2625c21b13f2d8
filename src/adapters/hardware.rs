//! Hardware adapters: bridge concrete drivers to the domain port traits.
//!
//! [`NodeHardware`] bundles what the duty cycle needs; [`SelfTestBoard`]
//! bundles what the self-test probes.  Both only delegate, so the service
//! sees one `&mut` value implementing every port it uses and the drivers
//! stay independently testable.

use crate::app::ports::{
    ChildSensor, IdentityPort, PowerPort, RadioPort, SensorPort, StoragePort, SupplyPort,
};
use crate::error::{IdentityStatus, RadioError, SensorError, StorageError, SupplyError};
use crate::sensors::MeasurementSample;

/// Everything a running node talks to.
pub struct NodeHardware<S, A, R, W> {
    pub sensor: S,
    pub supply: A,
    pub radio: R,
    pub power: W,
}

impl<S, A, R, W> NodeHardware<S, A, R, W> {
    pub fn new(sensor: S, supply: A, radio: R, power: W) -> Self {
        Self {
            sensor,
            supply,
            radio,
            power,
        }
    }
}

// ── SensorPort ────────────────────────────────────────────────

impl<S: SensorPort, A, R, W> SensorPort for NodeHardware<S, A, R, W> {
    fn begin(&mut self) -> Result<(), SensorError> {
        self.sensor.begin()
    }

    fn read_sample(&mut self) -> Result<MeasurementSample, SensorError> {
        self.sensor.read_sample()
    }
}

// ── SupplyPort ────────────────────────────────────────────────

impl<S, A: SupplyPort, R, W> SupplyPort for NodeHardware<S, A, R, W> {
    fn read_millivolts(&mut self) -> Result<i32, SupplyError> {
        self.supply.read_millivolts()
    }
}

// ── RadioPort ─────────────────────────────────────────────────

impl<S, A, R: RadioPort, W> RadioPort for NodeHardware<S, A, R, W> {
    fn present(
        &mut self,
        sketch_name: &str,
        sketch_version: &str,
        children: &[ChildSensor],
    ) -> Result<(), RadioError> {
        self.radio.present(sketch_name, sketch_version, children)
    }

    fn emit(&mut self, child_id: u8, value: f32, precision: u8) -> Result<(), RadioError> {
        self.radio.emit(child_id, value, precision)
    }

    fn emit_battery_percent(&mut self, percent: u8) -> Result<(), RadioError> {
        self.radio.emit_battery_percent(percent)
    }
}

// ── PowerPort ─────────────────────────────────────────────────

impl<S, A, R, W: PowerPort> PowerPort for NodeHardware<S, A, R, W> {
    fn wait_ms(&mut self, ms: u32) {
        self.power.wait_ms(ms);
    }

    fn sleep_ms(&mut self, ms: u32) {
        self.power.sleep_ms(ms);
    }
}

/// Peripherals exercised by the self-test.
pub struct SelfTestBoard<S, F, I> {
    pub sensor: S,
    pub flash: F,
    pub identity: I,
}

impl<S, F, I> SelfTestBoard<S, F, I> {
    pub fn new(sensor: S, flash: F, identity: I) -> Self {
        Self {
            sensor,
            flash,
            identity,
        }
    }
}

impl<S: SensorPort, F, I> SensorPort for SelfTestBoard<S, F, I> {
    fn begin(&mut self) -> Result<(), SensorError> {
        self.sensor.begin()
    }

    fn read_sample(&mut self) -> Result<MeasurementSample, SensorError> {
        self.sensor.read_sample()
    }
}

impl<S, F: StoragePort, I> StoragePort for SelfTestBoard<S, F, I> {
    fn initialize(&mut self) -> Result<(), StorageError> {
        self.flash.initialize()
    }
}

impl<S, F, I: IdentityPort> IdentityPort for SelfTestBoard<S, F, I> {
    fn wake(&mut self) -> Result<(), IdentityStatus> {
        self.identity.wake()
    }

    fn serial_number(&mut self) -> Result<[u8; 9], IdentityStatus> {
        self.identity.serial_number()
    }
}
