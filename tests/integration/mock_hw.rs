//! Mock node adapter for integration tests.
//!
//! Serves scripted sensor samples and supply readings, and records every
//! radio emission, awake wait and sleep so tests can assert on the full
//! history without a bus or a radio.

use std::collections::VecDeque;

use sensenode::app::events::AppEvent;
use sensenode::app::ports::{
    ChildSensor, EventSink, PowerPort, RadioPort, SensorPort, SupplyPort,
};
use sensenode::config::{CHILD_ID_BATT, CHILD_ID_HUM, CHILD_ID_TEMP};
use sensenode::error::{RadioError, SensorError, SupplyError};
use sensenode::sensors::MeasurementSample;

// ── Recorded calls ────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum RadioCall {
    Present { sketch: String, version: String, children: Vec<ChildSensor> },
    Emit { child_id: u8, value: f32, precision: u8 },
    BatteryPercent(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerCall {
    Wait(u32),
    Sleep(u32),
}

// ── MockNode ──────────────────────────────────────────────────

pub struct MockNode {
    /// Returned by `read_sample` when the script is exhausted.
    pub sample: MeasurementSample,
    pub script: VecDeque<Result<MeasurementSample, SensorError>>,
    pub millivolts: Result<i32, SupplyError>,
    pub begin_result: Result<(), SensorError>,
    pub radio_fails: bool,
    pub radio: Vec<RadioCall>,
    pub power: Vec<PowerCall>,
    pub begin_calls: u32,
}

#[allow(dead_code)]
impl MockNode {
    pub fn new(temperature_c: f32, humidity_pct: f32, millivolts: i32) -> Self {
        Self {
            sample: MeasurementSample::new(temperature_c, humidity_pct),
            script: VecDeque::new(),
            millivolts: Ok(millivolts),
            begin_result: Ok(()),
            radio_fails: false,
            radio: Vec::new(),
            power: Vec::new(),
            begin_calls: 0,
        }
    }

    /// Queue one-off sensor results ahead of the steady `sample`.
    pub fn push_sample(&mut self, result: Result<MeasurementSample, SensorError>) {
        self.script.push_back(result);
    }

    pub fn set_sample(&mut self, temperature_c: f32, humidity_pct: f32) {
        self.sample = MeasurementSample::new(temperature_c, humidity_pct);
    }

    pub fn clear_history(&mut self) {
        self.radio.clear();
        self.power.clear();
    }

    /// Values emitted on `child_id`, in order.
    pub fn emitted(&self, child_id: u8) -> Vec<f32> {
        self.radio
            .iter()
            .filter_map(|c| match c {
                RadioCall::Emit { child_id: id, value, .. } if *id == child_id => Some(*value),
                _ => None,
            })
            .collect()
    }

    pub fn temperature_emits(&self) -> usize {
        self.emitted(CHILD_ID_TEMP).len()
    }

    pub fn humidity_emits(&self) -> Vec<f32> {
        self.emitted(CHILD_ID_HUM)
    }

    pub fn voltage_emits(&self) -> Vec<f32> {
        self.emitted(CHILD_ID_BATT)
    }

    pub fn battery_percents(&self) -> Vec<u8> {
        self.radio
            .iter()
            .filter_map(|c| match c {
                RadioCall::BatteryPercent(p) => Some(*p),
                _ => None,
            })
            .collect()
    }

    pub fn waits(&self) -> Vec<u32> {
        self.power
            .iter()
            .filter_map(|c| match c {
                PowerCall::Wait(ms) => Some(*ms),
                PowerCall::Sleep(_) => None,
            })
            .collect()
    }

    pub fn sleeps(&self) -> Vec<u32> {
        self.power
            .iter()
            .filter_map(|c| match c {
                PowerCall::Sleep(ms) => Some(*ms),
                PowerCall::Wait(_) => None,
            })
            .collect()
    }
}

impl SensorPort for MockNode {
    fn begin(&mut self) -> Result<(), SensorError> {
        self.begin_calls += 1;
        self.begin_result
    }

    fn read_sample(&mut self) -> Result<MeasurementSample, SensorError> {
        self.script.pop_front().unwrap_or(Ok(self.sample))
    }
}

impl SupplyPort for MockNode {
    fn read_millivolts(&mut self) -> Result<i32, SupplyError> {
        self.millivolts
    }
}

impl RadioPort for MockNode {
    fn present(
        &mut self,
        sketch_name: &str,
        sketch_version: &str,
        children: &[ChildSensor],
    ) -> Result<(), RadioError> {
        self.radio.push(RadioCall::Present {
            sketch: sketch_name.to_owned(),
            version: sketch_version.to_owned(),
            children: children.to_vec(),
        });
        Ok(())
    }

    fn emit(&mut self, child_id: u8, value: f32, precision: u8) -> Result<(), RadioError> {
        if self.radio_fails {
            return Err(RadioError::Transport);
        }
        self.radio.push(RadioCall::Emit {
            child_id,
            value,
            precision,
        });
        Ok(())
    }

    fn emit_battery_percent(&mut self, percent: u8) -> Result<(), RadioError> {
        if self.radio_fails {
            return Err(RadioError::Transport);
        }
        self.radio.push(RadioCall::BatteryPercent(percent));
        Ok(())
    }
}

impl PowerPort for MockNode {
    fn wait_ms(&mut self, ms: u32) {
        self.power.push(PowerCall::Wait(ms));
    }

    fn sleep_ms(&mut self, ms: u32) {
        self.power.push(PowerCall::Sleep(ms));
    }
}

// ── Recording event sink ──────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
