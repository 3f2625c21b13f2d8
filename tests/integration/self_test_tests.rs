//! Integration tests: peripheral self-test through the public API.

use sensenode::app::events::AppEvent;
use sensenode::app::ports::{IdentityPort, SensorPort, StoragePort};
use sensenode::app::self_test::SelfTest;
use sensenode::drivers::led_patterns::{SignalPattern, SignalPatternEngine};
use sensenode::error::{Error, IdentityStatus, SensorError, StorageError};
use sensenode::fsm::SelfTestVerdict;
use sensenode::fsm::context::{Peripheral, ProbeOutcome};
use sensenode::sensors::MeasurementSample;

use crate::mock_hw::RecordingSink;

const SERIAL: [u8; 9] = [0x01, 0x23, 0x6A, 0x3B, 0xC4, 0x55, 0x19, 0x02, 0xEE];

struct Bench {
    sensor: Result<(), SensorError>,
    flash: Result<(), StorageError>,
    wake: Result<(), IdentityStatus>,
    serial: Result<[u8; 9], IdentityStatus>,
    calls: Vec<&'static str>,
}

impl Bench {
    fn healthy() -> Self {
        Self {
            sensor: Ok(()),
            flash: Ok(()),
            wake: Ok(()),
            serial: Ok(SERIAL),
            calls: Vec::new(),
        }
    }
}

impl SensorPort for Bench {
    fn begin(&mut self) -> Result<(), SensorError> {
        self.calls.push("sensor");
        self.sensor
    }

    fn read_sample(&mut self) -> Result<MeasurementSample, SensorError> {
        Ok(MeasurementSample::default())
    }
}

impl StoragePort for Bench {
    fn initialize(&mut self) -> Result<(), StorageError> {
        self.calls.push("flash");
        self.flash
    }
}

impl IdentityPort for Bench {
    fn wake(&mut self) -> Result<(), IdentityStatus> {
        self.calls.push("wake");
        self.wake
    }

    fn serial_number(&mut self) -> Result<[u8; 9], IdentityStatus> {
        self.calls.push("serial");
        self.serial
    }
}

fn run(bench: &mut Bench) -> (SelfTestVerdict, SelfTest<Bench>, RecordingSink) {
    let mut test = SelfTest::new();
    let mut sink = RecordingSink::new();
    let verdict = test.run(bench, &mut sink);
    (verdict, test, sink)
}

#[test]
fn healthy_board_passes_and_blinks() {
    let mut bench = Bench::healthy();
    let (verdict, test, _) = run(&mut bench);

    assert_eq!(verdict, SelfTestVerdict::Passed);
    assert_eq!(bench.calls, vec!["sensor", "flash", "wake", "serial"]);
    assert_eq!(test.context().serial, Some(SERIAL));
    assert_eq!(
        verdict.signal_pattern(),
        SignalPattern::Blink { half_period_ms: 200 }
    );
}

#[test]
fn probe_events_arrive_in_order_then_verdict() {
    let mut bench = Bench::healthy();
    bench.flash = Err(StorageError::UnexpectedJedecId(0xEF40));
    let (_, _, sink) = run(&mut bench);

    assert_eq!(
        sink.events,
        vec![
            AppEvent::SelfTestProbe {
                peripheral: Peripheral::Sensor,
                outcome: ProbeOutcome::Passed
            },
            AppEvent::SelfTestProbe {
                peripheral: Peripheral::Storage,
                outcome: ProbeOutcome::Failed
            },
            AppEvent::SelfTestProbe {
                peripheral: Peripheral::Identity,
                outcome: ProbeOutcome::Passed
            },
            AppEvent::SelfTestFinished(SelfTestVerdict::Failed),
        ]
    );
}

#[test]
fn any_single_failure_fails_with_solid_led() {
    let failures: [fn(&mut Bench); 4] = [
        |b| b.sensor = Err(SensorError::Bus),
        |b| b.flash = Err(StorageError::Bus),
        |b| b.wake = Err(IdentityStatus::RX_NO_RESPONSE),
        |b| b.serial = Err(IdentityStatus::BAD_CRC),
    ];
    for (i, break_it) in failures.iter().enumerate() {
        let mut bench = Bench::healthy();
        break_it(&mut bench);
        let (verdict, test, _) = run(&mut bench);
        assert_eq!(verdict, SelfTestVerdict::Failed, "failure #{i}");
        assert_eq!(verdict.signal_pattern(), SignalPattern::Solid);
        assert_eq!(test.context().passed_count(), 2, "failure #{i}");
    }
}

#[test]
fn wake_failure_keeps_chip_status_and_skips_serial() {
    let mut bench = Bench::healthy();
    bench.wake = Err(IdentityStatus::COMM_FAIL);
    let (_, test, _) = run(&mut bench);

    assert!(!bench.calls.contains(&"serial"));
    assert_eq!(test.context().identity_status(), Some(IdentityStatus::COMM_FAIL));
    assert_eq!(test.context().identity_status().map(|s| s.code()), Some(0xF0));
    assert_eq!(
        test.context().fault(Peripheral::Identity),
        Some(Error::Identity(IdentityStatus::COMM_FAIL))
    );
}

#[test]
fn every_probe_runs_even_when_all_fail() {
    let mut bench = Bench {
        sensor: Err(SensorError::Bus),
        flash: Err(StorageError::Bus),
        wake: Err(IdentityStatus::RX_NO_RESPONSE),
        serial: Err(IdentityStatus::RX_NO_RESPONSE),
        calls: Vec::new(),
    };
    let (verdict, test, _) = run(&mut bench);
    assert_eq!(verdict, SelfTestVerdict::Failed);
    assert_eq!(bench.calls, vec!["sensor", "flash", "wake"]);
    assert_eq!(test.context().passed_count(), 0);
}

#[test]
fn passed_pattern_toggles_every_200ms() {
    let mut engine = SignalPatternEngine::new(SelfTestVerdict::Passed.signal_pattern());
    let levels: Vec<bool> = (0..4).map(|_| engine.tick(200)).collect();
    assert_eq!(levels, vec![false, true, false, true]);
}
