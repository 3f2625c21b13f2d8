//! Integration tests: NodeService duty cycle with mock hardware.
//!
//! Covers startup presentation, threshold and forced transmissions, counter
//! resynchronisation, the opportunistic battery report and the update
//! window.

use sensenode::app::events::AppEvent;
use sensenode::app::ports::ChildKind;
use sensenode::app::service::{CyclePhase, NodeService};
use sensenode::config::{CHILD_ID_BATT, NodeConfig, SKETCH_NAME, SKETCH_VERSION};
use sensenode::error::{SensorError, SupplyError};
use sensenode::telemetry::TransmitReason;

use crate::mock_hw::{MockNode, PowerCall, RadioCall, RecordingSink};

fn started(node: &mut MockNode, config: NodeConfig) -> (NodeService, RecordingSink) {
    let mut svc = NodeService::new(config);
    let mut sink = RecordingSink::new();
    svc.start(node, &mut sink);
    node.clear_history();
    (svc, sink)
}

fn quiet_node() -> MockNode {
    MockNode::new(21.0, 45.0, 3000)
}

// ── Startup ───────────────────────────────────────────────────

#[test]
fn start_presents_sketch_and_children() {
    let mut node = quiet_node();
    let mut svc = NodeService::new(NodeConfig::default());
    let mut sink = RecordingSink::new();
    svc.start(&mut node, &mut sink);

    match &node.radio[0] {
        RadioCall::Present {
            sketch,
            version,
            children,
        } => {
            assert_eq!(sketch, SKETCH_NAME);
            assert_eq!(version, SKETCH_VERSION);
            let kinds: Vec<_> = children.iter().map(|c| c.kind).collect();
            assert_eq!(
                kinds,
                vec![ChildKind::Temperature, ChildKind::Humidity, ChildKind::Power]
            );
        }
        other => panic!("expected presentation first, got {other:?}"),
    }
    assert_eq!(node.begin_calls, 1);
    assert!(sink.events.contains(&AppEvent::Started { children: 3 }));
}

#[test]
fn start_sends_initial_measurement_and_battery() {
    let mut node = quiet_node();
    let mut svc = NodeService::new(NodeConfig::default());
    let mut sink = RecordingSink::new();
    svc.start(&mut node, &mut sink);

    assert_eq!(node.temperature_emits(), 1);
    assert_eq!(node.humidity_emits(), vec![45.0]);
    assert_eq!(node.voltage_emits(), vec![3.0]);
    assert_eq!(node.battery_percents(), vec![78]);
    assert_eq!(svc.session().last.battery_mv, 3000);
}

#[test]
fn start_never_opens_update_window_or_sleeps() {
    let mut node = quiet_node();
    let mut svc = NodeService::new(NodeConfig::default());
    svc.start(&mut node, &mut RecordingSink::new());
    assert!(node.power.is_empty());
    assert_eq!(svc.phase(), CyclePhase::Idle);
}

#[test]
fn failed_sensor_init_is_not_fatal() {
    let mut node = quiet_node();
    node.begin_result = Err(SensorError::UnknownDevice(0x32));
    let mut svc = NodeService::new(NodeConfig::default());
    svc.start(&mut node, &mut RecordingSink::new());
    assert_eq!(node.temperature_emits(), 1);
}

#[test]
fn battery_channel_disabled_presents_two_children() {
    let mut node = quiet_node();
    let config = NodeConfig {
        battery_channel_enabled: false,
        ..NodeConfig::default()
    };
    let mut svc = NodeService::new(config);
    svc.start(&mut node, &mut RecordingSink::new());

    match &node.radio[0] {
        RadioCall::Present { children, .. } => assert_eq!(children.len(), 2),
        other => panic!("expected presentation first, got {other:?}"),
    }
    assert!(node.voltage_emits().is_empty());
    assert_eq!(node.battery_percents(), vec![78]);
}

// ── First cycle without startup ───────────────────────────────

#[test]
fn first_cycle_always_transmits() {
    let mut node = quiet_node();
    let mut svc = NodeService::new(NodeConfig::default());
    let mut sink = RecordingSink::new();

    let report = svc.run_cycle(&mut node, &mut sink);

    assert_eq!(report.cycle, 1);
    assert_eq!(report.reason, Some(TransmitReason::Temperature));
    assert!(report.update_window_opened);
    assert_eq!(node.power, vec![PowerCall::Wait(300), PowerCall::Sleep(60_000)]);
    assert_eq!(svc.phase(), CyclePhase::Idle);
}

// ── Suppression and thresholds ────────────────────────────────

#[test]
fn unchanged_sample_is_suppressed_and_node_sleeps() {
    let mut node = quiet_node();
    let (mut svc, mut sink) = started(&mut node, NodeConfig::default());
    let before = svc.session().last;

    node.set_sample(21.2, 45.2);
    let report = svc.run_cycle(&mut node, &mut sink);

    assert_eq!(report.reason, None);
    assert_eq!(svc.session().last, before);
    assert!(!report.transmitted());
    assert!(!report.update_window_opened);
    assert!(node.radio.is_empty());
    assert_eq!(node.power, vec![PowerCall::Sleep(60_000)]);
}

#[test]
fn temperature_jump_transmits() {
    let mut node = quiet_node();
    let (mut svc, mut sink) = started(&mut node, NodeConfig::default());

    node.set_sample(21.5, 45.0);
    let report = svc.run_cycle(&mut node, &mut sink);

    assert_eq!(report.reason, Some(TransmitReason::Temperature));
    assert_eq!(node.emitted(1), vec![21.5]);
    assert_eq!(svc.session().last.temperature_c, 21.5);
    assert_eq!(node.waits(), vec![300]);
}

#[test]
fn humidity_is_emitted_smoothed() {
    let mut node = quiet_node();
    let (mut svc, mut sink) = started(&mut node, NodeConfig::default());

    // window [45.0, 46.0] → 45.5
    node.set_sample(21.0, 46.0);
    let report = svc.run_cycle(&mut node, &mut sink);

    assert_eq!(report.reason, Some(TransmitReason::Humidity));
    assert_eq!(node.humidity_emits(), vec![45.5]);
    assert_eq!(svc.session().last.humidity_pct, 45.5);
    assert_eq!(svc.smoothing_len(), 2);
}

#[test]
fn nan_humidity_transmits() {
    let mut node = quiet_node();
    let config = NodeConfig {
        smoothing_window: 1,
        ..NodeConfig::default()
    };
    let (mut svc, mut sink) = started(&mut node, config);

    node.set_sample(21.0, f32::NAN);
    let report = svc.run_cycle(&mut node, &mut sink);
    assert_eq!(report.reason, Some(TransmitReason::NoBaseline));
}

// ── Forced interval and counter resync ────────────────────────

#[test]
fn forced_after_interval_of_quiet_cycles() {
    let mut node = quiet_node();
    let (mut svc, mut sink) = started(&mut node, NodeConfig::default());

    for cycle in 1..30 {
        let report = svc.run_cycle(&mut node, &mut sink);
        assert_eq!(report.reason, None, "cycle {cycle} should be quiet");
    }
    let report = svc.run_cycle(&mut node, &mut sink);
    assert!(report.forced);
    assert_eq!(report.reason, Some(TransmitReason::Forced));
    assert_eq!(svc.session().counters.measure_count, 0);
}

#[test]
fn threshold_transmission_resets_forced_interval() {
    let mut node = quiet_node();
    let (mut svc, mut sink) = started(&mut node, NodeConfig::default());

    for _ in 0..9 {
        svc.run_cycle(&mut node, &mut sink);
    }
    node.set_sample(22.0, 45.0);
    assert_eq!(
        svc.run_cycle(&mut node, &mut sink).reason,
        Some(TransmitReason::Temperature)
    );

    // 29 quiet cycles, then the 30th since the threshold send is forced.
    for _ in 0..29 {
        assert_eq!(svc.run_cycle(&mut node, &mut sink).reason, None);
    }
    let report = svc.run_cycle(&mut node, &mut sink);
    assert_eq!(report.cycle, 40);
    assert_eq!(report.reason, Some(TransmitReason::Forced));
}

// ── Battery ───────────────────────────────────────────────────

#[test]
fn opportunistic_battery_rides_on_a_transmitting_cycle() {
    let mut node = quiet_node();
    let (mut svc, mut sink) = started(&mut node, NodeConfig::default());

    let mut battery_cycles = Vec::new();
    for _ in 0..90 {
        let report = svc.run_cycle(&mut node, &mut sink);
        if report.battery_reported {
            battery_cycles.push(report.cycle);
        }
    }

    // Forced sends at 30, 60, 90; only at 90 has the battery counter
    // exceeded 60.  The reading never changed, yet the report is forced out.
    assert_eq!(battery_cycles, vec![90]);
    assert_eq!(node.battery_percents(), vec![78]);
    assert_eq!(svc.session().counters.send_battery_count, 0);
}

#[test]
fn battery_counter_keeps_growing_on_quiet_cycles() {
    let config = NodeConfig {
        force_transmit_interval: 1_000,
        ..NodeConfig::default()
    };
    let mut node = quiet_node();
    let (mut svc, mut sink) = started(&mut node, config);

    for _ in 0..100 {
        svc.run_cycle(&mut node, &mut sink);
    }
    assert!(node.battery_percents().is_empty());
    assert_eq!(svc.session().counters.send_battery_count, 100);

    node.set_sample(25.0, 45.0);
    let report = svc.run_cycle(&mut node, &mut sink);
    assert!(report.battery_reported);
    assert_eq!(node.voltage_emits(), vec![3.0]);
}

#[test]
fn supply_failure_skips_battery_report() {
    let mut node = quiet_node();
    node.millivolts = Err(SupplyError::ConversionTimeout);
    let mut svc = NodeService::new(NodeConfig::default());
    svc.start(&mut node, &mut RecordingSink::new());

    assert!(node.battery_percents().is_empty());
    assert_eq!(svc.session().last.battery_mv, -100);
    assert_eq!(node.temperature_emits(), 1);
}

// ── Faults ────────────────────────────────────────────────────

#[test]
fn sensor_error_skips_decision_but_advances_counters() {
    let mut node = quiet_node();
    let (mut svc, mut sink) = started(&mut node, NodeConfig::default());

    node.push_sample(Err(SensorError::Crc));
    let report = svc.run_cycle(&mut node, &mut sink);

    assert_eq!(report.sensor_error, Some(SensorError::Crc));
    assert_eq!(report.reason, None);
    assert!(node.radio.is_empty());
    assert_eq!(node.sleeps(), vec![60_000]);
    assert_eq!(svc.session().counters.measure_count, 1);
    assert_eq!(svc.session().counters.send_battery_count, 1);
    assert!(sink.events.contains(&AppEvent::SensorFault(SensorError::Crc)));
}

#[test]
fn radio_failure_still_counts_as_transmitted() {
    let mut node = quiet_node();
    let (mut svc, mut sink) = started(&mut node, NodeConfig::default());

    node.radio_fails = true;
    node.set_sample(23.0, 45.0);
    let report = svc.run_cycle(&mut node, &mut sink);

    assert_eq!(report.reason, Some(TransmitReason::Temperature));
    assert!(report.update_window_opened);
    assert_eq!(svc.session().last.temperature_c, 23.0);
}

// ── Update window ─────────────────────────────────────────────

#[test]
fn update_window_can_be_disabled() {
    let config = NodeConfig {
        update_window_enabled: false,
        ..NodeConfig::default()
    };
    let mut node = quiet_node();
    let (mut svc, mut sink) = started(&mut node, config);

    node.set_sample(25.0, 45.0);
    let report = svc.run_cycle(&mut node, &mut sink);

    assert!(report.reason.is_some());
    assert!(!report.update_window_opened);
    assert!(node.waits().is_empty());
}

#[test]
fn cycle_report_is_emitted_before_sleep() {
    let mut node = quiet_node();
    let (mut svc, mut sink) = started(&mut node, NodeConfig::default());

    let report = svc.run_cycle(&mut node, &mut sink);
    assert_eq!(sink.events.last(), Some(&AppEvent::CycleCompleted(report)));
    assert_eq!(
        sink.count(|e| matches!(e, AppEvent::MeasurementSuppressed { .. })),
        1
    );
}

#[test]
fn voltage_is_sent_in_volts_with_three_decimals() {
    let mut node = MockNode::new(21.0, 45.0, 2987);
    let mut svc = NodeService::new(NodeConfig::default());
    svc.start(&mut node, &mut RecordingSink::new());

    let voltage = node
        .radio
        .iter()
        .find_map(|c| match c {
            RadioCall::Emit {
                child_id: CHILD_ID_BATT,
                value,
                precision,
            } => Some((*value, *precision)),
            _ => None,
        });
    assert_eq!(voltage, Some((2.987, 3)));
}
