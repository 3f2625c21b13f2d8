//! Concrete self-test handler functions and table builder.
//!
//! ```text
//!  SENSOR_PROBE ──▶ STORAGE_PROBE ──▶ IDENTITY_PROBE ──┬─[all ok]──▶ PASSED
//!                                                      └─[any fail]─▶ FAILED
//! ```
//!
//! Every probe records its own outcome and always moves on, so one dead
//! peripheral never hides the state of the others.  `Passed` and `Failed`
//! are terminal.

use log::{info, warn};

use crate::app::ports::SelfTestPorts;
use crate::drivers::atsha204::serial_hex;
use crate::error::Error;

use super::context::{Peripheral, SelfTestContext};
use super::{StateDescriptor, StateId};

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

pub fn build_state_table<P: SelfTestPorts>() -> [StateDescriptor<P>; StateId::COUNT] {
    [
        StateDescriptor {
            id: StateId::SensorProbe,
            name: "SensorProbe",
            on_enter: None,
            on_exit: None,
            on_update: sensor_probe_update::<P>,
        },
        StateDescriptor {
            id: StateId::StorageProbe,
            name: "StorageProbe",
            on_enter: None,
            on_exit: None,
            on_update: storage_probe_update::<P>,
        },
        StateDescriptor {
            id: StateId::IdentityProbe,
            name: "IdentityProbe",
            on_enter: None,
            on_exit: None,
            on_update: identity_probe_update::<P>,
        },
        StateDescriptor {
            id: StateId::Passed,
            name: "Passed",
            on_enter: Some(passed_enter),
            on_exit: None,
            on_update: terminal_update::<P>,
        },
        StateDescriptor {
            id: StateId::Failed,
            name: "Failed",
            on_enter: Some(failed_enter),
            on_exit: None,
            on_update: terminal_update::<P>,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  Probes
// ═══════════════════════════════════════════════════════════════════════════

fn sensor_probe_update<P: SelfTestPorts>(ctx: &mut SelfTestContext, hw: &mut P) -> Option<StateId> {
    let result = hw.begin().map_err(Error::from);
    log_probe(Peripheral::Sensor, result);
    ctx.record(Peripheral::Sensor, result);
    Some(StateId::StorageProbe)
}

fn storage_probe_update<P: SelfTestPorts>(ctx: &mut SelfTestContext, hw: &mut P) -> Option<StateId> {
    let result = hw.initialize().map_err(Error::from);
    log_probe(Peripheral::Storage, result);
    ctx.record(Peripheral::Storage, result);
    Some(StateId::IdentityProbe)
}

fn identity_probe_update<P: SelfTestPorts>(ctx: &mut SelfTestContext, hw: &mut P) -> Option<StateId> {
    let name = Peripheral::Identity.name();
    let result = match hw.wake() {
        Err(status) => {
            warn!("-> {name} : Failed to wake device. Response: {:02X}", status.code());
            Err(status)
        }
        Ok(()) => match hw.serial_number() {
            Err(status) => {
                warn!(
                    "-> {name} : Failed to obtain device serial number. Response: {:02X}",
                    status.code()
                );
                Err(status)
            }
            Ok(serial) => {
                info!("-> {name} : Ok (serial : {})", serial_hex(&serial));
                ctx.serial = Some(serial);
                Ok(())
            }
        },
    };
    ctx.record(Peripheral::Identity, result.map_err(Error::from));

    if ctx.all_passed() {
        Some(StateId::Passed)
    } else {
        Some(StateId::Failed)
    }
}

fn log_probe(peripheral: Peripheral, result: Result<(), Error>) {
    match result {
        Ok(()) => info!("-> {} : ok!", peripheral.name()),
        Err(e) => warn!("-> {} : failed! ({e})", peripheral.name()),
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  Verdicts
// ═══════════════════════════════════════════════════════════════════════════

fn passed_enter(_ctx: &mut SelfTestContext) {
    info!("Test finished: all peripherals ok");
}

fn failed_enter(ctx: &mut SelfTestContext) {
    warn!(
        "Test finished: {}/{} peripherals ok",
        ctx.passed_count(),
        Peripheral::COUNT
    );
    for peripheral in Peripheral::ALL {
        if let Some(fault) = ctx.fault(peripheral) {
            warn!("   {}: {fault}", peripheral.name());
        }
    }
}

fn terminal_update<P: SelfTestPorts>(_ctx: &mut SelfTestContext, _hw: &mut P) -> Option<StateId> {
    None
}
