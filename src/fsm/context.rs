//! Shared mutable context threaded through every self-test handler.
//!
//! Probes write their outcome here; the final probe reads the tally to pick
//! the verdict state.

use crate::error::{Error, IdentityStatus};

/// A peripheral exercised by the self-test, in probe order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Peripheral {
    Sensor = 0,
    Storage = 1,
    Identity = 2,
}

impl Peripheral {
    pub const COUNT: usize = 3;
    pub const ALL: [Self; Self::COUNT] = [Self::Sensor, Self::Storage, Self::Identity];

    pub fn name(self) -> &'static str {
        match self {
            Self::Sensor => "SI7021",
            Self::Storage => "Flash",
            Self::Identity => "SHA204",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProbeOutcome {
    #[default]
    Pending,
    Passed,
    Failed,
}

#[derive(Debug, Clone, Default)]
pub struct SelfTestContext {
    outcomes: [ProbeOutcome; Peripheral::COUNT],
    faults: [Option<Error>; Peripheral::COUNT],
    /// Identity-chip serial, once read.
    pub serial: Option<[u8; 9]>,
}

impl SelfTestContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a probe result; a failure keeps its error for the final report.
    pub fn record(&mut self, peripheral: Peripheral, result: Result<(), Error>) {
        let idx = peripheral as usize;
        match result {
            Ok(()) => {
                self.outcomes[idx] = ProbeOutcome::Passed;
                self.faults[idx] = None;
            }
            Err(e) => {
                self.outcomes[idx] = ProbeOutcome::Failed;
                self.faults[idx] = Some(e);
            }
        }
    }

    pub fn outcome(&self, peripheral: Peripheral) -> ProbeOutcome {
        self.outcomes[peripheral as usize]
    }

    pub fn fault(&self, peripheral: Peripheral) -> Option<Error> {
        self.faults[peripheral as usize]
    }

    /// Raw chip status of a failed identity probe.
    pub fn identity_status(&self) -> Option<IdentityStatus> {
        match self.fault(Peripheral::Identity) {
            Some(Error::Identity(status)) => Some(status),
            _ => None,
        }
    }

    pub fn passed_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| **o == ProbeOutcome::Passed)
            .count()
    }

    pub fn all_passed(&self) -> bool {
        self.passed_count() == Peripheral::COUNT
    }
}
