//! Function-pointer finite state machine engine for the peripheral self-test.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  StateTable                                                     │
//! │  ┌───────────────┬──────────┬──────────┬──────────────────────┐ │
//! │  │ StateId       │ on_enter │ on_exit  │ on_update            │ │
//! │  ├───────────────┼──────────┼──────────┼──────────────────────┤ │
//! │  │ SensorProbe   │ —        │ —        │ fn(ctx, hw)->Option<>│ │
//! │  │ StorageProbe  │ —        │ —        │ fn(ctx, hw)->Option<>│ │
//! │  │ IdentityProbe │ —        │ —        │ fn(ctx, hw)->Option<>│ │
//! │  │ Passed        │ fn(ctx)  │ —        │ terminal             │ │
//! │  │ Failed        │ fn(ctx)  │ —        │ terminal             │ │
//! │  └───────────────┴──────────┴──────────┴──────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each tick the engine calls `on_update` for the **current** state with the
//! context and the hardware under test.  If it returns `Some(next_id)`, the
//! engine runs `on_exit` for the current state, then `on_enter` for the
//! next, and updates the current pointer.

pub mod context;
pub mod states;

use context::SelfTestContext;
use log::info;

use crate::drivers::led_patterns::{SELF_TEST_BLINK_HALF_PERIOD_MS, SignalPattern};

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// Must stay in sync with the table built in [`states::build_state_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum StateId {
    SensorProbe = 0,
    StorageProbe = 1,
    IdentityProbe = 2,
    Passed = 3,
    Failed = 4,
}

impl StateId {
    pub const COUNT: usize = 5;

    /// Convert an index back to `StateId`.  Panics on out-of-range in debug
    /// builds; returns `Failed` in release.
    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::SensorProbe,
            1 => Self::StorageProbe,
            2 => Self::IdentityProbe,
            3 => Self::Passed,
            4 => Self::Failed,
            _ => {
                debug_assert!(false, "invalid state index: {idx}");
                Self::Failed
            }
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Passed | Self::Failed)
    }
}

/// Aggregate self-test result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelfTestVerdict {
    Passed,
    Failed,
}

impl SelfTestVerdict {
    /// LED signalling for the verdict: blink on success, solid on failure.
    pub fn signal_pattern(self) -> SignalPattern {
        match self {
            Self::Passed => SignalPattern::Blink {
                half_period_ms: SELF_TEST_BLINK_HALF_PERIOD_MS,
            },
            Self::Failed => SignalPattern::Solid,
        }
    }
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Runs exactly once on each transition.
pub type StateActionFn = fn(&mut SelfTestContext);

/// Per-tick handler.  Returns `Some(next)` to transition, `None` to stay.
pub type StateUpdateFn<P> = fn(&mut SelfTestContext, &mut P) -> Option<StateId>;

/// One row in the state table.  Stored in a fixed-size array.
pub struct StateDescriptor<P> {
    pub id: StateId,
    pub name: &'static str,
    pub on_enter: Option<StateActionFn>,
    pub on_exit: Option<StateActionFn>,
    pub on_update: StateUpdateFn<P>,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

/// The state machine engine, generic over the hardware it drives.
pub struct Fsm<P> {
    table: [StateDescriptor<P>; StateId::COUNT],
    current: usize,
}

impl<P> Fsm<P> {
    pub fn new(table: [StateDescriptor<P>; StateId::COUNT], initial: StateId) -> Self {
        debug_assert!(
            table.iter().enumerate().all(|(i, d)| d.id as usize == i),
            "state table out of StateId order"
        );
        Self {
            table,
            current: initial as usize,
        }
    }

    /// Run the initial `on_enter`.  Call once before the first `tick()`.
    pub fn start(&mut self, ctx: &mut SelfTestContext) {
        info!("FSM starting in state: {}", self.table[self.current].name);
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }

    /// Advance by one tick.
    pub fn tick(&mut self, ctx: &mut SelfTestContext, hw: &mut P) {
        let next = (self.table[self.current].on_update)(ctx, hw);

        if let Some(next_id) = next {
            self.transition(next_id, ctx);
        }
    }

    pub fn current_state(&self) -> StateId {
        StateId::from_index(self.current)
    }

    /// `Some` once a terminal state is reached.
    pub fn verdict(&self) -> Option<SelfTestVerdict> {
        match self.current_state() {
            StateId::Passed => Some(SelfTestVerdict::Passed),
            StateId::Failed => Some(SelfTestVerdict::Failed),
            _ => None,
        }
    }

    fn transition(&mut self, next_id: StateId, ctx: &mut SelfTestContext) {
        let next_idx = next_id as usize;

        info!(
            "FSM transition: {} -> {}",
            self.table[self.current].name, self.table[next_idx].name
        );

        if let Some(exit) = self.table[self.current].on_exit {
            exit(ctx);
        }

        self.current = next_idx;

        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }
}
