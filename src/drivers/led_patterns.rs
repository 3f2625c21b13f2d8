//! Single-LED signal pattern engine.
//!
//! The caller advances the engine by the elapsed time and feeds the returned
//! level into [`StatusLed::set`](super::status_led::StatusLed::set).
//!
//! | Pattern | Description                              |
//! |---------|------------------------------------------|
//! | Off     | LED dark                                 |
//! | Solid   | LED lit                                  |
//! | Blink   | Equal-duty square wave, starts lit       |

/// Self-test blink rate: 200 ms on, 200 ms off.
pub const SELF_TEST_BLINK_HALF_PERIOD_MS: u32 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalPattern {
    Off,
    Solid,
    Blink { half_period_ms: u32 },
}

impl SignalPattern {
    /// LED level at `phase_ms` into the pattern.
    pub fn level_at(self, phase_ms: u32) -> bool {
        match self {
            Self::Off => false,
            Self::Solid => true,
            Self::Blink { half_period_ms } => (phase_ms / half_period_ms.max(1)) % 2 == 0,
        }
    }

    /// Time until the level can next change, if ever.
    pub fn step_ms(self) -> Option<u32> {
        match self {
            Self::Off | Self::Solid => None,
            Self::Blink { half_period_ms } => Some(half_period_ms.max(1)),
        }
    }
}

/// Stack-allocated pattern player.
pub struct SignalPatternEngine {
    pattern: SignalPattern,
    phase_ms: u32,
}

impl SignalPatternEngine {
    pub fn new(pattern: SignalPattern) -> Self {
        Self {
            pattern,
            phase_ms: 0,
        }
    }

    /// Advance by `delta_ms` and return the LED level.
    pub fn tick(&mut self, delta_ms: u32) -> bool {
        self.phase_ms = self.phase_ms.wrapping_add(delta_ms);
        self.level()
    }

    pub fn level(&self) -> bool {
        self.pattern.level_at(self.phase_ms)
    }
}
