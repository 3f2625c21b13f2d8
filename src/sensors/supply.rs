//! Supply-voltage monitor.
//!
//! Wraps a polled ADC: wait for the reference to settle, start a single
//! conversion, busy-poll for completion within a fixed budget, then convert
//! the raw count to millivolts.
//!
//! Two conversions are supported:
//!
//! | Conversion | Wiring                                       | Formula                    |
//! |------------|----------------------------------------------|----------------------------|
//! | `Bandgap`  | internal 1.1 V reference measured against Vcc | `mv = scale / raw`         |
//! | `Divider`  | battery through a resistive divider to an ADC pin | `mv = raw · full / max` |

use embedded_hal::delay::DelayNs;

use crate::app::ports::SupplyPort;
use crate::error::SupplyError;

/// Reference settle time before each conversion.
const SETTLE_MS: u32 = 2;
/// Busy-poll budget for a single conversion.
pub const DEFAULT_MAX_POLLS: u32 = 10_000;

/// Single-shot ADC with a pollable completion flag.
pub trait PolledAdc {
    fn start_conversion(&mut self);
    fn conversion_complete(&mut self) -> bool;
    fn read_raw(&mut self) -> u16;
}

/// Raw-count to millivolt conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conversion {
    /// Internal bandgap measured against the supply rail.
    Bandgap { scale: i32 },
    /// External divider on an ADC input.
    Divider { full_scale_mv: i32, max_raw: u16 },
}

impl Conversion {
    /// 1.1 V · 1023 · 1000 for a 10-bit converter.
    pub const BANDGAP_10BIT: Self = Self::Bandgap { scale: 1_125_300 };

    pub fn to_millivolts(self, raw: u16) -> Result<i32, SupplyError> {
        match self {
            Self::Bandgap { scale } => {
                if raw == 0 {
                    return Err(SupplyError::ZeroReading);
                }
                Ok(scale / i32::from(raw))
            }
            Self::Divider {
                full_scale_mv,
                max_raw,
            } => {
                let max = i32::from(max_raw.max(1));
                Ok(i32::from(raw.min(max_raw)) * full_scale_mv / max)
            }
        }
    }
}

pub struct SupplyMonitor<A, D> {
    adc: A,
    delay: D,
    conversion: Conversion,
    max_polls: u32,
}

impl<A: PolledAdc, D: DelayNs> SupplyMonitor<A, D> {
    pub fn new(adc: A, delay: D, conversion: Conversion) -> Self {
        Self {
            adc,
            delay,
            conversion,
            max_polls: DEFAULT_MAX_POLLS,
        }
    }

    /// Override the busy-poll budget.
    #[must_use]
    pub fn with_max_polls(mut self, max_polls: u32) -> Self {
        self.max_polls = max_polls.max(1);
        self
    }
}

impl<A: PolledAdc, D: DelayNs> SupplyPort for SupplyMonitor<A, D> {
    fn read_millivolts(&mut self) -> Result<i32, SupplyError> {
        self.delay.delay_ms(SETTLE_MS);
        self.adc.start_conversion();

        let mut polls = 0;
        while !self.adc.conversion_complete() {
            polls += 1;
            if polls >= self.max_polls {
                return Err(SupplyError::ConversionTimeout);
            }
        }

        self.conversion.to_millivolts(self.adc.read_raw())
    }
}
