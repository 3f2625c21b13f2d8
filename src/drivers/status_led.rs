//! Single-colour status LED on a GPIO.
//!
//! Works with any `embedded_hal::digital::OutputPin`; on ESP-IDF that is a
//! `PinDriver<_, Output>`, in tests a recording fake.

use embedded_hal::digital::OutputPin;

use super::led_patterns::SignalPatternEngine;

pub struct StatusLed<P> {
    pin: P,
    lit: bool,
}

impl<P: OutputPin> StatusLed<P> {
    pub fn new(pin: P) -> Self {
        Self { pin, lit: false }
    }

    pub fn set(&mut self, on: bool) -> Result<(), P::Error> {
        if on {
            self.pin.set_high()?;
        } else {
            self.pin.set_low()?;
        }
        self.lit = on;
        Ok(())
    }

    pub fn off(&mut self) -> Result<(), P::Error> {
        self.set(false)
    }

    pub fn is_lit(&self) -> bool {
        self.lit
    }

    /// Keep the LED lit while `busy` runs, then turn it off.
    pub fn lit_while<T>(&mut self, busy: impl FnOnce() -> T) -> Result<T, P::Error> {
        self.set(true)?;
        let out = busy();
        self.off()?;
        Ok(out)
    }

    /// Advance `engine` by `delta_ms` and show the resulting level.
    pub fn show(&mut self, engine: &mut SignalPatternEngine, delta_ms: u32) -> Result<(), P::Error> {
        let level = engine.tick(delta_ms);
        if level != self.lit {
            self.set(level)?;
        }
        Ok(())
    }
}
