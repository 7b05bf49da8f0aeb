//! Time-debounced switch input.
//!
//! ## Hardware
//!
//! Momentary switch to ground with the input pull-up enabled, so a press
//! reads LOW.  The polarity is configurable for boards wired the other way.
//!
//! ## Filter
//!
//! Polled from the main loop at control-tick rate.  Every raw level change
//! restarts the settle timer; the stable level only follows the raw level
//! once the raw level has held for `debounce_ms`.  Contact bounce shorter
//! than the interval never reaches [`DebouncedSwitch::is_pressed`].
//!
//! The switch keeps no edge history.  Callers that need press/release
//! edges compare consecutive `is_pressed()` results themselves.

use crate::app::ports::InputPort;
use crate::pins::Pin;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebouncedSwitch {
    pin: Pin,
    debounce_ms: u32,
    active_low: bool,
    last_raw: bool,
    last_change_ms: u32,
    stable: bool,
}

impl DebouncedSwitch {
    /// A switch that starts released with the settle timer at zero.
    pub fn new(pin: Pin, debounce_ms: u32, active_low: bool) -> Self {
        let released = active_low;
        Self {
            pin,
            debounce_ms,
            active_low,
            last_raw: released,
            last_change_ms: 0,
            stable: released,
        }
    }

    /// GPIO pin this switch is attached to.
    pub fn pin(&self) -> Pin {
        self.pin
    }

    /// Seed the filter with the level seen at boot.  A switch already held
    /// down at power-up is then stable-pressed from the start and produces
    /// no press edge.
    pub fn prime(&mut self, raw_high: bool, now_ms: u32) {
        self.last_raw = raw_high;
        self.stable = raw_high;
        self.last_change_ms = now_ms;
    }

    /// Read the pin through `inputs` and run the filter.
    /// Returns the (possibly unchanged) pressed state.
    pub fn sample(&mut self, inputs: &mut impl InputPort, now_ms: u32) -> bool {
        let raw = inputs.is_high(self.pin);
        self.update(raw, now_ms)
    }

    /// Run the filter on an already-read raw level.
    pub fn update(&mut self, raw_high: bool, now_ms: u32) -> bool {
        if raw_high != self.last_raw {
            self.last_raw = raw_high;
            self.last_change_ms = now_ms;
        } else if raw_high != self.stable
            && now_ms.wrapping_sub(self.last_change_ms) >= self.debounce_ms
        {
            self.stable = raw_high;
        }
        self.is_pressed()
    }

    /// Debounced pressed state.  Pure read.
    pub fn is_pressed(&self) -> bool {
        self.stable != self.active_low
    }

    /// Debounced electrical level (`true` = HIGH).
    pub fn stable_level(&self) -> bool {
        self.stable
    }
}
