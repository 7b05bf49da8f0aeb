//! Hardware adapter — bridges HAL pin tables and a clock to the port traits.
//!
//! This is the only module that turns pin failures into degraded values:
//! a failed switch read reports the released level, a failed output write
//! is skipped.  Both are logged at `warn`.

use embedded_hal::digital::{InputPin, OutputPin};
use log::warn;

use crate::app::ports::{ClockPort, InputPort, OutputPort};
use crate::drivers::gpio::{HalInputs, HalOutputs};
use crate::pins::{OUTPUT_PIN_COUNT, Pin, SWITCH_PIN_COUNT};

/// Concrete adapter that combines all board I/O behind port traits.
pub struct HardwareAdapter<IP, OP, C> {
    inputs: HalInputs<IP, SWITCH_PIN_COUNT>,
    outputs: HalOutputs<OP, OUTPUT_PIN_COUNT>,
    clock: C,
    /// Level reported for a switch whose read failed.
    released_level: bool,
}

impl<IP: InputPin, OP: OutputPin, C: ClockPort> HardwareAdapter<IP, OP, C> {
    pub fn new(
        inputs: HalInputs<IP, SWITCH_PIN_COUNT>,
        outputs: HalOutputs<OP, OUTPUT_PIN_COUNT>,
        clock: C,
        switch_active_low: bool,
    ) -> Self {
        Self {
            inputs,
            outputs,
            clock,
            released_level: switch_active_low,
        }
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }
}

// ── InputPort implementation ──────────────────────────────────

impl<IP: InputPin, OP, C> InputPort for HardwareAdapter<IP, OP, C> {
    fn is_high(&mut self, pin: Pin) -> bool {
        match self.inputs.read(pin) {
            Ok(level) => level,
            Err(e) => {
                warn!("{}; treating switch as released", e);
                self.released_level
            }
        }
    }
}

// ── OutputPort implementation ─────────────────────────────────

impl<IP, OP: OutputPin, C> OutputPort for HardwareAdapter<IP, OP, C> {
    fn set_level(&mut self, pin: Pin, high: bool) {
        if let Err(e) = self.outputs.write(pin, high) {
            warn!("{}; output left unchanged", e);
        }
    }
}

// ── ClockPort implementation ──────────────────────────────────

impl<IP, OP, C: ClockPort> ClockPort for HardwareAdapter<IP, OP, C> {
    fn now_ms(&self) -> u32 {
        self.clock.now_ms()
    }
}
