//! Clock adapters.
//!
//! [`ManualClock`] is stepped explicitly by its owner.  The host simulator
//! and the test benches drive time with it so every run is reproducible.

use crate::app::ports::ClockPort;

/// Millisecond clock that only moves when told to.
#[derive(Debug, Default, Clone, Copy)]
pub struct ManualClock {
    now: u32,
}

impl ManualClock {
    pub fn new(start_ms: u32) -> Self {
        Self { now: start_ms }
    }

    /// Step forward, wrapping at `u32::MAX` like a hardware tick counter.
    pub fn advance(&mut self, ms: u32) {
        self.now = self.now.wrapping_add(ms);
    }
}

impl ClockPort for ManualClock {
    fn now_ms(&self) -> u32 {
        self.now
    }
}
