//! Port traits — the boundary between control logic and the board.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ControlService (domain)
//! ```
//!
//! Driven adapters (pins, clock, event sinks) implement these traits.
//! The [`ControlService`](super::service::ControlService) consumes them via
//! generics injected at each call site, so the domain core never touches
//! hardware directly and owns no I/O handles.

use crate::pins::Pin;

use super::events::ControlEvent;

// ───────────────────────────────────────────────────────────────
// Input port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port for the switch inputs.
pub trait InputPort {
    /// Raw electrical level of `pin` (`true` = HIGH).
    ///
    /// Infallible by contract: adapters map read failures to the released
    /// level so a broken wire looks like a switch that is never pressed.
    fn is_high(&mut self, pin: Pin) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Output port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port for relays, indicator LEDs and lamps.
pub trait OutputPort {
    /// Drive `pin` to the given electrical level (`true` = HIGH).
    fn set_level(&mut self, pin: Pin, high: bool);
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Monotonic millisecond clock.  Wraps at `u32::MAX`; all consumers use
/// wrapping arithmetic.
pub trait ClockPort {
    fn now_ms(&self) -> u32;
}

/// Everything a control tick needs from the board.
pub trait Board: InputPort + OutputPort + ClockPort {}

impl<T: InputPort + OutputPort + ClockPort> Board for T {}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`ControlEvent`]s through this port.
/// Adapters decide where they go; the production build discards them.
pub trait EventSink {
    fn emit(&mut self, event: &ControlEvent);
}
