//! Per-subsystem context threaded through every run-state handler.
//!
//! The coordinator fills in the switch edges and the blocking-fault guard
//! before each tick; handlers write the indicator/relay commands and the
//! one-shot requests that the coordinator consumes afterwards.

// ---------------------------------------------------------------------------
// Inputs (written by the coordinator before the tick)
// ---------------------------------------------------------------------------

/// Rising edges of the debounced start/stop switches seen this tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Edges {
    pub start: bool,
    pub stop: bool,
}

// ---------------------------------------------------------------------------
// Outputs (written by handlers)
// ---------------------------------------------------------------------------

/// Why a subsystem left `Running`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopCause {
    StopSwitch,
    Fault,
    Forced,
}

/// One-shot request for the lamp startup sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartupRequest {
    Play,
    Clear,
}

/// Logical output state requested by the current run state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubsystemCommands {
    /// Relay coil energised (polarity applied later).
    pub relay_on: bool,
    pub run_led: bool,
    pub stop_led: bool,
}

// ---------------------------------------------------------------------------
// RunContext
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct RunContext {
    // -- Guards --
    pub edges: Edges,
    /// A fault flag that forbids running is active.
    pub blocking_fault: bool,

    // -- Results --
    /// Set when a start edge was refused because of `blocking_fault`.
    pub start_blocked: bool,
    /// Set by the `Running` handler when it requests a stop.
    pub stop_cause: Option<StopCause>,
    pub startup: Option<StartupRequest>,
    pub commands: SubsystemCommands,
}

impl RunContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load this tick's guards and reset the per-tick results.
    pub fn prepare(&mut self, edges: Edges, blocking_fault: bool) {
        self.edges = edges;
        self.blocking_fault = blocking_fault;
        self.start_blocked = false;
        self.stop_cause = None;
    }
}
