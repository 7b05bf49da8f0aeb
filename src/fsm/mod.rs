//! Function-pointer run-state machine.
//!
//! One instance per subsystem (pump, UV), both built from the same
//! two-row table shape:
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  StateTable                                  │
//! │  ┌──────────┬───────────┬──────────────────┐ │
//! │  │ RunState │ on_enter  │ on_update        │ │
//! │  ├──────────┼───────────┼──────────────────┤ │
//! │  │ Stopped  │ fn(ctx)   │ fn(ctx)->Option<>│ │
//! │  │ Running  │ fn(ctx)   │ fn(ctx)->Option<>│ │
//! │  └──────────┴───────────┴──────────────────┘ │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! Each tick the machine calls `on_update` for the **current** state.  If it
//! returns `Some(next)`, the machine moves to `next` and runs its
//! `on_enter` exactly once.  Entry actions are therefore never re-run on
//! ticks where the state does not change.

pub mod context;
pub mod states;

use core::fmt;

use context::RunContext;

// ---------------------------------------------------------------------------
// Identities
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum RunState {
    Stopped = 0,
    Running = 1,
}

impl RunState {
    /// Total number of states — used to size the table array.
    pub const COUNT: usize = 2;

    /// Convert a table index back to `RunState`.  Out-of-range indices map
    /// to `Stopped` (the safe state).
    pub fn from_index(idx: usize) -> Self {
        match idx {
            1 => Self::Running,
            _ => {
                debug_assert!(idx == 0, "invalid state index: {idx}");
                Self::Stopped
            }
        }
    }
}

/// The independently switched parts of the plant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subsystem {
    Pump,
    Uv,
}

impl fmt::Display for Subsystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pump => write!(f, "pump"),
            Self::Uv => write!(f, "UV"),
        }
    }
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Signature for `on_enter` actions.
pub type StateActionFn = fn(&mut RunContext);

/// Signature for the per-tick update handler.
/// Returns `Some(next)` to trigger a transition, or `None` to stay.
pub type StateUpdateFn = fn(&mut RunContext) -> Option<RunState>;

/// Static descriptor for a single state.
pub struct StateDescriptor {
    pub id: RunState,
    pub on_enter: Option<StateActionFn>,
    pub on_update: StateUpdateFn,
}

// ---------------------------------------------------------------------------
// Machine
// ---------------------------------------------------------------------------

pub struct RunMachine {
    subsystem: Subsystem,
    /// Fixed-size table indexed by `RunState as usize`.
    table: [StateDescriptor; RunState::COUNT],
    current: usize,
}

impl RunMachine {
    /// Machine for `subsystem`, starting in `Stopped`.
    pub fn new(subsystem: Subsystem) -> Self {
        Self {
            subsystem,
            table: states::build_state_table(subsystem),
            current: RunState::Stopped as usize,
        }
    }

    /// Run the initial `on_enter`.  Call once before the first `tick()`.
    pub fn start(&mut self, ctx: &mut RunContext) {
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }

    /// Advance by one tick.  Returns `true` if the state changed.
    pub fn tick(&mut self, ctx: &mut RunContext) -> bool {
        match (self.table[self.current].on_update)(ctx) {
            Some(next) if next as usize != self.current => {
                self.transition(next, ctx);
                true
            }
            _ => false,
        }
    }

    /// Jump straight to `next`, bypassing the update guards.  Entry actions
    /// still run.  Returns `true` if the state changed.
    pub fn force_transition(&mut self, next: RunState, ctx: &mut RunContext) -> bool {
        if next as usize == self.current {
            return false;
        }
        self.transition(next, ctx);
        true
    }

    pub fn current_state(&self) -> RunState {
        RunState::from_index(self.current)
    }

    pub fn subsystem(&self) -> Subsystem {
        self.subsystem
    }

    fn transition(&mut self, next: RunState, ctx: &mut RunContext) {
        self.current = next as usize;
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }
}
