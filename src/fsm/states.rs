//! Concrete run-state handler functions and table builders.
//!
//! Each state is defined by plain `fn` pointers — no closures, no dynamic
//! dispatch, no heap.  Pump and UV share the handlers; the UV table adds
//! the lamp startup sequence on entry to `Running`.
//!
//! ```text
//!            [start edge ∧ ¬stop edge ∧ ¬fault]
//!  STOPPED ─────────────────────────────────────▶ RUNNING
//!     ▲                                              │
//!     └──────────[stop edge ∨ fault]─────────────────┘
//! ```

use super::context::{RunContext, StartupRequest, StopCause};
use super::{RunState, StateDescriptor, Subsystem};

// ═══════════════════════════════════════════════════════════════════════════
//  Table builders
// ═══════════════════════════════════════════════════════════════════════════

/// Build the state table for `subsystem`.  Called once at startup.
pub fn build_state_table(subsystem: Subsystem) -> [StateDescriptor; RunState::COUNT] {
    match subsystem {
        Subsystem::Pump => [
            StateDescriptor {
                id: RunState::Stopped,
                on_enter: Some(stopped_enter),
                on_update: stopped_update,
            },
            StateDescriptor {
                id: RunState::Running,
                on_enter: Some(running_enter),
                on_update: running_update,
            },
        ],
        Subsystem::Uv => [
            StateDescriptor {
                id: RunState::Stopped,
                on_enter: Some(uv_stopped_enter),
                on_update: stopped_update,
            },
            StateDescriptor {
                id: RunState::Running,
                on_enter: Some(uv_running_enter),
                on_update: running_update,
            },
        ],
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  STOPPED
// ═══════════════════════════════════════════════════════════════════════════

fn stopped_enter(ctx: &mut RunContext) {
    ctx.commands.relay_on = false;
    ctx.commands.run_led = false;
    ctx.commands.stop_led = true;
}

fn uv_stopped_enter(ctx: &mut RunContext) {
    stopped_enter(ctx);
    ctx.startup = Some(StartupRequest::Clear);
}

fn stopped_update(ctx: &mut RunContext) -> Option<RunState> {
    if !ctx.edges.start {
        return None;
    }
    // Both buttons at once: stay stopped.
    if ctx.edges.stop {
        return None;
    }
    // Fault wins over a simultaneous start edge.
    if ctx.blocking_fault {
        ctx.start_blocked = true;
        return None;
    }
    Some(RunState::Running)
}

// ═══════════════════════════════════════════════════════════════════════════
//  RUNNING
// ═══════════════════════════════════════════════════════════════════════════

fn running_enter(ctx: &mut RunContext) {
    ctx.commands.relay_on = true;
    ctx.commands.run_led = true;
    ctx.commands.stop_led = false;
}

fn uv_running_enter(ctx: &mut RunContext) {
    running_enter(ctx);
    ctx.startup = Some(StartupRequest::Play);
}

fn running_update(ctx: &mut RunContext) -> Option<RunState> {
    if ctx.blocking_fault {
        ctx.stop_cause = Some(StopCause::Fault);
        return Some(RunState::Stopped);
    }
    if ctx.edges.stop {
        ctx.stop_cause = Some(StopCause::StopSwitch);
        return Some(RunState::Stopped);
    }
    None
}
