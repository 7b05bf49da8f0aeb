//! Control service — the external function interface.
//!
//! [`ControlService`] owns the [`RunStateCoordinator`] and the externally
//! supplied fault flags.  All I/O flows through port traits injected at
//! each call site, making the whole service testable with mock boards.
//!
//! ```text
//!  InputPort ──▶ ┌─────────────────────────┐ ──▶ EventSink
//!  ClockPort ──▶ │     ControlService      │
//! OutputPort ◀── │ switches · pump · UV    │
//!                └─────────────────────────┘
//! ```
//!
//! Obtaining a service requires [`ControlService::uv_setup`], so the loop
//! task can never run on an uninitialised controller.

use crate::config::ControllerConfig;
use crate::coordinator::{RunStateCoordinator, SwitchSnapshot};
use crate::error::ConfigError;
use crate::faults::{FaultFlag, FaultFlags};
use crate::fsm::RunState;
use crate::pins::MAX_UV_LAMPS;

use super::commands::ControlCommand;
use super::events::ControlEvent;
use super::ports::{Board, EventSink};

pub struct ControlService {
    config: ControllerConfig,
    coordinator: RunStateCoordinator,
    faults: FaultFlags,
    tick_count: u64,
}

impl ControlService {
    // ── Lifecycle ─────────────────────────────────────────────

    /// One-time initialisation.  Validates `config`, clamps the detected
    /// lamp count to [`MAX_UV_LAMPS`], primes the switches from the current
    /// pin levels and drives every output to its stopped level.
    pub fn uv_setup(
        config: ControllerConfig,
        detected_lamp_count: u8,
        hw: &mut impl Board,
        sink: &mut impl EventSink,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let lamp_count = if detected_lamp_count as usize > MAX_UV_LAMPS {
            sink.emit(&ControlEvent::LampCountClamped {
                detected: detected_lamp_count,
                driven: MAX_UV_LAMPS as u8,
            });
            MAX_UV_LAMPS as u8
        } else {
            detected_lamp_count
        };

        let mut coordinator = RunStateCoordinator::new(&config, lamp_count);
        coordinator.setup(hw, sink);

        Ok(Self {
            config,
            coordinator,
            faults: FaultFlags::NONE,
            tick_count: 0,
        })
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one control cycle: sample switches → pump → UV → outputs.
    /// Call once per main-loop iteration.
    pub fn uv_loop_task(&mut self, hw: &mut impl Board, sink: &mut impl EventSink) {
        self.tick_count += 1;
        self.coordinator.tick(hw, self.faults, sink);
    }

    // ── Overrides ─────────────────────────────────────────────

    /// Administrative UV override.  `false` always stops; `true` starts
    /// unless a blocking UV fault is active.  Returns `false` if refused.
    pub fn uv_force_restore(
        &mut self,
        run: bool,
        hw: &mut impl Board,
        sink: &mut impl EventSink,
    ) -> bool {
        self.coordinator.force_uv(run, self.faults, hw, sink)
    }

    /// Play the lamp startup LED sequence for `lamp_count` lamps.
    pub fn run_startup_led_sequence(
        &mut self,
        lamp_count: u8,
        hw: &mut impl Board,
        sink: &mut impl EventSink,
    ) {
        self.coordinator
            .play_startup_sequence(lamp_count, self.faults, hw, sink);
    }

    /// Raise or clear an external flag.  Takes effect on the next tick.
    pub fn set_fault(&mut self, flag: FaultFlag, active: bool) {
        self.faults.set(flag, active);
    }

    // ── Command handling ──────────────────────────────────────

    /// Process a collaborator command.
    pub fn handle_command(
        &mut self,
        cmd: ControlCommand,
        hw: &mut impl Board,
        sink: &mut impl EventSink,
    ) {
        match cmd {
            ControlCommand::ForceUvRestore(run) => {
                self.uv_force_restore(run, hw, sink);
            }
            ControlCommand::SetFault { flag, active } => self.set_fault(flag, active),
            ControlCommand::PlayStartupSequence(lamp_count) => {
                self.run_startup_led_sequence(lamp_count, hw, sink);
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// `true` iff the UV bank is running as of the last completed tick.
    pub fn is_uv_running(&self) -> bool {
        self.coordinator.is_uv_running()
    }

    pub fn is_pump_running(&self) -> bool {
        self.coordinator.is_pump_running()
    }

    pub fn uv_state(&self) -> RunState {
        self.coordinator.uv_state()
    }

    pub fn pump_state(&self) -> RunState {
        self.coordinator.pump_state()
    }

    pub fn faults(&self) -> FaultFlags {
        self.faults
    }

    pub fn lamp_count(&self) -> u8 {
        self.coordinator.lamp_count()
    }

    pub fn switches(&self) -> SwitchSnapshot {
        self.coordinator.switches()
    }

    /// Total control ticks executed since setup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }
}
