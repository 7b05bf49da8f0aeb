//! Pump / UV run-state coordinator.
//!
//! Owns the four debounced switches, one [`RunMachine`] per subsystem, the
//! lamp startup sequence and the last applied output levels.  Every tick
//! follows the same read → decide → act order:
//!
//! 1. Sample all four switches into one snapshot and derive rising edges.
//! 2. Report fault flag changes.
//! 3. Evaluate the pump machine, then the UV machine.
//! 4. Advance the lamp startup sequence.
//! 5. Build the output frame and write only the pins that changed.
//!
//! No pin is written before every switch has been read, so neither machine
//! can observe a half-updated input snapshot.

use crate::app::events::ControlEvent;
use crate::app::ports::{Board, EventSink, InputPort, OutputPort};
use crate::config::{ControllerConfig, HalfBrokenPolicy, RelayPolarity};
use crate::drivers::startup_sequence::{StartupSequence, all_lamps};
use crate::drivers::switch::DebouncedSwitch;
use crate::faults::{FaultFlag, FaultFlags, FaultMonitor};
use crate::fsm::context::{Edges, RunContext, StartupRequest, StopCause};
use crate::fsm::{RunMachine, RunState, Subsystem};
use crate::outputs::{OutputFrame, PinLevels, changed_levels};
use crate::pins::{self, MAX_UV_LAMPS};

// ---------------------------------------------------------------------------
// Switch snapshot
// ---------------------------------------------------------------------------

/// Debounced pressed state of every switch at one instant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SwitchSnapshot {
    pub pump_start: bool,
    pub pump_stop: bool,
    pub uv_start: bool,
    pub uv_stop: bool,
}

impl SwitchSnapshot {
    /// Rising edges relative to `prev`, as (pump, uv).
    pub fn rising_since(&self, prev: &Self) -> (Edges, Edges) {
        (
            Edges {
                start: self.pump_start && !prev.pump_start,
                stop: self.pump_stop && !prev.pump_stop,
            },
            Edges {
                start: self.uv_start && !prev.uv_start,
                stop: self.uv_stop && !prev.uv_stop,
            },
        )
    }
}

/// The four switch inputs, in sampling order.
#[derive(Debug, Clone, Copy)]
struct SwitchBank {
    pump_start: DebouncedSwitch,
    pump_stop: DebouncedSwitch,
    uv_start: DebouncedSwitch,
    uv_stop: DebouncedSwitch,
}

impl SwitchBank {
    fn new(debounce_ms: u32, active_low: bool) -> Self {
        Self {
            pump_start: DebouncedSwitch::new(pins::PUMP_START_SWITCH_PIN, debounce_ms, active_low),
            pump_stop: DebouncedSwitch::new(pins::PUMP_STOP_SWITCH_PIN, debounce_ms, active_low),
            uv_start: DebouncedSwitch::new(pins::UV_START_SWITCH_PIN, debounce_ms, active_low),
            uv_stop: DebouncedSwitch::new(pins::UV_STOP_SWITCH_PIN, debounce_ms, active_low),
        }
    }

    fn iter_mut(&mut self) -> [&mut DebouncedSwitch; 4] {
        [
            &mut self.pump_start,
            &mut self.pump_stop,
            &mut self.uv_start,
            &mut self.uv_stop,
        ]
    }

    fn prime(&mut self, inputs: &mut impl InputPort, now_ms: u32) {
        for sw in self.iter_mut() {
            let raw = inputs.is_high(sw.pin());
            sw.prime(raw, now_ms);
        }
    }

    fn sample(&mut self, inputs: &mut impl InputPort, now_ms: u32) -> SwitchSnapshot {
        SwitchSnapshot {
            pump_start: self.pump_start.sample(inputs, now_ms),
            pump_stop: self.pump_stop.sample(inputs, now_ms),
            uv_start: self.uv_start.sample(inputs, now_ms),
            uv_stop: self.uv_stop.sample(inputs, now_ms),
        }
    }

    fn snapshot(&self) -> SwitchSnapshot {
        SwitchSnapshot {
            pump_start: self.pump_start.is_pressed(),
            pump_stop: self.pump_stop.is_pressed(),
            uv_start: self.uv_start.is_pressed(),
            uv_stop: self.uv_stop.is_pressed(),
        }
    }
}

// ---------------------------------------------------------------------------
// Channel: one machine plus its context
// ---------------------------------------------------------------------------

struct Channel {
    machine: RunMachine,
    ctx: RunContext,
}

impl Channel {
    fn new(subsystem: Subsystem) -> Self {
        Self {
            machine: RunMachine::new(subsystem),
            ctx: RunContext::new(),
        }
    }

    fn state(&self) -> RunState {
        self.machine.current_state()
    }

    fn is_running(&self) -> bool {
        self.state() == RunState::Running
    }

    /// One guarded tick.  Emits the resulting events.
    fn evaluate(&mut self, edges: Edges, blocking_fault: bool, sink: &mut impl EventSink) {
        self.ctx.prepare(edges, blocking_fault);
        let changed = self.machine.tick(&mut self.ctx);
        let subsystem = self.machine.subsystem();

        if self.ctx.start_blocked {
            sink.emit(&ControlEvent::StartBlocked(subsystem));
        }
        if changed {
            self.emit_transition(self.ctx.stop_cause.unwrap_or(StopCause::StopSwitch), sink);
        }
    }

    /// Unguarded transition.  Returns `true` if the state changed.
    fn force(&mut self, target: RunState, cause: StopCause, sink: &mut impl EventSink) -> bool {
        let changed = self.machine.force_transition(target, &mut self.ctx);
        if changed {
            self.emit_transition(cause, sink);
        }
        changed
    }

    fn emit_transition(&self, cause: StopCause, sink: &mut impl EventSink) {
        let subsystem = self.machine.subsystem();
        let event = match self.state() {
            RunState::Running => ControlEvent::Started(subsystem),
            RunState::Stopped => ControlEvent::Stopped { subsystem, cause },
        };
        sink.emit(&event);
    }
}

// ---------------------------------------------------------------------------
// RunStateCoordinator
// ---------------------------------------------------------------------------

pub struct RunStateCoordinator {
    switches: SwitchBank,
    previous: SwitchSnapshot,
    pump: Channel,
    uv: Channel,
    startup: StartupSequence,
    lamp_count: u8,
    relay_polarity: RelayPolarity,
    half_broken_policy: HalfBrokenPolicy,
    monitor: FaultMonitor,
    applied: Option<PinLevels>,
}

impl RunStateCoordinator {
    /// Build an idle coordinator.  `lamp_count` is clamped to
    /// [`MAX_UV_LAMPS`].  Call [`setup`](Self::setup) before the first tick.
    pub fn new(config: &ControllerConfig, lamp_count: u8) -> Self {
        Self {
            switches: SwitchBank::new(config.debounce_ms, config.switch_active_low),
            previous: SwitchSnapshot::default(),
            pump: Channel::new(Subsystem::Pump),
            uv: Channel::new(Subsystem::Uv),
            startup: StartupSequence::new(config.startup_step_ms),
            lamp_count: lamp_count.min(MAX_UV_LAMPS as u8),
            relay_polarity: config.relay_polarity,
            half_broken_policy: config.half_broken_policy,
            monitor: FaultMonitor::new(),
            applied: None,
        }
    }

    /// Prime the switches from the current pin levels, enter `Stopped` on
    /// both machines and drive every output to its stopped level.
    pub fn setup(&mut self, hw: &mut impl Board, sink: &mut impl EventSink) {
        let now = hw.now_ms();
        self.switches.prime(hw, now);
        self.previous = self.switches.snapshot();

        self.pump.machine.start(&mut self.pump.ctx);
        self.uv.machine.start(&mut self.uv.ctx);
        self.apply_startup_request(now, sink);

        self.applied = None;
        self.write_outputs(hw, FaultFlags::NONE, now);
        sink.emit(&ControlEvent::Ready {
            lamp_count: self.lamp_count,
        });
    }

    /// Advance both subsystems by exactly one tick.
    pub fn tick(&mut self, hw: &mut impl Board, faults: FaultFlags, sink: &mut impl EventSink) {
        let now = hw.now_ms();

        // 1. Read
        let snapshot = self.switches.sample(hw, now);
        let (pump_edges, uv_edges) = snapshot.rising_since(&self.previous);
        self.previous = snapshot;

        // 2. Faults
        for change in self.monitor.observe(faults) {
            let event = if change.active {
                ControlEvent::FaultRaised(change.flag)
            } else {
                ControlEvent::FaultCleared(change.flag)
            };
            sink.emit(&event);
        }

        // 3. Decide
        self.pump.evaluate(pump_edges, faults.blocks_pump(), sink);
        self.uv
            .evaluate(uv_edges, faults.blocks_uv(self.half_broken_policy), sink);
        self.apply_startup_request(now, sink);

        // 4. Sequence
        if let Some(lamp_count) = self.startup.poll_finished(now) {
            sink.emit(&ControlEvent::StartupSequenceFinished { lamp_count });
        }

        // 5. Act
        self.write_outputs(hw, faults, now);
    }

    /// Administrative override of the UV run state.
    ///
    /// `run = false` always stops.  `run = true` starts unless a blocking
    /// UV fault is active, in which case a running bank is stopped too.
    /// Outputs are written immediately.  Returns `false` if the request was
    /// refused.
    pub fn force_uv(
        &mut self,
        run: bool,
        faults: FaultFlags,
        hw: &mut impl Board,
        sink: &mut impl EventSink,
    ) -> bool {
        let now = hw.now_ms();
        let refused = run && faults.blocks_uv(self.half_broken_policy);
        let (target, cause) = match (run, refused) {
            (true, false) => (RunState::Running, StopCause::Forced),
            (true, true) => (RunState::Stopped, StopCause::Fault),
            (false, _) => (RunState::Stopped, StopCause::Forced),
        };
        if refused {
            sink.emit(&ControlEvent::StartBlocked(Subsystem::Uv));
        }
        if self.uv.force(target, cause, sink) {
            self.apply_startup_request(now, sink);
        }
        self.write_outputs(hw, faults, now);
        !refused
    }

    /// Play the lamp startup sequence for `lamp_count` lamps now.
    pub fn play_startup_sequence(
        &mut self,
        lamp_count: u8,
        faults: FaultFlags,
        hw: &mut impl Board,
        sink: &mut impl EventSink,
    ) {
        let now = hw.now_ms();
        let lamp_count = lamp_count.min(MAX_UV_LAMPS as u8);
        self.startup.start(lamp_count, now);
        sink.emit(&ControlEvent::StartupSequenceStarted { lamp_count });
        self.write_outputs(hw, faults, now);
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn pump_state(&self) -> RunState {
        self.pump.state()
    }

    pub fn uv_state(&self) -> RunState {
        self.uv.state()
    }

    pub fn is_pump_running(&self) -> bool {
        self.pump.is_running()
    }

    pub fn is_uv_running(&self) -> bool {
        self.uv.is_running()
    }

    pub fn lamp_count(&self) -> u8 {
        self.lamp_count
    }

    pub fn is_startup_sequence_active(&self) -> bool {
        self.startup.is_active()
    }

    /// Debounced switch states as of the last tick.
    pub fn switches(&self) -> SwitchSnapshot {
        self.previous
    }

    /// Output frame implied by the current state at `now_ms`.
    fn output_frame(&self, faults: FaultFlags, now_ms: u32) -> OutputFrame {
        let pump = self.pump.ctx.commands;
        let uv = self.uv.ctx.commands;
        let uv_lamps = match self.startup.frame(now_ms) {
            Some(mask) => mask,
            None if self.uv.is_running() => all_lamps(self.lamp_count),
            None => 0,
        };

        OutputFrame {
            pump_relay: pump.relay_on,
            pump_run_led: pump.run_led,
            pump_stop_led: pump.stop_led,
            pump_lamp: self.pump.is_running() && faults.contains(FaultFlag::PumpStartupOk),
            emergency_lamp: faults.emergency(),
            uv_relay: uv.relay_on,
            uv_run_led: uv.run_led,
            uv_stop_led: uv.stop_led,
            uv_lamps,
        }
    }

    // ── Internal ──────────────────────────────────────────────

    fn apply_startup_request(&mut self, now_ms: u32, sink: &mut impl EventSink) {
        match self.uv.ctx.startup.take() {
            Some(StartupRequest::Play) => {
                self.startup.start(self.lamp_count, now_ms);
                sink.emit(&ControlEvent::StartupSequenceStarted {
                    lamp_count: self.lamp_count,
                });
            }
            Some(StartupRequest::Clear) => self.startup.clear(),
            None => {}
        }
    }

    fn write_outputs(&mut self, hw: &mut impl OutputPort, faults: FaultFlags, now_ms: u32) {
        let levels = self.output_frame(faults, now_ms).pin_levels(self.relay_polarity);
        for (pin, level) in changed_levels(self.applied.as_ref(), &levels) {
            hw.set_level(pin, level);
        }
        self.applied = Some(levels);
    }
}
