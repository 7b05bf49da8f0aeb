//! End-to-end tests for the switches → run machines → outputs pipeline.
//!
//! Every test drives [`ControlService`] through the mock board with a
//! stepped clock, then asserts on pin levels and emitted events.

use super::mock_hw::{MockBoard, RecordingSink};

use uvpump::app::commands::ControlCommand;
use uvpump::app::events::ControlEvent;
use uvpump::app::service::ControlService;
use uvpump::config::{ControllerConfig, HalfBrokenPolicy};
use uvpump::faults::FaultFlag;
use uvpump::fsm::context::StopCause;
use uvpump::fsm::{RunState, Subsystem};
use uvpump::pins::{self, Pin};

struct Rig {
    svc: ControlService,
    hw: MockBoard,
    sink: RecordingSink,
    tick_ms: u32,
}

impl Rig {
    fn new(lamp_count: u8) -> Self {
        Self::with_config(ControllerConfig::default(), lamp_count)
    }

    fn with_config(config: ControllerConfig, lamp_count: u8) -> Self {
        Self::boot(config, lamp_count, MockBoard::new())
    }

    fn boot(config: ControllerConfig, lamp_count: u8, mut hw: MockBoard) -> Self {
        let tick_ms = config.control_tick_ms;
        let mut sink = RecordingSink::new();
        let svc = ControlService::uv_setup(config, lamp_count, &mut hw, &mut sink).unwrap();
        Self {
            svc,
            hw,
            sink,
            tick_ms,
        }
    }

    fn tick(&mut self) {
        self.hw.now = self.hw.now.wrapping_add(self.tick_ms);
        self.svc.uv_loop_task(&mut self.hw, &mut self.sink);
    }

    fn run_for(&mut self, ms: u32) {
        for _ in 0..ms.div_ceil(self.tick_ms) {
            self.tick();
        }
    }

    /// Press `pin` and tick until the debounced state reports it pressed.
    fn hold(&mut self, pin: Pin) {
        self.hw.press(pin);
        self.run_for(self.svc.config().debounce_ms + self.tick_ms);
    }

    fn release(&mut self, pin: Pin) {
        self.hw.release(pin);
        self.run_for(self.svc.config().debounce_ms + self.tick_ms);
    }

    fn tap(&mut self, pin: Pin) {
        self.hold(pin);
        self.release(pin);
    }

    fn command(&mut self, cmd: ControlCommand) {
        self.svc.handle_command(cmd, &mut self.hw, &mut self.sink);
    }
}

fn lit_lamps(hw: &MockBoard) -> usize {
    pins::UV_LAMP_LED_PINS
        .iter()
        .filter(|pin| hw.is_lit(**pin))
        .count()
}

// ── Setup ─────────────────────────────────────────────────────

#[test]
fn setup_drives_every_output_to_stopped() {
    let rig = Rig::new(4);

    assert_eq!(rig.svc.pump_state(), RunState::Stopped);
    assert_eq!(rig.svc.uv_state(), RunState::Stopped);
    assert!(!rig.hw.relay_energised(pins::PUMP_RELAY_PIN));
    assert!(!rig.hw.relay_energised(pins::UV_RELAY_PIN));
    assert!(rig.hw.is_lit(pins::LED_PUMP_STOP_PIN));
    assert!(rig.hw.is_lit(pins::LED_UV_STOP_PIN));
    assert!(!rig.hw.is_lit(pins::LED_PUMP_RUN_PIN));
    assert!(!rig.hw.is_lit(pins::LED_UV_RUN_PIN));
    assert!(!rig.hw.is_lit(pins::EM_LAMP_PIN));
    assert_eq!(lit_lamps(&rig.hw), 0);
    assert_eq!(rig.hw.writes.len(), pins::OUTPUT_PIN_COUNT);
    assert!(rig.sink.contains(&ControlEvent::Ready { lamp_count: 4 }));
}

#[test]
fn switch_held_at_boot_does_not_start() {
    let mut hw = MockBoard::new();
    hw.press(pins::PUMP_START_SWITCH_PIN);
    let mut rig = Rig::boot(ControllerConfig::default(), 2, hw);

    rig.run_for(200);
    assert!(rig.svc.switches().pump_start);
    assert!(!rig.svc.is_pump_running());

    rig.release(pins::PUMP_START_SWITCH_PIN);
    rig.hold(pins::PUMP_START_SWITCH_PIN);
    assert!(rig.svc.is_pump_running());
}

// ── Start / stop ──────────────────────────────────────────────

#[test]
fn start_edge_runs_on_the_debounced_tick() {
    let mut rig = Rig::new(4);
    rig.hw.press(pins::PUMP_START_SWITCH_PIN);

    let mut ticks = 0;
    while !rig.svc.switches().pump_start {
        assert!(!rig.svc.is_pump_running(), "ran before the press settled");
        rig.tick();
        ticks += 1;
        assert!(ticks < 20, "press never settled");
    }

    assert!(rig.svc.is_pump_running());
    assert!(rig.hw.relay_energised(pins::PUMP_RELAY_PIN));
    assert!(rig.hw.is_lit(pins::LED_PUMP_RUN_PIN));
    assert!(!rig.hw.is_lit(pins::LED_PUMP_STOP_PIN));
    assert!(rig.sink.contains(&ControlEvent::Started(Subsystem::Pump)));
    assert!(!rig.svc.is_uv_running());
}

#[test]
fn stop_edge_stops_running_pump() {
    let mut rig = Rig::new(4);
    rig.tap(pins::PUMP_START_SWITCH_PIN);
    assert!(rig.svc.is_pump_running());

    rig.tap(pins::PUMP_STOP_SWITCH_PIN);
    assert!(!rig.svc.is_pump_running());
    assert!(!rig.hw.relay_energised(pins::PUMP_RELAY_PIN));
    assert!(rig.hw.is_lit(pins::LED_PUMP_STOP_PIN));
    assert!(rig.sink.contains(&ControlEvent::Stopped {
        subsystem: Subsystem::Pump,
        cause: StopCause::StopSwitch,
    }));
}

#[test]
fn subsystems_are_independent() {
    let mut rig = Rig::new(4);
    rig.tap(pins::UV_START_SWITCH_PIN);
    assert!(rig.svc.is_uv_running());
    assert!(!rig.svc.is_pump_running());

    rig.tap(pins::PUMP_START_SWITCH_PIN);
    rig.tap(pins::UV_STOP_SWITCH_PIN);
    assert!(rig.svc.is_pump_running());
    assert!(!rig.svc.is_uv_running());
}

#[test]
fn simultaneous_start_and_stop_stays_stopped() {
    let mut rig = Rig::new(4);
    rig.hw.press(pins::PUMP_START_SWITCH_PIN);
    rig.hw.press(pins::PUMP_STOP_SWITCH_PIN);
    rig.run_for(100);

    assert!(rig.svc.switches().pump_start);
    assert!(rig.svc.switches().pump_stop);
    assert!(!rig.svc.is_pump_running());
}

#[test]
fn held_start_does_not_retrigger_after_stop() {
    let mut rig = Rig::new(4);
    rig.hold(pins::PUMP_START_SWITCH_PIN);
    assert!(rig.svc.is_pump_running());

    rig.tap(pins::PUMP_STOP_SWITCH_PIN);
    rig.run_for(500);
    assert!(!rig.svc.is_pump_running());
}

// ── Debounce ──────────────────────────────────────────────────

#[test]
fn bouncing_contact_settles_after_debounce_interval() {
    let config = ControllerConfig {
        debounce_ms: 30,
        control_tick_ms: 5,
        ..ControllerConfig::default()
    };
    let mut rig = Rig::with_config(config, 4);

    // Bounce at t = 5, 10, 15, 20, 25; settles LOW from t = 25.
    for level in [false, true, false, true, false] {
        rig.hw.set_raw(pins::PUMP_START_SWITCH_PIN, level);
        rig.tick();
        assert!(!rig.svc.is_pump_running());
    }

    // t = 30 ..= 50: still settling.
    for _ in 0..5 {
        rig.tick();
        assert!(!rig.svc.is_pump_running(), "t={}", rig.hw.now);
    }

    // t = 55: LOW has held for 30 ms.
    rig.tick();
    assert_eq!(rig.hw.now, 55);
    assert!(rig.svc.is_pump_running());
}

#[test]
fn glitch_shorter_than_debounce_is_ignored() {
    let mut rig = Rig::new(4);
    rig.hw.press(pins::UV_START_SWITCH_PIN);
    rig.tick();
    rig.tick();
    rig.hw.release(pins::UV_START_SWITCH_PIN);
    rig.run_for(200);

    assert!(!rig.svc.switches().uv_start);
    assert!(!rig.svc.is_uv_running());
}

// ── Faults ────────────────────────────────────────────────────

#[test]
fn fault_stops_running_pump_on_next_tick() {
    let mut rig = Rig::new(4);
    rig.tap(pins::PUMP_START_SWITCH_PIN);
    assert!(rig.svc.is_pump_running());

    rig.svc.set_fault(FaultFlag::PumpStartupError, true);
    assert!(rig.svc.is_pump_running(), "flags apply on the next tick");
    rig.tick();

    assert!(!rig.svc.is_pump_running());
    assert!(!rig.hw.relay_energised(pins::PUMP_RELAY_PIN));
    assert!(rig.hw.is_lit(pins::EM_LAMP_PIN));
    assert!(rig.sink.contains(&ControlEvent::FaultRaised(FaultFlag::PumpStartupError)));
    assert!(rig.sink.contains(&ControlEvent::Stopped {
        subsystem: Subsystem::Pump,
        cause: StopCause::Fault,
    }));
}

#[test]
fn fault_wins_over_start_edge() {
    let mut rig = Rig::new(4);
    rig.svc.set_fault(FaultFlag::PumpStartupError, true);
    rig.tap(pins::PUMP_START_SWITCH_PIN);

    assert!(!rig.svc.is_pump_running());
    assert!(rig.sink.contains(&ControlEvent::StartBlocked(Subsystem::Pump)));

    rig.svc.set_fault(FaultFlag::PumpStartupError, false);
    rig.tick();
    assert!(!rig.svc.is_pump_running(), "clearing a fault never starts");
    assert!(!rig.hw.is_lit(pins::EM_LAMP_PIN));

    rig.tap(pins::PUMP_START_SWITCH_PIN);
    assert!(rig.svc.is_pump_running());
}

#[test]
fn pump_lamp_follows_confirmed_startup() {
    let mut rig = Rig::new(4);
    rig.tap(pins::PUMP_START_SWITCH_PIN);
    assert!(!rig.hw.is_lit(pins::P_LAMP_PIN));

    rig.command(ControlCommand::SetFault {
        flag: FaultFlag::PumpStartupOk,
        active: true,
    });
    rig.tick();
    assert!(rig.hw.is_lit(pins::P_LAMP_PIN));
    assert!(rig.svc.is_pump_running());

    rig.tap(pins::PUMP_STOP_SWITCH_PIN);
    assert!(!rig.hw.is_lit(pins::P_LAMP_PIN));
}

#[test]
fn half_broken_warning_annotates_by_default() {
    let mut rig = Rig::new(4);
    rig.tap(pins::UV_START_SWITCH_PIN);
    rig.svc.set_fault(FaultFlag::UvHalfBrokenWarning, true);
    rig.tick();

    assert!(rig.svc.is_uv_running());
    assert!(rig.hw.is_lit(pins::EM_LAMP_PIN));
}

#[test]
fn half_broken_warning_blocks_when_configured() {
    let config = ControllerConfig {
        half_broken_policy: HalfBrokenPolicy::Block,
        ..ControllerConfig::default()
    };
    let mut rig = Rig::with_config(config, 4);
    rig.tap(pins::UV_START_SWITCH_PIN);
    rig.svc.set_fault(FaultFlag::UvHalfBrokenWarning, true);
    rig.tick();

    assert!(!rig.svc.is_uv_running());
    assert!(!rig.hw.relay_energised(pins::UV_RELAY_PIN));
    assert!(!rig.svc.uv_force_restore(true, &mut rig.hw, &mut rig.sink));
    assert!(!rig.svc.is_uv_running());
}

#[test]
fn refused_restore_stops_bank_before_next_tick() {
    let config = ControllerConfig {
        half_broken_policy: HalfBrokenPolicy::Block,
        ..ControllerConfig::default()
    };
    let mut rig = Rig::with_config(config, 4);
    rig.tap(pins::UV_START_SWITCH_PIN);
    assert!(rig.svc.is_uv_running());

    rig.svc.set_fault(FaultFlag::UvHalfBrokenWarning, true);
    assert!(!rig.svc.uv_force_restore(true, &mut rig.hw, &mut rig.sink));
    assert!(!rig.svc.is_uv_running());
    assert!(!rig.hw.relay_energised(pins::UV_RELAY_PIN));
    assert!(rig.sink.contains(&ControlEvent::StartBlocked(Subsystem::Uv)));
}

// ── UV startup sequence ───────────────────────────────────────

#[test]
fn uv_start_plays_startup_sequence() {
    let mut rig = Rig::new(4);
    rig.hold(pins::UV_START_SWITCH_PIN);
    assert!(rig.svc.is_uv_running());
    assert!(rig.sink.contains(&ControlEvent::StartupSequenceStarted { lamp_count: 4 }));
    let partial = lit_lamps(&rig.hw);
    assert!((1..4).contains(&partial), "lit {partial} lamps");

    rig.run_for(4 * rig.svc.config().startup_step_ms);
    assert_eq!(lit_lamps(&rig.hw), 4);
    assert!(rig.sink.contains(&ControlEvent::StartupSequenceFinished { lamp_count: 4 }));
    assert!(rig.hw.is_lit(pins::UV_LAMP_LED_PINS[3]));
    assert!(!rig.hw.is_lit(pins::UV_LAMP_LED_PINS[4]));

    rig.tap(pins::UV_STOP_SWITCH_PIN);
    assert_eq!(lit_lamps(&rig.hw), 0);
}

#[test]
fn zero_lamps_still_runs_uv() {
    let mut rig = Rig::new(0);
    rig.tap(pins::UV_START_SWITCH_PIN);
    rig.run_for(500);

    assert!(rig.svc.is_uv_running());
    assert!(rig.hw.relay_energised(pins::UV_RELAY_PIN));
    assert_eq!(lit_lamps(&rig.hw), 0);
    assert!(rig.sink.contains(&ControlEvent::StartupSequenceFinished { lamp_count: 0 }));
}

#[test]
fn startup_sequence_command_plays_while_stopped() {
    let mut rig = Rig::new(6);
    rig.command(ControlCommand::PlayStartupSequence(3));
    assert_eq!(lit_lamps(&rig.hw), 1);
    assert!(!rig.svc.is_uv_running());

    rig.run_for(3 * rig.svc.config().startup_step_ms);
    assert!(rig.sink.contains(&ControlEvent::StartupSequenceFinished { lamp_count: 3 }));
    assert_eq!(lit_lamps(&rig.hw), 0);
}

// ── Force restore ─────────────────────────────────────────────

#[test]
fn force_restore_false_stops_despite_held_start() {
    let mut rig = Rig::new(4);
    rig.hold(pins::UV_START_SWITCH_PIN);
    assert!(rig.svc.is_uv_running());

    assert!(rig.svc.uv_force_restore(false, &mut rig.hw, &mut rig.sink));
    assert!(!rig.svc.is_uv_running());
    assert!(!rig.hw.relay_energised(pins::UV_RELAY_PIN));
    assert!(rig.sink.contains(&ControlEvent::Stopped {
        subsystem: Subsystem::Uv,
        cause: StopCause::Forced,
    }));

    rig.run_for(300);
    assert!(!rig.svc.is_uv_running());
}

#[test]
fn force_restore_true_starts_immediately() {
    let mut rig = Rig::new(4);
    rig.command(ControlCommand::ForceUvRestore(true));

    assert!(rig.svc.is_uv_running());
    assert!(rig.hw.relay_energised(pins::UV_RELAY_PIN));
    assert_eq!(lit_lamps(&rig.hw), 1);

    // Restoring a running bank changes nothing.
    rig.sink.clear();
    assert!(rig.svc.uv_force_restore(true, &mut rig.hw, &mut rig.sink));
    assert!(!rig.sink.contains(&ControlEvent::Started(Subsystem::Uv)));
}

// ── Output idempotence ────────────────────────────────────────

#[test]
fn settled_controller_writes_nothing() {
    let mut rig = Rig::new(4);
    rig.tap(pins::PUMP_START_SWITCH_PIN);
    rig.tap(pins::UV_START_SWITCH_PIN);
    rig.run_for(2_000);

    rig.hw.writes.clear();
    rig.run_for(1_000);
    assert!(rig.hw.writes.is_empty(), "unexpected writes: {:?}", rig.hw.writes);
}

#[test]
fn loop_survives_clock_wrap() {
    let mut hw = MockBoard::new();
    hw.now = u32::MAX - 15;
    let mut rig = Rig::boot(ControllerConfig::default(), 2, hw);

    rig.hold(pins::PUMP_START_SWITCH_PIN);
    assert!(rig.hw.now < 1_000);
    assert!(rig.svc.is_pump_running());
}
