//! uvpump-sim — host simulator for the pump / UV controller.
//!
//! Runs the real control path against simulated pins and a manually
//! stepped clock, then plays a scripted operator session:
//!
//! ```text
//!  pump start ─▶ UV start (lamp sequence) ─▶ pump startup OK
//!       ─▶ pump startup error ─▶ cleared ─▶ UV force stop / restore
//!       ─▶ UV half-broken warning ─▶ stop switches
//! ```
//!
//! Usage: `uvpump-sim [CONFIG.json] [LAMP_COUNT]`.  Set `RUST_LOG` to
//! change verbosity (default `info`).

use std::cell::Cell;
use std::convert::Infallible;
use std::rc::Rc;

use anyhow::{Context, Result};
use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use log::info;

use uvpump::adapters::hardware::HardwareAdapter;
use uvpump::adapters::log_sink::DefaultSink;
use uvpump::adapters::time::ManualClock;
use uvpump::app::commands::ControlCommand;
use uvpump::app::ports::ClockPort;
use uvpump::app::service::ControlService;
use uvpump::config::ControllerConfig;
use uvpump::drivers::gpio::{HalInputs, HalOutputs};
use uvpump::faults::FaultFlag;
use uvpump::outputs::OutputFrame;
use uvpump::pins::{self, Pin};

const DEFAULT_LAMP_COUNT: u8 = 4;

// ── Simulated pin ─────────────────────────────────────────────

/// A pin whose level is shared between the controller and the script.
#[derive(Clone)]
struct SimPin(Rc<Cell<bool>>);

impl SimPin {
    fn new(level: bool) -> Self {
        Self(Rc::new(Cell::new(level)))
    }
}

impl ErrorType for SimPin {
    type Error = Infallible;
}

impl InputPin for SimPin {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        Ok(self.0.get())
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        Ok(!self.0.get())
    }
}

impl OutputPin for SimPin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.0.set(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.0.set(true);
        Ok(())
    }
}

// ── Simulation harness ────────────────────────────────────────

struct Sim {
    hw: HardwareAdapter<SimPin, SimPin, ManualClock>,
    switches: Vec<(Pin, SimPin)>,
    outputs: Vec<(Pin, SimPin)>,
    svc: ControlService,
    sink: DefaultSink,
    tick_ms: u32,
    released_level: bool,
}

impl Sim {
    fn boot(config: ControllerConfig, lamp_count: u8) -> Result<Self> {
        let released_level = config.switch_active_low;

        let mut inputs = HalInputs::new();
        let mut switches = Vec::new();
        for pin in pins::SWITCH_PINS {
            let io = SimPin::new(released_level);
            inputs.register(pin, io.clone())?;
            switches.push((pin, io));
        }

        let mut hal_outputs = HalOutputs::new();
        let mut outputs = Vec::new();
        for (pin, _) in OutputFrame::default().pin_levels(config.relay_polarity) {
            let io = SimPin::new(false);
            hal_outputs.register(pin, io.clone())?;
            outputs.push((pin, io));
        }

        let mut hw = HardwareAdapter::new(inputs, hal_outputs, ManualClock::new(0), released_level);
        let mut sink = DefaultSink::default();
        let tick_ms = config.control_tick_ms;
        let svc = ControlService::uv_setup(config, lamp_count, &mut hw, &mut sink)
            .context("controller setup failed")?;

        Ok(Self {
            hw,
            switches,
            outputs,
            svc,
            sink,
            tick_ms,
            released_level,
        })
    }

    /// Tick the controller for at least `ms` of simulated time.
    fn run_for(&mut self, ms: u32) {
        let mut elapsed = 0;
        while elapsed < ms {
            self.hw.clock_mut().advance(self.tick_ms);
            self.svc.uv_loop_task(&mut self.hw, &mut self.sink);
            elapsed += self.tick_ms;
        }
    }

    fn set_switch(&mut self, pin: Pin, pressed: bool) {
        let level = if pressed {
            !self.released_level
        } else {
            self.released_level
        };
        if let Some((_, io)) = self.switches.iter().find(|(p, _)| *p == pin) {
            io.0.set(level);
        }
    }

    /// Hold a switch long enough to debounce, then release it.
    fn press(&mut self, pin: Pin) {
        let settle = self.svc.config().debounce_ms * 2;
        self.set_switch(pin, true);
        self.run_for(settle);
        self.set_switch(pin, false);
        self.run_for(settle);
    }

    fn command(&mut self, cmd: ControlCommand) {
        self.svc.handle_command(cmd, &mut self.hw, &mut self.sink);
    }

    fn report(&self, label: &str) {
        let lit: Vec<Pin> = pins::UV_LAMP_LED_PINS
            .iter()
            .copied()
            .filter(|pin| self.output_level(*pin))
            .collect();
        info!(
            "[t={:>6}ms] {:<28} pump={:?} uv={:?} faults={:#05b} em_lamp={} p_lamp={} uv_lamps={:?}",
            self.hw.now_ms(),
            label,
            self.svc.pump_state(),
            self.svc.uv_state(),
            self.svc.faults().bits(),
            self.output_level(pins::EM_LAMP_PIN),
            self.output_level(pins::P_LAMP_PIN),
            lit,
        );
    }

    fn output_level(&self, pin: Pin) -> bool {
        self.outputs
            .iter()
            .find(|(p, _)| *p == pin)
            .is_some_and(|(_, io)| io.0.get())
    }
}

// ── Entry point ───────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => {
            let bytes = std::fs::read(&path).with_context(|| format!("reading {path}"))?;
            ControllerConfig::from_json(&bytes).with_context(|| format!("loading {path}"))?
        }
        None => ControllerConfig::default(),
    };
    let lamp_count = args
        .next()
        .map(|s| s.parse::<u8>())
        .transpose()
        .context("lamp count must be a number in 0..=255")?
        .unwrap_or(DEFAULT_LAMP_COUNT);

    let mut sim = Sim::boot(config, lamp_count)?;
    sim.report("boot");

    sim.press(pins::PUMP_START_SWITCH_PIN);
    sim.report("pump start pressed");

    sim.press(pins::UV_START_SWITCH_PIN);
    sim.report("uv start pressed");
    let sequence_ms = sim.svc.config().startup_step_ms * u32::from(sim.svc.lamp_count());
    sim.run_for(sequence_ms);
    sim.report("startup sequence done");

    sim.command(ControlCommand::SetFault {
        flag: FaultFlag::PumpStartupOk,
        active: true,
    });
    sim.run_for(sim.tick_ms);
    sim.report("pump startup confirmed");

    sim.command(ControlCommand::SetFault {
        flag: FaultFlag::PumpStartupError,
        active: true,
    });
    sim.run_for(sim.tick_ms);
    sim.report("pump startup error");

    sim.press(pins::PUMP_START_SWITCH_PIN);
    sim.report("pump start while faulted");

    sim.command(ControlCommand::SetFault {
        flag: FaultFlag::PumpStartupError,
        active: false,
    });
    sim.press(pins::PUMP_START_SWITCH_PIN);
    sim.report("pump restarted");

    sim.command(ControlCommand::ForceUvRestore(false));
    sim.report("uv forced off");
    sim.command(ControlCommand::ForceUvRestore(true));
    sim.report("uv force restored");

    sim.command(ControlCommand::SetFault {
        flag: FaultFlag::UvHalfBrokenWarning,
        active: true,
    });
    sim.run_for(sim.tick_ms);
    sim.report("uv half-broken warning");

    sim.press(pins::UV_STOP_SWITCH_PIN);
    sim.press(pins::PUMP_STOP_SWITCH_PIN);
    sim.report("stop switches pressed");

    info!("simulation finished after {} ticks", sim.svc.tick_count());
    Ok(())
}
