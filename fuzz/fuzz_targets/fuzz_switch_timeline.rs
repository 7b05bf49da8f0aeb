//! Fuzz target: full control loop over an arbitrary input timeline
//!
//! Each input byte is one step: the low nibble holds the four raw switch
//! levels, bits 4..6 toggle the fault flags and bit 7 requests a UV force
//! restore.  A tick follows every step.
//!
//! Invariants checked:
//! - No panics, including across the u32 clock wrap
//! - The pump never runs while `PumpStartupError` is set
//!
//! cargo fuzz run fuzz_switch_timeline

#![no_main]

use libfuzzer_sys::fuzz_target;
use uvpump::adapters::log_sink::NullEventSink;
use uvpump::app::ports::{ClockPort, InputPort, OutputPort};
use uvpump::app::service::ControlService;
use uvpump::config::ControllerConfig;
use uvpump::faults::FaultFlag;
use uvpump::pins::{self, Pin};

struct Board {
    raw: u8,
    now: u32,
}

impl InputPort for Board {
    fn is_high(&mut self, pin: Pin) -> bool {
        pins::SWITCH_PINS
            .iter()
            .position(|p| *p == pin)
            .is_none_or(|i| self.raw & (1 << i) != 0)
    }
}

impl OutputPort for Board {
    fn set_level(&mut self, _pin: Pin, _high: bool) {}
}

impl ClockPort for Board {
    fn now_ms(&self) -> u32 {
        self.now
    }
}

fuzz_target!(|data: &[u8]| {
    let config = ControllerConfig::default();
    let tick_ms = config.control_tick_ms;
    let mut hw = Board {
        raw: 0x0F,
        now: u32::MAX - 500,
    };
    let mut sink = NullEventSink;
    let Ok(mut svc) = ControlService::uv_setup(config, 6, &mut hw, &mut sink) else {
        return;
    };

    for &byte in data {
        hw.raw = byte & 0x0F;
        for (bit, flag) in FaultFlag::ALL.into_iter().enumerate() {
            if byte & (0x10 << bit) != 0 {
                svc.set_fault(flag, !svc.faults().contains(flag));
            }
        }
        if byte & 0x80 != 0 {
            svc.uv_force_restore(byte & 0x01 != 0, &mut hw, &mut sink);
        }

        hw.now = hw.now.wrapping_add(tick_ms);
        svc.uv_loop_task(&mut hw, &mut sink);

        if svc.faults().blocks_pump() {
            assert!(!svc.is_pump_running());
        }
    }
});
