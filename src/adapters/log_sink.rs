//! Event sink adapters.
//!
//! [`LogEventSink`] writes every [`ControlEvent`] to the `log` facade
//! (serial console on the board, `env_logger` on the host).
//! [`NullEventSink`] discards them.  [`DefaultSink`] picks one at build
//! time through the `diagnostics` feature, so release firmware carries no
//! formatting code for events at all.

use log::{info, warn};

use crate::app::events::ControlEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`ControlEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &ControlEvent) {
        match event {
            ControlEvent::Ready { lamp_count } => {
                info!("READY | uv_lamps={}", lamp_count);
            }
            ControlEvent::LampCountClamped { detected, driven } => {
                warn!("READY | {} UV lamps detected, driving {}", detected, driven);
            }
            ControlEvent::Started(subsystem) => {
                info!("STATE | {} -> RUNNING", subsystem);
            }
            ControlEvent::Stopped { subsystem, cause } => {
                info!("STATE | {} -> STOPPED ({:?})", subsystem, cause);
            }
            ControlEvent::StartBlocked(subsystem) => {
                warn!("STATE | {} start refused, fault active", subsystem);
            }
            ControlEvent::FaultRaised(flag) => {
                warn!("FAULT | raised: {}", flag);
            }
            ControlEvent::FaultCleared(flag) => {
                info!("FAULT | cleared: {}", flag);
            }
            ControlEvent::StartupSequenceStarted { lamp_count } => {
                info!("LAMPS | startup sequence, {} lamp(s)", lamp_count);
            }
            ControlEvent::StartupSequenceFinished { lamp_count } => {
                info!("LAMPS | startup sequence done, {} lamp(s) lit", lamp_count);
            }
        }
    }
}

/// Sink that drops every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullEventSink;

impl EventSink for NullEventSink {
    #[inline(always)]
    fn emit(&mut self, _event: &ControlEvent) {}
}

#[cfg(feature = "diagnostics")]
pub type DefaultSink = LogEventSink;

#[cfg(not(feature = "diagnostics"))]
pub type DefaultSink = NullEventSink;
