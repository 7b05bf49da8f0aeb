//! Outbound control events.
//!
//! The coordinator emits these through the
//! [`EventSink`](super::ports::EventSink) port on every state change and
//! fault detection.  They carry no behaviour: dropping them all (the
//! production sink) changes nothing about the outputs.

use crate::faults::FaultFlag;
use crate::fsm::Subsystem;
use crate::fsm::context::StopCause;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlEvent {
    /// Setup finished; both subsystems are stopped.
    Ready { lamp_count: u8 },

    /// More lamps were detected than the board can drive.
    LampCountClamped { detected: u8, driven: u8 },

    /// A subsystem entered `Running`.
    Started(Subsystem),

    /// A subsystem entered `Stopped`.
    Stopped { subsystem: Subsystem, cause: StopCause },

    /// A start request was refused because a blocking fault is active.
    StartBlocked(Subsystem),

    /// An external flag was set.
    FaultRaised(FaultFlag),

    /// An external flag was cleared.
    FaultCleared(FaultFlag),

    /// The lamp startup sequence began.
    StartupSequenceStarted { lamp_count: u8 },

    /// The lamp startup sequence ran to completion.
    StartupSequenceFinished { lamp_count: u8 },
}
