//! Inbound commands to the control service.
//!
//! These represent actions requested by collaborators (fault detection,
//! lamp-count detection, a maintenance console) that the
//! [`ControlService`](super::service::ControlService) interprets and acts
//! upon.

use crate::faults::FaultFlag;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand {
    /// Force the UV bank on (`true`) or off (`false`), bypassing switches.
    ForceUvRestore(bool),

    /// Raise or clear an external status flag.
    SetFault { flag: FaultFlag, active: bool },

    /// Play the lamp startup sequence for the given lamp count.
    PlayStartupSequence(u8),
}
