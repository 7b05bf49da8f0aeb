//! Externally supplied fault flags and change tracking.
//!
//! Flags are raised and cleared by the lamp-count and startup detection
//! collaborators through
//! [`ControlService::set_fault`](crate::app::service::ControlService::set_fault).
//! The coordinator only reads them.  They are kept in a bitfield so several
//! can be active at once.
//!
//! ## Flag lifecycle
//!
//! 1. A collaborator detects a condition and sets the flag.
//! 2. On the next tick the [`FaultMonitor`] reports it as raised; the
//!    coordinator stops and blocks the affected subsystem.
//! 3. The collaborator clears the flag.  Nothing is retried automatically:
//!    the operator presses start again or an administrator forces a restore.

use core::fmt;

use crate::config::HalfBrokenPolicy;

/// One externally owned status flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum FaultFlag {
    /// Pump failed to come up (no pressure / no flow confirmation).
    PumpStartupError = 0b0000_0001,
    /// Pump startup was confirmed.
    PumpStartupOk = 0b0000_0010,
    /// Part of the UV lamp bank is not drawing current.
    UvHalfBrokenWarning = 0b0000_0100,
}

impl FaultFlag {
    pub const ALL: [Self; 3] = [
        Self::PumpStartupError,
        Self::PumpStartupOk,
        Self::UvHalfBrokenWarning,
    ];

    /// Return the bitmask for this flag.
    pub const fn mask(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for FaultFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PumpStartupError => write!(f, "pump startup error"),
            Self::PumpStartupOk => write!(f, "pump startup ok"),
            Self::UvHalfBrokenWarning => write!(f, "UV half-broken warning"),
        }
    }
}

/// Bitfield of active [`FaultFlag`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FaultFlags(u8);

impl FaultFlags {
    pub const NONE: Self = Self(0);

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn contains(self, flag: FaultFlag) -> bool {
        self.0 & flag.mask() != 0
    }

    pub fn set(&mut self, flag: FaultFlag, active: bool) {
        if active {
            self.0 |= flag.mask();
        } else {
            self.0 &= !flag.mask();
        }
    }

    #[must_use]
    pub fn with(mut self, flag: FaultFlag) -> Self {
        self.set(flag, true);
        self
    }

    /// Whether the pump must not run.
    pub const fn blocks_pump(self) -> bool {
        self.contains(FaultFlag::PumpStartupError)
    }

    /// Whether the UV bank must not run under `policy`.
    pub const fn blocks_uv(self, policy: HalfBrokenPolicy) -> bool {
        matches!(policy, HalfBrokenPolicy::Block) && self.contains(FaultFlag::UvHalfBrokenWarning)
    }

    /// Whether the emergency lamp should be lit.
    pub const fn emergency(self) -> bool {
        self.contains(FaultFlag::PumpStartupError) || self.contains(FaultFlag::UvHalfBrokenWarning)
    }
}

/// A flag that changed since the previous observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagChange {
    pub flag: FaultFlag,
    pub active: bool,
}

/// Remembers the flags seen on the previous tick.
#[derive(Debug, Default)]
pub struct FaultMonitor {
    last: FaultFlags,
}

impl FaultMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `flags` and report every flag that flipped.
    pub fn observe(&mut self, flags: FaultFlags) -> heapless::Vec<FlagChange, 3> {
        let mut changes = heapless::Vec::new();
        for flag in FaultFlag::ALL {
            let was = self.last.contains(flag);
            let now = flags.contains(flag);
            if was != now {
                // Capacity equals FaultFlag::ALL.len().
                let _ = changes.push(FlagChange { flag, active: now });
            }
        }
        self.last = flags;
        changes
    }
}
