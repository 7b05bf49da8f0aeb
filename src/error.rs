//! Error types for the controller.
//!
//! All variants are `Copy` so they can be passed around the control loop
//! without allocation.  Nothing here ever reaches the run-state machines:
//! pin failures are logged and degraded by the adapters.

use core::fmt;

use crate::pins::Pin;

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Config source could not be parsed.
    Corrupted,
    /// A field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}

// ---------------------------------------------------------------------------
// Pin errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinError {
    /// The HAL returned an error reading this input.
    ReadFailed(Pin),
    /// The HAL returned an error driving this output.
    WriteFailed(Pin),
    /// No HAL pin is registered under this number.
    Unmapped(Pin),
    /// The pin table has no room left for this pin.
    TableFull(Pin),
}

impl fmt::Display for PinError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadFailed(pin) => write!(f, "read failed on pin {pin}"),
            Self::WriteFailed(pin) => write!(f, "write failed on pin {pin}"),
            Self::Unmapped(pin) => write!(f, "pin {pin} not mapped"),
            Self::TableFull(pin) => write!(f, "no room to map pin {pin}"),
        }
    }
}

impl core::error::Error for ConfigError {}
impl core::error::Error for PinError {}
