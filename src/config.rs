//! Controller configuration parameters
//!
//! All tunable parameters for the pump / UV controller.  Values are fixed
//! at build time through [`ControllerConfig::default`] or loaded from JSON
//! by the host simulator.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::pins;

/// Upper bound accepted for the debounce interval.
const MAX_DEBOUNCE_MS: u32 = 1000;
/// Upper bound accepted for one startup animation step.
const MAX_STARTUP_STEP_MS: u32 = 5000;

/// Which pin level energises a relay coil.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelayPolarity {
    /// LOW energises the coil (common opto-isolated relay boards).
    ActiveLow,
    /// HIGH energises the coil.
    ActiveHigh,
}

impl RelayPolarity {
    /// Pin level for the requested coil state.
    pub const fn level(self, energised: bool) -> bool {
        match self {
            Self::ActiveLow => {
                if energised {
                    pins::RELAY_ON
                } else {
                    pins::RELAY_OFF
                }
            }
            Self::ActiveHigh => energised,
        }
    }
}

/// What the UV half-broken warning does to the UV run state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HalfBrokenPolicy {
    /// Refuse to start and stop a running UV bank while the warning is set.
    Block,
    /// Only light the emergency lamp; UV keeps running.
    Annotate,
}

/// Core controller configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    // --- Inputs ---
    /// Raw level must hold this long before a switch changes state (ms)
    pub debounce_ms: u32,
    /// Switches pull the pin LOW when pressed
    pub switch_active_low: bool,

    // --- Outputs ---
    /// Relay coil convention for both pump and UV relays
    pub relay_polarity: RelayPolarity,

    // --- UV ---
    /// Half-broken warning handling
    pub half_broken_policy: HalfBrokenPolicy,
    /// Delay between lamps lighting up in the startup sequence (ms)
    pub startup_step_ms: u32,

    // --- Timing ---
    /// Main loop period the controller is designed for (ms)
    pub control_tick_ms: u32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            // Inputs
            debounce_ms: 30,
            switch_active_low: true,

            // Outputs
            relay_polarity: RelayPolarity::ActiveLow,

            // UV
            half_broken_policy: HalfBrokenPolicy::Annotate,
            startup_step_ms: 150,

            // Timing
            control_tick_ms: 10, // 100 Hz
        }
    }
}

impl ControllerConfig {
    /// Range-check every field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.debounce_ms == 0 || self.debounce_ms > MAX_DEBOUNCE_MS {
            return Err(ConfigError::ValidationFailed(
                "debounce_ms must be within 1..=1000",
            ));
        }
        if self.control_tick_ms == 0 {
            return Err(ConfigError::ValidationFailed("control_tick_ms must be non-zero"));
        }
        if self.control_tick_ms > self.debounce_ms {
            return Err(ConfigError::ValidationFailed(
                "control_tick_ms must not exceed debounce_ms",
            ));
        }
        if self.startup_step_ms == 0 || self.startup_step_ms > MAX_STARTUP_STEP_MS {
            return Err(ConfigError::ValidationFailed(
                "startup_step_ms must be within 1..=5000",
            ));
        }
        Ok(())
    }

    /// Parse and validate a JSON document.  Missing fields take defaults.
    pub fn from_json(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_slice(bytes).map_err(|_| ConfigError::Corrupted)?;
        config.validate()?;
        Ok(config)
    }
}
