//! Logical output frame and its mapping onto pin levels.
//!
//! The coordinator derives one [`OutputFrame`] per tick from the run states
//! and fault flags, then writes only the pins whose level differs from the
//! previously applied frame.

use heapless::Vec;

use crate::config::RelayPolarity;
use crate::drivers::startup_sequence::LampMask;
use crate::pins::{self, OUTPUT_PIN_COUNT, Pin};

/// Every output pin with its electrical level, in a fixed order.
pub type PinLevels = Vec<(Pin, bool), OUTPUT_PIN_COUNT>;

/// Desired logical state of every controller output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputFrame {
    pub pump_relay: bool,
    pub pump_run_led: bool,
    pub pump_stop_led: bool,
    pub pump_lamp: bool,
    pub emergency_lamp: bool,
    pub uv_relay: bool,
    pub uv_run_led: bool,
    pub uv_stop_led: bool,
    /// Bit `i` = UV lamp LED `i`.
    pub uv_lamps: LampMask,
}

impl OutputFrame {
    /// Electrical levels for every output pin.  Relays follow `polarity`;
    /// LEDs and lamps are active HIGH.
    pub fn pin_levels(&self, polarity: RelayPolarity) -> PinLevels {
        let fixed = [
            (pins::PUMP_RELAY_PIN, polarity.level(self.pump_relay)),
            (pins::UV_RELAY_PIN, polarity.level(self.uv_relay)),
            (pins::LED_PUMP_RUN_PIN, self.pump_run_led),
            (pins::LED_PUMP_STOP_PIN, self.pump_stop_led),
            (pins::LED_UV_RUN_PIN, self.uv_run_led),
            (pins::LED_UV_STOP_PIN, self.uv_stop_led),
            (pins::EM_LAMP_PIN, self.emergency_lamp),
            (pins::P_LAMP_PIN, self.pump_lamp),
        ];
        let lamps = pins::UV_LAMP_LED_PINS
            .iter()
            .enumerate()
            .map(|(i, &pin)| (pin, self.uv_lamps & (1 << i) != 0));

        fixed.into_iter().chain(lamps).collect()
    }
}

/// Pins whose level differs between `prev` and `next`.  With no previous
/// frame every pin is reported.
pub fn changed_levels<'a>(
    prev: Option<&'a PinLevels>,
    next: &'a PinLevels,
) -> impl Iterator<Item = (Pin, bool)> + 'a {
    next.iter().enumerate().filter_map(move |(i, &(pin, level))| {
        let unchanged = prev.and_then(|p| p.get(i)).is_some_and(|&(_, old)| old == level);
        (!unchanged).then_some((pin, level))
    })
}
