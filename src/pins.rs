//! Digital pin assignments for the pump / UV controller board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

/// Board pin identifier.
pub type Pin = u8;

// ---------------------------------------------------------------------------
// Switch inputs (momentary, pull-up, pressed = LOW)
// ---------------------------------------------------------------------------

pub const PUMP_START_SWITCH_PIN: Pin = 2;
pub const PUMP_STOP_SWITCH_PIN: Pin = 3;
pub const UV_START_SWITCH_PIN: Pin = 4;
pub const UV_STOP_SWITCH_PIN: Pin = 5;

// ---------------------------------------------------------------------------
// Relays
// ---------------------------------------------------------------------------

/// Pump contactor relay coil.
pub const PUMP_RELAY_PIN: Pin = 6;
/// UV ballast relay coil.
pub const UV_RELAY_PIN: Pin = 7;

/// Pin level that energises an active-low relay.
pub const RELAY_ON: bool = false;
/// Pin level that releases an active-low relay.
pub const RELAY_OFF: bool = true;

// ---------------------------------------------------------------------------
// Indicators (active HIGH)
// ---------------------------------------------------------------------------

pub const LED_PUMP_RUN_PIN: Pin = 8;
pub const LED_PUMP_STOP_PIN: Pin = 9;
pub const LED_UV_RUN_PIN: Pin = 10;
pub const LED_UV_STOP_PIN: Pin = 11;

/// Emergency lamp: lit while a pump startup error or UV half-broken
/// warning is flagged.
pub const EM_LAMP_PIN: Pin = 12;
/// Pump lamp: lit while the pump runs with a confirmed startup.
pub const P_LAMP_PIN: Pin = 13;

// ---------------------------------------------------------------------------
// UV lamp bank
// ---------------------------------------------------------------------------

/// Upper bound on the number of UV lamps the board can drive.
pub const MAX_UV_LAMPS: usize = 10;

/// Per-lamp status LEDs, lamp 0 first.
pub const UV_LAMP_LED_PINS: [Pin; MAX_UV_LAMPS] = [22, 24, 26, 28, 30, 32, 34, 36, 38, 40];

// ---------------------------------------------------------------------------
// Pin groups
// ---------------------------------------------------------------------------

/// Number of switch inputs.
pub const SWITCH_PIN_COUNT: usize = 4;

/// Every switch input, in sampling order.
pub const SWITCH_PINS: [Pin; SWITCH_PIN_COUNT] = [
    PUMP_START_SWITCH_PIN,
    PUMP_STOP_SWITCH_PIN,
    UV_START_SWITCH_PIN,
    UV_STOP_SWITCH_PIN,
];

/// Number of discrete outputs driven by the controller.
pub const OUTPUT_PIN_COUNT: usize = 8 + MAX_UV_LAMPS;
