//! embedded-hal pin tables.
//!
//! Maps board pin numbers from [`crate::pins`] onto HAL pin objects so the
//! port traits can address pins by number.  Tables are fixed-capacity
//! (`heapless`), and every pin in a table shares one type, which is what
//! HALs with type-erased pins (`AnyPin`, `Flex`, `Output<'_>`) provide.
//!
//! Errors from the HAL are turned into [`PinError`]s here; the port
//! implementations in [`crate::adapters::hardware`] log and degrade them.

use embedded_hal::digital::{InputPin, OutputPin, PinState};
use heapless::Vec;

use crate::error::PinError;
use crate::pins::Pin;

/// Input pins addressed by board pin number.
pub struct HalInputs<P, const N: usize> {
    pins: Vec<(Pin, P), N>,
}

impl<P: InputPin, const N: usize> HalInputs<P, N> {
    pub fn new() -> Self {
        Self { pins: Vec::new() }
    }

    /// Register `io` under board pin `pin`.
    pub fn register(&mut self, pin: Pin, io: P) -> Result<(), PinError> {
        self.pins
            .push((pin, io))
            .map_err(|_| PinError::TableFull(pin))
    }

    /// Raw level of `pin`.
    pub fn read(&mut self, pin: Pin) -> Result<bool, PinError> {
        let (_, io) = self
            .pins
            .iter_mut()
            .find(|(p, _)| *p == pin)
            .ok_or(PinError::Unmapped(pin))?;
        io.is_high().map_err(|_| PinError::ReadFailed(pin))
    }
}

impl<P: InputPin, const N: usize> Default for HalInputs<P, N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Output pins addressed by board pin number.
pub struct HalOutputs<P, const N: usize> {
    pins: Vec<(Pin, P), N>,
}

impl<P: OutputPin, const N: usize> HalOutputs<P, N> {
    pub fn new() -> Self {
        Self { pins: Vec::new() }
    }

    pub fn register(&mut self, pin: Pin, io: P) -> Result<(), PinError> {
        self.pins
            .push((pin, io))
            .map_err(|_| PinError::TableFull(pin))
    }

    /// Drive `pin` to `high`.
    pub fn write(&mut self, pin: Pin, high: bool) -> Result<(), PinError> {
        let (_, io) = self
            .pins
            .iter_mut()
            .find(|(p, _)| *p == pin)
            .ok_or(PinError::Unmapped(pin))?;
        io.set_state(PinState::from(high))
            .map_err(|_| PinError::WriteFailed(pin))
    }
}

impl<P: OutputPin, const N: usize> Default for HalOutputs<P, N> {
    fn default() -> Self {
        Self::new()
    }
}
