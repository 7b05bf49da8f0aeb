//! Application core — pure control logic, zero direct I/O.
//!
//! All interaction with the board happens through **port traits** defined
//! in [`ports`], keeping this layer fully testable without real pins.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
