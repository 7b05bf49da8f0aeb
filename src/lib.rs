//! Pump / UV lamp controller.
//!
//! Two independently switched subsystems, each a two-state run machine
//! driven by debounced start/stop switches and gated by a fault mask.
//! All board access goes through the port traits in [`app::ports`], so
//! the whole control path runs on the host under test.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod coordinator;
pub mod drivers;
pub mod error;
pub mod faults;
pub mod fsm;
pub mod outputs;
pub mod pins;
