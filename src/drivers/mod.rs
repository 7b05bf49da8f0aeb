//! Switch debouncing, lamp startup sequencing, and HAL pin tables.

pub mod gpio;
pub mod startup_sequence;
pub mod switch;
