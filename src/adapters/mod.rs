//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements            | Connects to                   |
//! |------------|-----------------------|-------------------------------|
//! | `hardware` | InputPort, OutputPort | embedded-hal pin tables       |
//! |            | ClockPort             | any inner clock               |
//! | `log_sink` | EventSink             | `log` facade                  |
//! | `time`     | ClockPort             | manually stepped millis       |

pub mod hardware;
pub mod log_sink;
pub mod time;
