//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that drives the controller end to end
//! against the mock board.  All tests run on the host with no real
//! hardware required.

mod controller_tests;
