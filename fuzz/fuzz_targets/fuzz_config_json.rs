//! Fuzz target: `ControllerConfig::from_json`
//!
//! Invariants checked:
//! - No panics under any byte sequence
//! - Every accepted config also passes `validate()`
//!
//! cargo fuzz run fuzz_config_json

#![no_main]

use libfuzzer_sys::fuzz_target;
use uvpump::config::ControllerConfig;

fuzz_target!(|data: &[u8]| {
    if let Ok(config) = ControllerConfig::from_json(data) {
        assert!(config.validate().is_ok());
    }
});
