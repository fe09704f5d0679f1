//! Fuzz target: `DashboardConfig::from_json`
//!
//! Arbitrary bytes must either be rejected with a typed error or produce a
//! config that passes its own validation.
//!
//! cargo fuzz run fuzz_config_json

#![no_main]

use coopdash::config::DashboardConfig;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(cfg) = DashboardConfig::from_json(data) {
        assert!(cfg.validate().is_ok(), "from_json returned an invalid config");
        assert!(cfg.tick_interval_ms < cfg.poll_interval_ms);
    }
});
