#![no_main]
use libfuzzer_sys::fuzz_target;

// Arbitrary TOML must either load or fail with a parse/validation error;
// neither path may panic.
fuzz_target!(|data: &str| {
    if let Ok(cfg) = rocker_config::load_toml(data) {
        let _ = cfg.validate();
    }
});
