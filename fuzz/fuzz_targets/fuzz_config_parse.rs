#![no_main]

use libfuzzer_sys::fuzz_target;
use noterelay::config::Config;

fuzz_target!(|data: &[u8]| {
    if let Ok(config) = serde_json::from_slice::<Config>(data) {
        let _ = config.validate();
    }
});
