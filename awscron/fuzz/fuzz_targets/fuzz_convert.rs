#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Expansion in UTC should never panic, only return Ok or Err
        if let Ok(local) = awscron::LocalCron::new(s, "UTC") {
            let _ = local.with_year(2024).to_utc_crons();
        }
    }
});
