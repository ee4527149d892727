#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(converted) = awscron::aws_to_standard_cron(s) {
            let restored =
                awscron::standard_to_aws_cron(&converted.crontab, &converted.aws_specific_details)
                    .expect("downgraded crontab must have five fields");
            let normalized = s.split_whitespace().collect::<Vec<_>>().join(" ");
            assert_eq!(restored, normalized, "roundtrip failed");
        }
    }
});
