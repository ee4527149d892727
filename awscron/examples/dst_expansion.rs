//! Expanding a local-time crontab into the UTC crontabs that follow DST.

use awscron::{aws_local_cron_to_aws_utc_crons, LocalCron, TimezoneExpander};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    for timezone in ["America/New_York", "Europe/Berlin", "Asia/Tokyo"] {
        println!("0 10 ? * * 2024 in {timezone}:");
        for cron in aws_local_cron_to_aws_utc_crons("0 10 ? * * 2024", timezone)? {
            println!("  {cron}");
        }
    }

    // Pin the DST rules to a given year when the year field is a wildcard.
    println!();
    let expander = TimezoneExpander::new().with_year(2023);
    for cron in expander.expand("30 8 ? * MON-FRI *", "Australia/Sydney")? {
        println!("  {cron}");
    }

    // The engine also works on standard crontabs directly.
    println!();
    let local = LocalCron::new("0 9 * * *", "Australia/Lord_Howe")?.with_year(2024);
    for cron in local.to_utc_crons()? {
        println!("  {cron}");
    }

    Ok(())
}
