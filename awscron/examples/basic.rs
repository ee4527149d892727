//! AWS crontab conversion through the side channel.

use awscron::{aws_to_standard_cron, standard_to_aws_cron};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let converted = aws_to_standard_cron("0 10 ? * MON-FRI 2024")?;
    println!("aws: 0 10 ? * MON-FRI 2024  →  standard: {}", converted.crontab);
    println!("  year: {}", converted.aws_specific_details.year);
    println!("  ?-fields: {:?}", converted.aws_specific_details.question_parts);

    // Any standard crontab can be upgraded with the same details.
    let aws = standard_to_aws_cron("30 15 * * MON-FRI", &converted.aws_specific_details)?;
    println!("standard: 30 15 * * MON-FRI  →  aws: {aws}");

    // Wrong field counts are errors, with the input underlined.
    if let Err(e) = aws_to_standard_cron("0 10 * * *") {
        println!();
        println!("{}", e.display_rich());
    }

    Ok(())
}
