//! API conformance test. Verifies every public entry point exists with the
//! expected signature.
//!
//! This is a compile-time + runtime check: if any function is missing, the
//! code won't compile. The runtime assertions verify return types.

use awscron::{
    aws_local_cron_to_aws_utc_crons, aws_to_standard_cron, standard_to_aws_cron,
    validate_aws_cron, AwsSpecificDetails, ConvertedCron, CronError, CronFieldPosition, ErrorKind,
    LocalCron, LocalCronError, TimezoneExpander, TzdbExpander, UtcExpander,
};

#[test]
fn fn_aws_to_standard_cron() {
    let result: Result<ConvertedCron, CronError> = aws_to_standard_cron("0 10 ? * * 2024");
    let converted = result.unwrap();
    let _: String = converted.crontab;
    let details: AwsSpecificDetails = converted.aws_specific_details;
    let _: String = details.year;
    let _: Vec<CronFieldPosition> = details.question_parts;
}

#[test]
fn fn_standard_to_aws_cron() {
    let details = AwsSpecificDetails {
        year: "2024".to_string(),
        question_parts: vec![CronFieldPosition::Day],
    };
    let result: Result<String, CronError> = standard_to_aws_cron("0 10 * * *", &details);
    assert_eq!(result.unwrap(), "0 10 ? * * 2024");
}

#[test]
fn fn_validate_aws_cron() {
    let result: Result<(), CronError> = validate_aws_cron("0 10 ? * * 2024");
    assert!(result.is_ok());
}

#[test]
fn fn_aws_local_cron_to_aws_utc_crons() {
    let result: Result<Vec<String>, CronError> =
        aws_local_cron_to_aws_utc_crons("0 10 ? * * 2024", "UTC");
    assert_eq!(result.unwrap(), vec!["0 10 ? * * 2024"]);
}

#[test]
fn timezone_expander_builder() {
    let expander: TimezoneExpander = TimezoneExpander::new().with_year(2024);
    let result: Result<Vec<String>, CronError> = expander.expand("0 10 ? * * *", "Asia/Tokyo");
    assert_eq!(result.unwrap(), vec!["0 1 ? * * *"]);

    let custom: TimezoneExpander<TzdbExpander> = TimezoneExpander::with_expander(TzdbExpander);
    assert!(custom.expand("0 10 ? * * 2024", "UTC").is_ok());
}

#[test]
fn utc_expander_trait() {
    let result: Result<Vec<String>, LocalCronError> =
        TzdbExpander.to_utc_crons("0 10 * * *", "UTC", Some(2024));
    assert_eq!(result.unwrap(), vec!["0 10 * * *"]);
}

#[test]
fn local_cron_getters() {
    let local = LocalCron::new("0 10 * * *", "Europe/Berlin")
        .unwrap()
        .with_year(2030);
    let year: i16 = local.year();
    let timezone: &str = local.timezone();
    assert_eq!(year, 2030);
    assert_eq!(timezone, "Europe/Berlin");
    assert_eq!(local.spec().to_string(), "0 10 * * *");
}

#[test]
fn field_positions() {
    let names: Vec<&str> = CronFieldPosition::ALL.iter().map(|p| p.as_str()).collect();
    assert_eq!(names, ["minute", "hour", "day", "month", "weekday", "year"]);
    assert_eq!("Weekday".parse::<CronFieldPosition>(), Ok(CronFieldPosition::Weekday));
}

#[test]
fn error_kinds() {
    let kinds = [
        (aws_to_standard_cron("0 10 * *").unwrap_err(), ErrorKind::InvalidFormat),
        (
            aws_local_cron_to_aws_utc_crons("0 10 ? * * *", "Nowhere/Zone").unwrap_err(),
            ErrorKind::InvalidTimezone,
        ),
        (
            aws_local_cron_to_aws_utc_crons("0 10 L * ? *", "UTC").unwrap_err(),
            ErrorKind::Expansion,
        ),
        (CronError::invalid_input("not a string"), ErrorKind::InvalidInput),
    ];
    for (err, kind) in kinds {
        assert_eq!(err.kind(), kind);
        assert!(!err.display_rich().is_empty());
    }
}

#[cfg(feature = "serde")]
#[test]
fn filter_module() {
    let names: Vec<&str> = awscron::filter::FilterModule::filters()
        .keys()
        .copied()
        .collect();
    assert!(names.contains(&"aws_to_standard_cron"));
    assert!(names.contains(&"standard_to_aws_cron"));
    assert!(names.contains(&"aws_local_aws_utc_crons"));
}
