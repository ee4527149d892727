use std::collections::BTreeSet;

use awscron::expr::CronSpec;
use awscron::{aws_to_standard_cron, standard_to_aws_cron, CronFieldPosition, LocalCron};
use jiff::civil::{date, Date};
use jiff::tz::TimeZone;
use jiff::Timestamp;
use proptest::prelude::*;

const YEAR: i16 = 2024;

/// Generate a single AWS field token, biased towards wildcards.
fn arb_token() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        3 => Just("?"),
        3 => Just("*"),
        1 => Just("0"),
        1 => Just("10"),
        1 => Just("1-5"),
        1 => Just("*/15"),
        1 => Just("MON-FRI"),
        1 => Just("L"),
        1 => Just("6#3"),
    ]
}

fn arb_year() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("*"),
        Just("2024"),
        Just("2019-2022"),
        Just("?"),
    ]
}

fn arb_separator() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just(" "), Just("  "), Just("\t")]
}

/// Generate an AWS crontab, with irregular whitespace.
fn arb_aws_cron() -> impl Strategy<Value = String> {
    (
        prop::collection::vec(arb_token(), 5),
        arb_year(),
        arb_separator(),
    )
        .prop_map(|(fields, year, sep)| format!("{}{sep}{year}", fields.join(sep)))
}

/// Generate a small local crontab whose firings are cheap to enumerate.
fn arb_local_cron() -> impl Strategy<Value = String> {
    (
        prop_oneof![Just("0"), Just("30"), Just("45"), Just("0,30")],
        prop_oneof![
            Just("0"),
            Just("1"),
            Just("2"),
            Just("3"),
            Just("10"),
            Just("23"),
            Just("1-3"),
            Just("22-23"),
        ],
        prop_oneof![
            3 => Just("*"),
            1 => Just("1"),
            1 => Just("15"),
            1 => Just("1-10"),
            1 => Just("31"),
            1 => Just("*/5"),
        ],
        prop_oneof![3 => Just("*"), 1 => Just("3"), 1 => Just("10-11"), 1 => Just("1-6")],
        prop_oneof![
            3 => Just("*"),
            1 => Just("MON-FRI"),
            1 => Just("SUN"),
            1 => Just("0,6"),
        ],
    )
        .prop_map(|(m, h, dom, mon, dow)| format!("{m} {h} {dom} {mon} {dow}"))
}

fn arb_timezone() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("UTC"),
        Just("America/New_York"),
        Just("Europe/Berlin"),
        Just("Australia/Sydney"),
        Just("Australia/Lord_Howe"),
        Just("Asia/Kolkata"),
        Just("Pacific/Auckland"),
        Just("Asia/Tokyo"),
        Just("Pacific/Kiritimati"),
        Just("Pacific/Pago_Pago"),
    ]
}

fn days(first: Date, last: Date) -> impl Iterator<Item = Date> {
    first
        .series(jiff::Span::new().days(1))
        .take_while(move |d| *d <= last)
}

/// Instants at which `spec` fires when read in `tz`, on local dates
/// `first..=last`.
fn firings(spec: &CronSpec, tz: &TimeZone, first: Date, last: Date) -> BTreeSet<Timestamp> {
    let mut out = BTreeSet::new();
    for day in days(first, last).filter(|d| spec.matches_date(*d)) {
        for (hour, minute) in spec.times() {
            let zoned = tz.to_zoned(day.at(hour as i8, minute as i8, 0, 0)).unwrap();
            out.insert(zoned.timestamp());
        }
    }
    out
}

/// Firings during the UTC calendar year.
fn in_year(firings: BTreeSet<Timestamp>) -> BTreeSet<Timestamp> {
    let lo = date(YEAR, 1, 1).to_zoned(TimeZone::UTC).unwrap().timestamp();
    let hi = date(YEAR + 1, 1, 1).to_zoned(TimeZone::UTC).unwrap().timestamp();
    firings.into_iter().filter(|t| *t >= lo && *t < hi).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Downgrade then upgrade restores the crontab, up to whitespace.
    #[test]
    fn roundtrip_identity(cron in arb_aws_cron()) {
        let converted = aws_to_standard_cron(&cron).unwrap();
        let restored =
            standard_to_aws_cron(&converted.crontab, &converted.aws_specific_details).unwrap();
        let normalized = cron.split_whitespace().collect::<Vec<_>>().join(" ");
        prop_assert_eq!(restored, normalized);
    }

    /// The standard crontab never contains `?`, and each recorded position
    /// held `?` in the input.
    #[test]
    fn question_parts_are_positional(cron in arb_aws_cron()) {
        let converted = aws_to_standard_cron(&cron).unwrap();
        prop_assert!(!converted.crontab.contains('?'));
        let fields: Vec<&str> = cron.split_whitespace().collect();
        let details = &converted.aws_specific_details;
        prop_assert!(!details.question_parts.contains(&CronFieldPosition::Year));
        for position in &details.question_parts {
            prop_assert_eq!(fields[position.index()], "?");
        }
        let count = fields[..5].iter().filter(|f| **f == "?").count();
        prop_assert_eq!(details.question_parts.len(), count);
    }

    /// Any other field count is rejected.
    #[test]
    fn wrong_field_count_rejected(fields in prop::collection::vec(arb_token(), 0..10)) {
        prop_assume!(fields.len() != 6);
        prop_assert!(aws_to_standard_cron(&fields.join(" ")).is_err());
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Over the whole UTC year, the UTC crontabs fire at exactly the instants
    /// the local crontab does, including local days of the neighbouring years.
    #[test]
    fn utc_crons_fire_like_local(cron in arb_local_cron(), timezone in arb_timezone()) {
        let local = LocalCron::new(&cron, timezone).unwrap().with_year(YEAR);
        let utc_crons = local.to_utc_crons().unwrap();

        let tz = TimeZone::get(timezone).unwrap();
        let expected = in_year(firings(
            local.spec(),
            &tz,
            date(YEAR - 1, 12, 31),
            date(YEAR + 1, 1, 1),
        ));

        let mut actual = BTreeSet::new();
        for utc in &utc_crons {
            let spec = CronSpec::parse(utc)
                .unwrap_or_else(|e| panic!("unparseable output '{utc}' for '{cron}': {e}"));
            actual.extend(firings(
                &spec,
                &TimeZone::UTC,
                date(YEAR, 1, 1),
                date(YEAR, 12, 31),
            ));
        }

        prop_assert_eq!(
            &actual,
            &expected,
            "'{}' in {} expanded to {:?}",
            cron,
            timezone,
            utc_crons
        );
    }
}
