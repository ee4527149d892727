//! Conversion between AWS 6-field crontabs and standard 5-field crontabs.
//!
//! AWS crontabs carry a trailing year field and accept `?` as a wildcard in
//! some positions. Downgrading drops both, returning the information needed
//! to restore them as [`AwsSpecificDetails`].

use crate::error::CronError;
use crate::field::CronFieldPosition;

/// Number of fields in an AWS crontab.
pub const AWS_FIELDS: usize = 6;

/// Number of fields in a standard crontab.
pub const STANDARD_FIELDS: usize = 5;

/// Data removed from an AWS crontab when converting it to standard cron.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AwsSpecificDetails {
    /// Year field, verbatim.
    #[cfg_attr(feature = "serde", serde(deserialize_with = "year_from_str_or_int"))]
    pub year: String,
    /// Fields that held `?`, in field order. Never contains `year`.
    pub question_parts: Vec<CronFieldPosition>,
}

/// Hosts sometimes hand the year back as a number.
#[cfg(feature = "serde")]
fn year_from_str_or_int<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::Deserialize;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Year {
        Text(String),
        Number(i64),
    }

    Ok(match Year::deserialize(deserializer)? {
        Year::Text(year) => year,
        Year::Number(year) => year.to_string(),
    })
}

/// A standard crontab together with the details needed to restore the AWS one.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConvertedCron {
    pub crontab: String,
    pub aws_specific_details: AwsSpecificDetails,
}

/// Convert an AWS crontab to a standard crontab.
///
/// The year field is removed and every `?` becomes `*`; both are recorded in
/// the returned [`AwsSpecificDetails`].
pub fn aws_to_standard_cron(aws_cron: &str) -> Result<ConvertedCron, CronError> {
    let mut parts: Vec<&str> = aws_cron.split_whitespace().collect();
    if parts.len() != AWS_FIELDS {
        return Err(CronError::field_count(
            AWS_FIELDS,
            parts.len(),
            "AWS format",
            aws_cron,
        ));
    }

    let year = parts.pop().unwrap_or_default().to_string();

    let mut question_parts = Vec::new();
    for (index, part) in parts.iter_mut().enumerate() {
        if *part == "?" {
            question_parts.push(CronFieldPosition::ALL[index]);
            *part = "*";
        }
    }

    Ok(ConvertedCron {
        crontab: parts.join(" "),
        aws_specific_details: AwsSpecificDetails {
            year,
            question_parts,
        },
    })
}

/// Convert a standard crontab back to an AWS crontab.
///
/// Each `*` whose field is listed in `details.question_parts` becomes `?`,
/// then the year is appended.
pub fn standard_to_aws_cron(
    cron: &str,
    details: &AwsSpecificDetails,
) -> Result<String, CronError> {
    let mut parts: Vec<&str> = cron.split_whitespace().collect();
    if parts.len() != STANDARD_FIELDS {
        return Err(CronError::field_count(
            STANDARD_FIELDS,
            parts.len(),
            "standard format",
            cron,
        ));
    }

    for (index, part) in parts.iter_mut().enumerate() {
        if *part == "*" && details.question_parts.contains(&CronFieldPosition::ALL[index]) {
            *part = "?";
        }
    }

    parts.push(&details.year);
    Ok(parts.join(" "))
}

/// Check that `aws_cron` has the AWS field count without converting it.
pub fn validate_aws_cron(aws_cron: &str) -> Result<(), CronError> {
    aws_to_standard_cron(aws_cron).map(|_| ())
}
