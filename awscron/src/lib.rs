//! awscron: AWS crontab conversion and DST-aware UTC expansion.
//!
//! AWS CloudWatch/EventBridge crontabs have six fields (the last one is the
//! year) and use `?` as a wildcard in some positions. This crate converts them
//! to and from standard 5-field crontabs and expands a crontab written in a
//! local timezone into the UTC crontabs needed to follow Daylight Saving Time.
//!
//! # Examples
//!
//! ```
//! use awscron::{aws_to_standard_cron, standard_to_aws_cron};
//!
//! let converted = aws_to_standard_cron("0 10 ? * MON-FRI 2024").unwrap();
//! assert_eq!(converted.crontab, "0 10 * * MON-FRI");
//!
//! let aws = standard_to_aws_cron("0 15 * * MON-FRI", &converted.aws_specific_details).unwrap();
//! assert_eq!(aws, "0 15 ? * MON-FRI 2024");
//! ```
//!
//! ```
//! use awscron::aws_local_cron_to_aws_utc_crons;
//!
//! let utc = aws_local_cron_to_aws_utc_crons("0 10 ? * * 2024", "America/New_York").unwrap();
//! assert!(utc.contains(&"0 14 ? 4-10 * 2024".to_string()));
//! ```

pub mod aws;
pub mod error;
pub mod expr;
pub mod field;
#[cfg(feature = "serde")]
pub mod filter;
pub mod local;

pub use aws::{
    aws_to_standard_cron, standard_to_aws_cron, validate_aws_cron, AwsSpecificDetails,
    ConvertedCron,
};
pub use error::{CronError, ErrorKind, LocalCronError};
pub use field::CronFieldPosition;
pub use local::{LocalCron, TzdbExpander, UtcExpander};

/// Convert an AWS crontab in `timezone` local time into UTC AWS crontabs.
///
/// One crontab is returned per UTC offset (and partial month around each DST
/// transition) needed to cover the year. The `?` positions and the year of
/// the input are carried over to every result.
pub fn aws_local_cron_to_aws_utc_crons(
    local_crontab: &str,
    timezone: &str,
) -> Result<Vec<String>, CronError> {
    TimezoneExpander::new().expand(local_crontab, timezone)
}

/// Orchestrates downgrade, local-to-UTC expansion and upgrade.
#[derive(Debug, Clone, Default)]
pub struct TimezoneExpander<E = TzdbExpander> {
    expander: E,
    year: Option<i16>,
}

impl TimezoneExpander<TzdbExpander> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<E: UtcExpander> TimezoneExpander<E> {
    /// Use a custom local-to-UTC expansion engine.
    pub fn with_expander(expander: E) -> Self {
        Self {
            expander,
            year: None,
        }
    }

    /// Evaluate DST transitions of `year`, whatever the crontab's year field says.
    pub fn with_year(mut self, year: i16) -> Self {
        self.year = Some(year);
        self
    }

    pub fn expand(&self, local_crontab: &str, timezone: &str) -> Result<Vec<String>, CronError> {
        let converted = aws_to_standard_cron(local_crontab)?;
        let details = &converted.aws_specific_details;
        let year = self.year.or_else(|| reference_year(&details.year));

        tracing::debug!(
            crontab = %converted.crontab,
            timezone,
            year = ?year,
            "expanding local AWS crontab"
        );
        let utc_crons = self
            .expander
            .to_utc_crons(&converted.crontab, timezone, year)?;

        utc_crons
            .iter()
            .map(|cron| standard_to_aws_cron(cron, details))
            .collect()
    }
}

/// A year field naming exactly one year selects that year's DST rules.
fn reference_year(year: &str) -> Option<i16> {
    if year.len() == 4 && year.bytes().all(|b| b.is_ascii_digit()) {
        year.parse().ok()
    } else {
        None
    }
}
