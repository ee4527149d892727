//! Named filters for hosts that call conversions dynamically with JSON values.
//!
//! Each filter takes its positional arguments as [`serde_json::Value`]s and
//! checks their types before doing any parsing.

use std::collections::BTreeMap;

use serde_json::{json, Value};

use crate::aws::{aws_to_standard_cron, standard_to_aws_cron, AwsSpecificDetails};
use crate::error::CronError;

/// A registered filter.
pub type Filter = fn(&[Value]) -> Result<Value, CronError>;

pub const AWS_TO_STANDARD_CRON: &str = "aws_to_standard_cron";
pub const STANDARD_TO_AWS_CRON: &str = "standard_to_aws_cron";
pub const AWS_LOCAL_TO_UTC_CRONS: &str = "aws_local_aws_utc_crons";

/// Registry of the crontab filters.
pub struct FilterModule;

impl FilterModule {
    pub fn filters() -> BTreeMap<&'static str, Filter> {
        let mut filters: BTreeMap<&'static str, Filter> = BTreeMap::new();
        filters.insert(AWS_TO_STANDARD_CRON, aws_to_standard_filter);
        filters.insert(STANDARD_TO_AWS_CRON, standard_to_aws_filter);
        filters.insert(AWS_LOCAL_TO_UTC_CRONS, local_to_utc_filter);
        filters
    }

    /// Run the filter registered as `name`.
    pub fn call(name: &str, args: &[Value]) -> Result<Value, CronError> {
        let filter = Self::filters()
            .get(name)
            .copied()
            .ok_or_else(|| CronError::invalid_input(format!("unknown filter: {name}")))?;
        filter(args)
    }
}

fn string_arg<'a>(args: &'a [Value], index: usize, what: &str) -> Result<&'a str, CronError> {
    args.get(index)
        .and_then(Value::as_str)
        .ok_or_else(|| CronError::invalid_input(format!("invalid {what}: expected a string")))
}

fn details_arg(args: &[Value], index: usize) -> Result<AwsSpecificDetails, CronError> {
    let value = args
        .get(index)
        .ok_or_else(|| CronError::invalid_input("missing AWS specific details"))?;
    serde_json::from_value(value.clone())
        .map_err(|e| CronError::invalid_input(format!("invalid AWS specific details: {e}")))
}

fn aws_to_standard_filter(args: &[Value]) -> Result<Value, CronError> {
    let cron = string_arg(args, 0, "cron string")?;
    let converted = aws_to_standard_cron(cron)?;
    serde_json::to_value(&converted)
        .map_err(|e| CronError::invalid_input(format!("cannot serialize converted crontab: {e}")))
}

fn standard_to_aws_filter(args: &[Value]) -> Result<Value, CronError> {
    let cron = string_arg(args, 0, "cron string")?;
    let details = details_arg(args, 1)?;
    Ok(Value::String(standard_to_aws_cron(cron, &details)?))
}

fn local_to_utc_filter(args: &[Value]) -> Result<Value, CronError> {
    let cron = string_arg(args, 0, "cron string")?;
    let timezone = string_arg(args, 1, "timezone")?;
    let crons = crate::aws_local_cron_to_aws_utc_crons(cron, timezone)?;
    Ok(json!(crons))
}
