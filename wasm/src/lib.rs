use awscron::{AwsSpecificDetails, CronError};
use wasm_bindgen::prelude::*;

fn js_error(e: CronError) -> JsError {
    JsError::new(&e.to_string())
}

fn string_arg(value: &JsValue, what: &str) -> Result<String, JsError> {
    value.as_string().ok_or_else(|| {
        js_error(CronError::invalid_input(format!(
            "invalid {what}: expected a string"
        )))
    })
}

/// Convert an AWS crontab to `{ crontab, aws_specific_details }`.
#[wasm_bindgen(js_name = "awsToStandardCron")]
pub fn aws_to_standard_cron(aws_cron: JsValue) -> Result<JsValue, JsError> {
    let aws_cron = string_arg(&aws_cron, "cron string")?;
    let converted = awscron::aws_to_standard_cron(&aws_cron).map_err(js_error)?;
    serde_wasm_bindgen::to_value(&converted).map_err(|e| JsError::new(&e.to_string()))
}

/// Convert a standard crontab back to AWS format using the details returned
/// by `awsToStandardCron`.
#[wasm_bindgen(js_name = "standardToAwsCron")]
pub fn standard_to_aws_cron(cron: JsValue, details: JsValue) -> Result<String, JsError> {
    let cron = string_arg(&cron, "cron string")?;
    let details: AwsSpecificDetails = serde_wasm_bindgen::from_value(details).map_err(|e| {
        js_error(CronError::invalid_input(format!(
            "invalid AWS specific details: {e}"
        )))
    })?;
    awscron::standard_to_aws_cron(&cron, &details).map_err(js_error)
}

/// Expand an AWS crontab written in `timezone` local time into UTC crontabs.
#[wasm_bindgen(js_name = "awsLocalCronToAwsUtcCrons")]
pub fn aws_local_cron_to_aws_utc_crons(
    local_cron: JsValue,
    timezone: JsValue,
) -> Result<Vec<String>, JsError> {
    let local_cron = string_arg(&local_cron, "cron string")?;
    let timezone = string_arg(&timezone, "timezone")?;
    awscron::aws_local_cron_to_aws_utc_crons(&local_cron, &timezone).map_err(js_error)
}

/// Check an AWS crontab's shape (returns true if valid).
#[wasm_bindgen(js_name = "validateAwsCron")]
pub fn validate_aws_cron(aws_cron: &str) -> bool {
    awscron::validate_aws_cron(aws_cron).is_ok()
}
