use std::time::Duration;

use serde::Deserialize;

use crate::args::{HttpMethod, OutputFormat, parsers::parse_duration_arg};
use crate::error::{AppError, AppResult, ValidationError};

/// On-disk configuration. Every field mirrors a command-line flag.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub url: Option<String>,
    pub method: Option<HttpMethod>,
    pub body: Option<String>,
    pub body_file: Option<String>,
    pub requests_file: Option<String>,
    pub concurrency: Option<usize>,
    pub requests: Option<u64>,
    /// Run length in whole seconds.
    pub duration: Option<u64>,
    /// Delay before the run in whole seconds.
    pub wait: Option<u64>,
    pub insecure: Option<bool>,
    pub quiet: Option<bool>,
    pub timeout: Option<DurationValue>,
    pub output_format: Option<OutputFormat>,
}

/// Either a bare number of seconds or a string with a unit suffix.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    Seconds(u64),
    Text(String),
}

impl DurationValue {
    pub(crate) fn to_duration(&self) -> AppResult<Duration> {
        match self {
            DurationValue::Seconds(secs) => {
                if *secs == 0 {
                    Err(AppError::validation(ValidationError::DurationZero))
                } else {
                    Ok(Duration::from_secs(*secs))
                }
            }
            DurationValue::Text(text) => parse_duration_arg(text),
        }
    }
}
