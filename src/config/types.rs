use std::time::Duration;

use serde::Deserialize;

use crate::args::parsers::parse_duration_value;
use crate::error::ValidationError;

/// On-disk configuration. Every field is optional; CLI flags win over it.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(alias = "hlcupdocs")]
    pub corpus: Option<String>,
    pub addr: Option<String>,
    pub phase: Option<u8>,
    pub time: Option<DurationValue>,
    pub concurrent: Option<usize>,
    pub tank: Option<u64>,
    pub timeout: Option<DurationValue>,
    pub filter_req: Option<String>,
    pub filter_uri: Option<String>,
    pub test: Option<bool>,
    pub hide_failed: Option<bool>,
    pub allow_nulls: Option<bool>,
    pub utf8: Option<bool>,
    pub diff: Option<bool>,
    pub no_color: Option<bool>,
}

/// Durations accept either whole seconds or the CLI `<number><unit>` text form.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    Seconds(u64),
    Text(String),
}

impl DurationValue {
    pub(crate) fn to_duration(&self) -> Result<Duration, ValidationError> {
        match self {
            DurationValue::Seconds(0) => Err(ValidationError::DurationZero),
            DurationValue::Seconds(secs) => Ok(Duration::from_secs(*secs)),
            DurationValue::Text(text) => parse_duration_value(text),
        }
    }
}
