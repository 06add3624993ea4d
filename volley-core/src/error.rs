use std::time::Duration;
use thiserror::Error;

/// Everything that can be wrong with a run before the first request is sent.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("`{0}` must be greater than zero")]
    NotPositive(&'static str),

    #[error(
        "requests per second must be finite and allow one request at least every {max}, got {0}",
        max = humantime::format_duration(crate::MAX_INTER_ARRIVAL)
    )]
    InvalidRate(f64),

    #[error(
        "spacing of {} between requests exceeds the supported maximum of {max}",
        humantime::format_duration(*.0),
        max = humantime::format_duration(crate::MAX_INTER_ARRIVAL)
    )]
    SpacingTooLarge(Duration),

    #[error("concurrency of {0} exceeds the supported maximum of {max}", max = crate::MAX_CONCURRENCY)]
    ConcurrencyTooLarge(usize),

    #[error("invalid target URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("request body is not valid JSON: {0}")]
    InvalidBody(#[from] serde_json::Error),

    #[error("invalid header `{name}`: {reason}")]
    InvalidHeader { name: String, reason: String },

    #[error("unsupported HTTP method `{0}`")]
    InvalidMethod(String),
}
