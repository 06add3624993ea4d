use crate::{
    ConfigError, ThroughputUnit, DEFAULT_REQUEST_TIMEOUT, MAX_CONCURRENCY, MAX_INTER_ARRIVAL,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

/// Validated parameters for a single batch.
///
/// Construct with [`RunConfig::new`], which performs every check that would otherwise surface
/// mid-run, then adjust the optional pieces with the `with_*` methods.
#[derive(Clone, Debug)]
pub struct RunConfig {
    pub total_requests: NonZeroUsize,
    pub max_concurrent: NonZeroUsize,
    pub requests_per_second: f64,
    pub request: RequestTemplate,
    pub timeout: Duration,
    pub unit: ThroughputUnit,
}

impl RunConfig {
    pub fn new(
        total_requests: usize,
        max_concurrent: usize,
        requests_per_second: f64,
        target_url: &str,
        request_body: &str,
    ) -> Result<Self, ConfigError> {
        let total_requests =
            NonZeroUsize::new(total_requests).ok_or(ConfigError::NotPositive("total_requests"))?;
        let max_concurrent = validate_concurrency(max_concurrent)?;
        validate_rate(requests_per_second)?;

        Ok(Self {
            total_requests,
            max_concurrent,
            requests_per_second,
            request: RequestTemplate::new(target_url, request_body)?,
            timeout: DEFAULT_REQUEST_TIMEOUT,
            unit: ThroughputUnit::default(),
        })
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.request.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.request.method = method;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, ConfigError> {
        if timeout.is_zero() {
            return Err(ConfigError::NotPositive("timeout"));
        }
        self.timeout = timeout;
        Ok(self)
    }

    pub fn with_unit(mut self, unit: ThroughputUnit) -> Self {
        self.unit = unit;
        self
    }

    /// Minimum spacing between two request starts.
    pub fn min_inter_arrival(&self) -> Duration {
        min_inter_arrival(self.requests_per_second)
    }
}

pub fn validate_concurrency(max_concurrent: usize) -> Result<NonZeroUsize, ConfigError> {
    let max_concurrent =
        NonZeroUsize::new(max_concurrent).ok_or(ConfigError::NotPositive("max_concurrent"))?;
    if max_concurrent.get() > MAX_CONCURRENCY {
        return Err(ConfigError::ConcurrencyTooLarge(max_concurrent.get()));
    }
    Ok(max_concurrent)
}

pub fn validate_rate(requests_per_second: f64) -> Result<(), ConfigError> {
    let invalid = || ConfigError::InvalidRate(requests_per_second);
    if !requests_per_second.is_finite() || requests_per_second <= 0. {
        return Err(invalid());
    }
    let spacing = Duration::try_from_secs_f64(1. / requests_per_second).map_err(|_| invalid())?;
    validate_inter_arrival(spacing).map_err(|_| invalid())?;
    Ok(())
}

pub fn validate_inter_arrival(min_inter_arrival: Duration) -> Result<Duration, ConfigError> {
    if min_inter_arrival > MAX_INTER_ARRIVAL {
        return Err(ConfigError::SpacingTooLarge(min_inter_arrival));
    }
    Ok(min_inter_arrival)
}

/// `1s / rps`, the spacing that keeps request starts at or below `rps`.
pub fn min_inter_arrival(requests_per_second: f64) -> Duration {
    Duration::from_secs_f64(1. / requests_per_second)
}

/// The request every work item sends. Identical for all items of a batch.
#[derive(Clone, Debug, PartialEq)]
pub struct RequestTemplate {
    pub method: Method,
    pub url: Url,
    pub body: serde_json::Value,
    /// Passed through verbatim, in order.
    pub headers: Vec<(String, String)>,
}

impl RequestTemplate {
    pub fn new(target_url: &str, request_body: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            method: Method::default(),
            url: Url::parse(target_url)?,
            body: serde_json::from_str(request_body)?,
            headers: vec![],
        })
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    #[default]
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "PATCH" => Ok(Method::Patch),
            "DELETE" => Ok(Method::Delete),
            _ => Err(ConfigError::InvalidMethod(s.to_string())),
        }
    }
}

/// Splits a `NAME:VALUE` header argument. Surrounding whitespace of the value is trimmed.
pub fn parse_header(raw: &str) -> Result<(String, String), ConfigError> {
    match raw.split_once(':') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(ConfigError::InvalidHeader {
            name: raw.to_string(),
            reason: "expected NAME:VALUE".to_string(),
        }),
    }
}
