use serde::Serialize;
use std::time::Duration;

/// Terminal result of one work item.
///
/// `status` is `None` when the exchange could not be completed at all. Any HTTP response,
/// including 4xx and 5xx, counts as a completed exchange.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RequestOutcome {
    pub status: Option<u16>,
    #[serde(serialize_with = "crate::stats::duration_ms")]
    pub duration: Duration,
    pub error: Option<String>,
}

impl RequestOutcome {
    pub fn success(status: u16, duration: Duration) -> Self {
        Self {
            status: Some(status),
            duration,
            error: None,
        }
    }

    pub fn failure(duration: Duration, error: impl Into<String>) -> Self {
        Self {
            status: None,
            duration,
            error: Some(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_some()
    }

    pub fn duration_ms(&self) -> f64 {
        self.duration.as_nanos() as f64 / 1e6
    }
}
