use std::time::Duration;

/// Per-request timeout used when none is configured.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Upper bound on concurrent holders of a gate. Matches the permit limit of tokio's semaphore.
pub const MAX_CONCURRENCY: usize = usize::MAX >> 3;

/// Longest accepted spacing between two request starts. Longer spacings would push grant
/// instants past what the timer can represent.
pub const MAX_INTER_ARRIVAL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

pub const CLIENT_ID_HEADER: &str = "X-Client-Id";
pub const CLIENT_SECRET_HEADER: &str = "X-Client-Secret";
