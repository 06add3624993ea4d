use clap::Parser;
use std::net::SocketAddr;
use std::time::Duration;
use volley_core::{
    parse_header, ConfigError, Method, RunConfig, ThroughputUnit, CLIENT_ID_HEADER,
    CLIENT_SECRET_HEADER,
};

/// Send a fixed batch of identical HTTP requests under a concurrency ceiling and a rate limit,
/// then report success counts, latency and throughput.
///
/// Every option can also be supplied through the environment variable shown next to it.
#[derive(Parser, Debug, Clone)]
#[command(name = "volley", version)]
pub struct VolleyCli {
    /// Number of requests in the batch.
    #[arg(long, env = "TOTAL_REQUESTS")]
    pub total_requests: usize,

    /// Maximum number of requests in flight at once.
    #[arg(long, env = "CONCURRENT_REQUESTS")]
    pub concurrent_requests: usize,

    /// Maximum rate at which requests are started.
    #[arg(long, env = "REQUESTS_PER_SECOND")]
    pub requests_per_second: f64,

    /// Target URL.
    #[arg(long, env = "API_URL")]
    pub api_url: String,

    /// JSON request body.
    #[arg(long, env = "JSON_BODY")]
    pub json_body: String,

    /// Sent as the `X-Client-Id` header.
    #[arg(long, env = "X_CLIENT_ID")]
    pub client_id: Option<String>,

    /// Sent as the `X-Client-Secret` header.
    #[arg(long, env = "CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: Option<String>,

    /// Extra header as `NAME:VALUE`. May be repeated.
    #[arg(short = 'H', long = "header", value_parser = parse_header)]
    pub headers: Vec<(String, String)>,

    #[arg(long, env = "HTTP_METHOD", default_value = "POST")]
    pub method: Method,

    /// Per-request timeout, e.g. `500ms` or `30s`.
    #[arg(long, env = "REQUEST_TIMEOUT", default_value = "30s", value_parser = humantime::parse_duration)]
    pub timeout: Duration,

    /// Report throughput per minute instead of per second.
    #[arg(long, env = "THROUGHPUT_PER_MINUTE")]
    pub per_minute: bool,

    /// Print the summary as JSON.
    #[arg(long)]
    pub json: bool,

    /// Serve Prometheus metrics on this address while the batch runs.
    #[arg(long, env = "METRICS_ADDR")]
    pub metrics_addr: Option<SocketAddr>,
}

impl VolleyCli {
    pub fn run_config(&self) -> Result<RunConfig, ConfigError> {
        let unit = if self.per_minute {
            ThroughputUnit::PerMinute
        } else {
            ThroughputUnit::PerSecond
        };

        let mut config = RunConfig::new(
            self.total_requests,
            self.concurrent_requests,
            self.requests_per_second,
            &self.api_url,
            &self.json_body,
        )?
        .with_method(self.method)
        .with_unit(unit)
        .with_timeout(self.timeout)?;

        if let Some(secret) = &self.client_secret {
            config = config.with_header(CLIENT_SECRET_HEADER, secret);
        }
        if let Some(id) = &self.client_id {
            config = config.with_header(CLIENT_ID_HEADER, id);
        }
        for (name, value) in &self.headers {
            config = config.with_header(name, value);
        }

        Ok(config)
    }
}
