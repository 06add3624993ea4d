use crate::TransportError;
use tokio::time::Instant;
#[allow(unused)]
use tracing::{debug, error, info, instrument, trace, warn};
use volley_core::{RequestOutcome, RequestTemplate};
#[cfg(feature = "metrics")]
use volley_core::DEFAULT_LABELS;

/// A completed HTTP exchange, whatever its status.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Capability to perform one HTTP exchange.
///
/// Implementations return `Err` only when the exchange could not be completed (connect failure,
/// timeout, reset). An error status from the server is an `Ok` response.
#[trait_variant::make(HttpClient: Send)]
pub trait LocalHttpClient {
    async fn send(&self, request: &RequestTemplate) -> Result<HttpResponse, TransportError>;
}

/// One work item of a batch.
#[derive(Debug, Clone, Copy)]
pub struct RequestTask {
    index: usize,
}

impl RequestTask {
    pub fn new(index: usize) -> Self {
        Self { index }
    }

    #[instrument(name = "request", skip_all, fields(index = self.index))]
    pub async fn run<C: HttpClient>(&self, client: &C, request: &RequestTemplate) -> RequestOutcome {
        let start = Instant::now();
        let res = client.send(request).await;
        let elapsed = start.elapsed();

        #[cfg(feature = "metrics")]
        metrics::histogram!(DEFAULT_LABELS.latency).record(elapsed.as_secs_f64() * 1e3);

        match res {
            Ok(response) => {
                debug!(status = response.status, body = %response.body, "Request succeeded");

                #[cfg(feature = "metrics")]
                metrics::counter!(DEFAULT_LABELS.success, "status" => response.status.to_string())
                    .increment(1);

                RequestOutcome::success(response.status, elapsed)
            }
            Err(err) => {
                warn!("Request failed: {err}");

                #[cfg(feature = "metrics")]
                metrics::counter!(DEFAULT_LABELS.error).increment(1);

                RequestOutcome::failure(elapsed, err.to_string())
            }
        }
    }
}

/// Register units and descriptions of the per-request metrics with the installed recorder.
#[cfg(feature = "metrics")]
pub(crate) fn describe_metrics() {
    metrics::describe_histogram!(
        DEFAULT_LABELS.latency,
        metrics::Unit::Milliseconds,
        "Duration of each request"
    );
    metrics::describe_counter!(DEFAULT_LABELS.success, "Requests answered, by status");
    metrics::describe_counter!(DEFAULT_LABELS.error, "Requests that failed in transport");
}
