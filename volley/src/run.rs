use crate::{Dispatcher, Error, HttpClient, RateGate, RequestTask, ResultsAggregator};
use std::sync::Arc;
use tokio::time::Instant;
#[allow(unused)]
use tracing::{debug, error, info, instrument, trace, warn};
use volley_core::{RunConfig, Summary};

/// Send `config.total_requests` copies of the configured request through `client`, honoring the
/// configured concurrency and rate, and summarize the outcomes.
///
/// Individual request failures never abort the batch; they are counted in the summary. The only
/// error is an invalid gate configuration, reported before any request is sent.
///
/// # Example
/// ```no_run
/// use volley::prelude::*;
///
/// #[tokio::main]
/// async fn main() -> Result<(), volley::Error> {
///     let config = RunConfig::new(100, 10, 20., "http://127.0.0.1:3002/echo", r#"{"ping": 1}"#)?
///         .with_header("X-Client-Id", "load-test");
///     let client = ReqwestClient::new(&config)?;
///
///     let summary = run_batch(&config, client).await?;
///     println!("{summary}");
///     Ok(())
/// }
/// ```
#[instrument(name = "run", skip_all, fields(total = config.total_requests.get()))]
pub async fn run_batch<C>(config: &RunConfig, client: C) -> Result<Summary, Error>
where
    C: HttpClient + Sync + 'static,
{
    info!(
        url = %config.request.url,
        max_concurrent = config.max_concurrent.get(),
        requests_per_second = config.requests_per_second,
        "Starting batch"
    );

    #[cfg(feature = "metrics")]
    crate::task::describe_metrics();

    let total = config.total_requests.get();
    let gate = RateGate::from_rate(config.max_concurrent.get(), config.requests_per_second)?;
    let dispatcher = Dispatcher::new(gate, ResultsAggregator::with_capacity(total));

    let client = Arc::new(client);
    let request = Arc::new(config.request.clone());

    let start = Instant::now();
    dispatcher
        .run_all(total, |idx| {
            let client = client.clone();
            let request = request.clone();
            async move { RequestTask::new(idx).run(&*client, &request).await }
        })
        .await;
    let elapsed = start.elapsed();

    let summary = dispatcher.aggregator().summarize(elapsed, config.unit);
    info!(
        success = summary.success_count,
        failure = summary.failure_count,
        "Batch complete"
    );
    Ok(summary)
}
