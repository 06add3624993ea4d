use crate::{RateGate, ResultsAggregator};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
#[allow(unused)]
use tracing::{debug, error, info, instrument, trace, warn, Instrument};
use volley_core::RequestOutcome;

/// Runs a batch of independent work items through a [`RateGate`], recording every outcome in a
/// [`ResultsAggregator`].
#[derive(Debug)]
pub struct Dispatcher {
    gate: Arc<RateGate>,
    aggregator: Arc<ResultsAggregator>,
}

impl Dispatcher {
    pub fn new(gate: RateGate, aggregator: ResultsAggregator) -> Self {
        Self {
            gate: Arc::new(gate),
            aggregator: Arc::new(aggregator),
        }
    }

    /// Launch `n` work items and wait until all of them have recorded an outcome.
    ///
    /// `task_factory(i)` builds the future for item `i`. It is polled only once the item holds a
    /// gate permit, and the permit is given back as soon as the future resolves or panics. A
    /// panicking item is recorded as a failure.
    pub async fn run_all<T, F>(&self, n: usize, task_factory: T)
    where
        T: Fn(usize) -> F,
        F: Future<Output = RequestOutcome> + Send + 'static,
    {
        let mut set = JoinSet::new();
        for idx in 0..n {
            let gate = self.gate.clone();
            let aggregator = self.aggregator.clone();
            let work = task_factory(idx);
            set.spawn(
                async move {
                    let permit = gate.acquire().await;
                    let outcome = work.await;
                    permit.release();
                    aggregator.record(outcome);
                }
                .in_current_span(),
            );
        }

        while let Some(res) = set.join_next().await {
            if let Err(err) = res {
                error!("Work item did not complete: {err}");
                self.aggregator
                    .record(RequestOutcome::failure(Duration::ZERO, err.to_string()));
            }
        }

        debug!(recorded = self.aggregator.len(), "All work items joined");
    }

    pub fn gate(&self) -> &RateGate {
        &self.gate
    }

    pub fn aggregator(&self) -> &ResultsAggregator {
        &self.aggregator
    }
}
