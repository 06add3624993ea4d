use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use volley_core::{RequestOutcome, Summary, ThroughputUnit};

/// Outcomes of a batch, in the order they completed.
#[derive(Debug, Default)]
pub struct ResultsAggregator {
    outcomes: Mutex<Vec<RequestOutcome>>,
}

impl ResultsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            outcomes: Mutex::new(Vec::with_capacity(capacity)),
        }
    }

    pub fn record(&self, outcome: RequestOutcome) {
        self.lock().push(outcome);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Only meaningful once every expected outcome has been recorded.
    pub fn summarize(&self, elapsed: Duration, unit: ThroughputUnit) -> Summary {
        Summary::from_outcomes(&self.lock(), elapsed, unit)
    }

    pub fn into_outcomes(self) -> Vec<RequestOutcome> {
        self.outcomes
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    // A push can't leave the list half-written, so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, Vec<RequestOutcome>> {
        self.outcomes.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
