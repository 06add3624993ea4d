//! Concurrency ceiling and start spacing combined in one gate.
//!
//! A [`RateGate`] hands out at most `max_concurrent` [`GatePermit`]s at a time, and never two
//! grants closer together than `min_inter_arrival`. Waiters are served strictly in arrival order.
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, OwnedSemaphorePermit, Semaphore};
use tokio::time::{sleep_until, Instant};
#[allow(unused)]
use tracing::{debug, error, info, trace, warn};
use volley_core::{
    min_inter_arrival, validate_concurrency, validate_inter_arrival, validate_rate, ConfigError,
};

#[derive(Debug)]
pub struct RateGate {
    permits: Arc<Semaphore>,
    max_concurrent: usize,
    min_inter_arrival: Duration,
    // Holding this lock is what makes a waiter the head of the queue.
    last_grant: Mutex<Option<Instant>>,
}

impl RateGate {
    pub fn new(max_concurrent: usize, min_inter_arrival: Duration) -> Result<Self, ConfigError> {
        let max_concurrent = validate_concurrency(max_concurrent)?.get();
        let min_inter_arrival = validate_inter_arrival(min_inter_arrival)?;
        Ok(Self {
            permits: Arc::new(Semaphore::new(max_concurrent)),
            max_concurrent,
            min_inter_arrival,
            last_grant: Mutex::new(None),
        })
    }

    /// Gate spacing grants `1s / requests_per_second` apart.
    pub fn from_rate(max_concurrent: usize, requests_per_second: f64) -> Result<Self, ConfigError> {
        validate_rate(requests_per_second)?;
        Self::new(max_concurrent, min_inter_arrival(requests_per_second))
    }

    /// Wait for a free slot and for the spacing since the previous grant to elapse.
    ///
    /// The slot is held until the returned permit is dropped or released.
    pub async fn acquire(&self) -> GatePermit {
        let mut last_grant = self.last_grant.lock().await;

        let permit = self
            .permits
            .clone()
            .acquire_owned()
            .await
            .expect("gate semaphore is never closed");

        if let Some(last) = *last_grant {
            sleep_until(last + self.min_inter_arrival).await;
        }

        let granted_at = Instant::now();
        *last_grant = Some(granted_at);
        trace!(in_flight = self.in_flight(), "Permit granted");

        GatePermit {
            _permit: permit,
            granted_at,
        }
    }

    /// Number of permits currently held.
    pub fn in_flight(&self) -> usize {
        self.max_concurrent - self.permits.available_permits()
    }

    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    pub fn min_inter_arrival(&self) -> Duration {
        self.min_inter_arrival
    }
}

/// A held slot of a [`RateGate`]. The slot is returned when this is dropped.
#[derive(Debug)]
pub struct GatePermit {
    _permit: OwnedSemaphorePermit,
    granted_at: Instant,
}

impl GatePermit {
    pub fn granted_at(&self) -> Instant {
        self.granted_at
    }

    pub fn release(self) {}
}
