use crate::RequestOutcome;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// Unit the reported throughput is expressed in.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ThroughputUnit {
    #[default]
    PerSecond,
    PerMinute,
}

impl ThroughputUnit {
    fn scale(&self) -> f64 {
        match self {
            ThroughputUnit::PerSecond => 1.,
            ThroughputUnit::PerMinute => 60.,
        }
    }
}

impl fmt::Display for ThroughputUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThroughputUnit::PerSecond => f.write_str("requests/s"),
            ThroughputUnit::PerMinute => f.write_str("requests/min"),
        }
    }
}

/// Statistics for a completed batch.
///
/// With no outcomes at all the counts are zero and `average_duration_ms` and `throughput` are
/// NaN. Both successes and failures contribute to the average duration; only successes
/// contribute to throughput.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub success_count: usize,
    pub failure_count: usize,
    pub average_duration_ms: f64,
    pub throughput: f64,
    pub unit: ThroughputUnit,
    #[serde(rename = "elapsed_ms", serialize_with = "duration_ms")]
    pub elapsed: Duration,
    #[serde(rename = "latency_p50_ms", serialize_with = "opt_duration_ms")]
    pub latency_p50: Option<Duration>,
    #[serde(rename = "latency_p90_ms", serialize_with = "opt_duration_ms")]
    pub latency_p90: Option<Duration>,
    #[serde(rename = "latency_p99_ms", serialize_with = "opt_duration_ms")]
    pub latency_p99: Option<Duration>,
    pub status_counts: BTreeMap<u16, usize>,
}

impl Summary {
    pub fn from_outcomes(outcomes: &[RequestOutcome], elapsed: Duration, unit: ThroughputUnit) -> Self {
        let total = outcomes.len();
        let success_count = outcomes.iter().filter(|o| o.is_success()).count();

        let mut status_counts = BTreeMap::new();
        for status in outcomes.iter().filter_map(|o| o.status) {
            *status_counts.entry(status).or_insert(0) += 1;
        }

        let mut durations: Vec<Duration> = outcomes.iter().map(|o| o.duration).collect();
        durations.sort_unstable();

        let (average_duration_ms, throughput) = if total == 0 {
            (f64::NAN, f64::NAN)
        } else {
            let sum_ms: f64 = outcomes.iter().map(RequestOutcome::duration_ms).sum();
            (sum_ms / total as f64, throughput(success_count, elapsed) * unit.scale())
        };

        Self {
            total,
            success_count,
            failure_count: total - success_count,
            average_duration_ms,
            throughput,
            unit,
            elapsed,
            latency_p50: quantile(&durations, 0.5),
            latency_p90: quantile(&durations, 0.9),
            latency_p99: quantile(&durations, 0.99),
            status_counts,
        }
    }

    /// Throughput normalized to requests per second, whatever `unit` is.
    pub fn throughput_per_second(&self) -> f64 {
        self.throughput / self.unit.scale()
    }
}

fn throughput(success_count: usize, elapsed: Duration) -> f64 {
    // A batch where nothing succeeded has zero throughput even if the clock did not move.
    if success_count == 0 {
        0.
    } else {
        success_count as f64 / elapsed.as_secs_f64()
    }
}

/// Nearest-rank quantile over already sorted values.
fn quantile(sorted: &[Duration], q: f64) -> Option<Duration> {
    if sorted.is_empty() {
        return None;
    }
    let rank = (q * sorted.len() as f64).ceil() as usize;
    Some(sorted[rank.clamp(1, sorted.len()) - 1])
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total requests: {}", self.total)?;
        writeln!(f, "Successful requests: {}", self.success_count)?;
        writeln!(f, "Failed requests: {}", self.failure_count)?;
        writeln!(f, "Average request duration: {:.2} ms", self.average_duration_ms)?;
        writeln!(f, "Throughput: {:.2} {}", self.throughput, self.unit)?;
        writeln!(f, "Elapsed: {}", format_millis(self.elapsed))?;
        if let (Some(p50), Some(p90), Some(p99)) = (self.latency_p50, self.latency_p90, self.latency_p99) {
            writeln!(
                f,
                "Latency: p50={}, p90={}, p99={}",
                format_millis(p50),
                format_millis(p90),
                format_millis(p99)
            )?;
        }
        for (status, count) in &self.status_counts {
            writeln!(f, "  HTTP {status}: {count}")?;
        }
        Ok(())
    }
}

fn format_millis(dur: Duration) -> humantime::FormattedDuration {
    humantime::format_duration(Duration::from_millis(dur.as_millis() as u64))
}

pub(crate) fn duration_ms<S: Serializer>(dur: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(dur.as_nanos() as f64 / 1e6)
}

fn opt_duration_ms<S: Serializer>(dur: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error> {
    match dur {
        Some(dur) => duration_ms(dur, serializer),
        None => serializer.serialize_none(),
    }
}
