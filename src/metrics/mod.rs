//! Latency statistics over the recorded bench results.
mod histogram;


use std::time::Duration;

pub use histogram::LatencyHistogram;

use crate::engine::BenchResult;
use crate::error::MetricsError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LatencySummary {
    pub count: u64,
    pub avg: Duration,
    pub p50: Duration,
    pub p90: Duration,
    pub p99: Duration,
    pub max: Duration,
}

/// Summarizes the latency of every result, transport failures included.
///
/// # Errors
///
/// Returns an error if histogram operations fail.
pub fn summarize_latencies<'result, I>(results: I) -> Result<LatencySummary, MetricsError>
where
    I: IntoIterator<Item = &'result BenchResult>,
{
    let mut hist = LatencyHistogram::new()?;
    let mut total_micros: u128 = 0;
    for result in results {
        hist.record(result.duration)?;
        total_micros = total_micros.saturating_add(result.duration.as_micros());
    }

    let count = hist.count();
    if count == 0 {
        return Ok(LatencySummary::default());
    }
    let avg_micros = total_micros
        .checked_div(u128::from(count))
        .and_then(|avg| u64::try_from(avg).ok())
        .unwrap_or(u64::MAX);
    let (p50, p90, p99) = hist.percentiles();

    Ok(LatencySummary {
        count,
        avg: Duration::from_micros(avg_micros),
        p50,
        p90,
        p99,
        max: hist.max(),
    })
}
