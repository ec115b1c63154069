use std::time::Duration;

use tracing::debug;

use super::histogram::cumulative_histogram;
use super::types::{LatencyStats, RunResult, StatusCounts, WorkerReport};

#[derive(Debug, Default)]
struct LatencyTotals {
    min_us: Option<u64>,
    max_us: Option<u64>,
    sum_us: u128,
    count: u64,
    samples: Vec<u64>,
}

/// Folds every worker's report into the final run result.
///
/// Latency statistics are only produced when `with_latency` is set, which
/// the caller reserves for fixed-count runs.
#[must_use]
pub fn aggregate_reports(
    reports: Vec<WorkerReport>,
    time_taken: Duration,
    with_latency: bool,
) -> RunResult {
    let mut counts = StatusCounts::default();
    let mut dropped_samples: u64 = 0;
    let mut totals = LatencyTotals::default();

    for report in reports {
        counts.merge(&report.counts);
        dropped_samples = dropped_samples.saturating_add(report.dropped_samples);
        if !with_latency {
            continue;
        }
        let latency = report.latency;
        totals.min_us = min_option(totals.min_us, latency.min_us());
        totals.max_us = max_option(totals.max_us, latency.max_us());
        totals.sum_us = totals.sum_us.saturating_add(u128::from(latency.sum_us()));
        totals.count = totals.count.saturating_add(latency.count());
        totals.samples.extend(latency.into_samples());
    }

    if dropped_samples > 0 {
        debug!(dropped_samples, "Latency buffers overflowed; samples were discarded");
    }

    let total_requests = counts.total();
    RunResult {
        counts,
        total_requests,
        time_taken,
        requests_per_second: requests_per_second(total_requests, time_taken),
        latency: if with_latency {
            build_latency_stats(totals)
        } else {
            None
        },
        dropped_samples,
    }
}

/// `round(total / seconds)` with halves rounded up, in integer arithmetic.
pub(super) fn requests_per_second(total_requests: u64, elapsed: Duration) -> u64 {
    let micros = elapsed.as_micros().max(1);
    let scaled = u128::from(total_requests)
        .saturating_mul(2_000_000)
        .saturating_add(micros)
        .checked_div(micros.saturating_mul(2))
        .unwrap_or(0);
    u64::try_from(scaled).unwrap_or(u64::MAX)
}

fn build_latency_stats(mut totals: LatencyTotals) -> Option<LatencyStats> {
    let (Some(min_us), Some(max_us)) = (totals.min_us, totals.max_us) else {
        return None;
    };
    let average_ns = totals
        .sum_us
        .saturating_mul(1_000)
        .checked_div(u128::from(totals.count))?;

    totals.samples.sort_unstable();
    let histogram = cumulative_histogram(&totals.samples, min_us, max_us);

    Some(LatencyStats {
        min: Duration::from_micros(min_us),
        max: Duration::from_micros(max_us),
        average: Duration::from_nanos(u64::try_from(average_ns).unwrap_or(u64::MAX)),
        sample_count: totals.count,
        histogram,
    })
}

fn min_option(current: Option<u64>, candidate: Option<u64>) -> Option<u64> {
    match (current, candidate) {
        (Some(left), Some(right)) => Some(left.min(right)),
        (left, right) => left.or(right),
    }
}

fn max_option(current: Option<u64>, candidate: Option<u64>) -> Option<u64> {
    match (current, candidate) {
        (Some(left), Some(right)) => Some(left.max(right)),
        (left, right) => left.or(right),
    }
}
