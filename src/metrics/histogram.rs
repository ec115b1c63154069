use serde::Serialize;

pub const HISTOGRAM_BUCKETS: usize = 10;

/// One row of the cumulative latency distribution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HistogramBucket {
    pub upper_bound_us: u64,
    /// Samples at or below `upper_bound_us`.
    pub cumulative_count: u64,
    pub percent: u64,
}

/// Builds ten cumulative buckets spanning `[min_us, max_us]`.
///
/// `sorted` must be in ascending order. The last bucket's bound is pinned to
/// `max_us` so it always holds every sample.
#[must_use]
pub fn cumulative_histogram(
    sorted: &[u64],
    min_us: u64,
    max_us: u64,
) -> [HistogramBucket; HISTOGRAM_BUCKETS] {
    let total = u64::try_from(sorted.len()).unwrap_or(u64::MAX);
    let bucket_count = u64::try_from(HISTOGRAM_BUCKETS).unwrap_or(u64::MAX);
    let width = max_us.saturating_sub(min_us).div_ceil(bucket_count).max(1);

    let mut buckets = [HistogramBucket::default(); HISTOGRAM_BUCKETS];
    let mut step: u64 = 0;
    let last = HISTOGRAM_BUCKETS.saturating_sub(1);
    for (index, bucket) in buckets.iter_mut().enumerate() {
        step = step.saturating_add(1);
        let upper_bound_us = if index == last {
            max_us
        } else {
            min_us.saturating_add(width.saturating_mul(step))
        };
        let count = sorted.partition_point(|sample| *sample <= upper_bound_us);
        let cumulative_count = u64::try_from(count).unwrap_or(u64::MAX);
        *bucket = HistogramBucket {
            upper_bound_us,
            cumulative_count,
            percent: rounded_percent(cumulative_count, total),
        };
    }
    buckets
}

fn rounded_percent(count: u64, total: u64) -> u64 {
    let numerator = u128::from(count)
        .saturating_mul(200)
        .saturating_add(u128::from(total));
    let scaled = numerator
        .checked_div(u128::from(total).saturating_mul(2))
        .unwrap_or(0);
    u64::try_from(scaled).unwrap_or(u64::MAX)
}
