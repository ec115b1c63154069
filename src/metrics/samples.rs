/// Per-worker sample capacity for timed runs, where the number of
/// iterations is not known up front.
pub const DEFAULT_SAMPLE_CAPACITY: usize = 100_000;

const INITIAL_ALLOCATION: usize = 4_096;

/// Fixed-capacity latency store owned by a single worker.
///
/// Pushing never blocks: once the buffer is full further samples are
/// counted as dropped and discarded.
#[derive(Debug)]
pub struct LatencyBuffer {
    samples: Vec<u64>,
    capacity: usize,
    dropped: u64,
}

impl LatencyBuffer {
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            samples: Vec::with_capacity(capacity.min(INITIAL_ALLOCATION)),
            capacity,
            dropped: 0,
        }
    }

    /// Stores a latency in microseconds; returns `false` if it was dropped.
    pub fn try_push(&mut self, latency_us: u64) -> bool {
        if self.samples.len() >= self.capacity {
            self.dropped = self.dropped.saturating_add(1);
            return false;
        }
        self.samples.push(latency_us);
        true
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    #[must_use]
    pub const fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Closes the buffer and summarizes it. The first recorded sample is
    /// discarded as warm-up.
    #[must_use]
    pub fn summarize(self) -> LatencySummary {
        LatencySummary::from_recorded(self.samples)
    }
}

/// Latency figures for one worker, warm-up sample excluded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LatencySummary {
    samples: Vec<u64>,
    min_us: Option<u64>,
    max_us: Option<u64>,
    sum_us: u64,
}

impl LatencySummary {
    #[must_use]
    pub fn from_recorded(mut samples: Vec<u64>) -> Self {
        if !samples.is_empty() {
            samples.remove(0);
        }
        let min_us = samples.iter().copied().min();
        let max_us = samples.iter().copied().max();
        let sum_us = samples
            .iter()
            .fold(0u64, |sum, sample| sum.saturating_add(*sample));
        Self {
            samples,
            min_us,
            max_us,
            sum_us,
        }
    }

    #[must_use]
    pub const fn min_us(&self) -> Option<u64> {
        self.min_us
    }

    #[must_use]
    pub const fn max_us(&self) -> Option<u64> {
        self.max_us
    }

    #[must_use]
    pub const fn sum_us(&self) -> u64 {
        self.sum_us
    }

    #[must_use]
    pub fn count(&self) -> u64 {
        u64::try_from(self.samples.len()).unwrap_or(u64::MAX)
    }

    #[must_use]
    pub fn into_samples(self) -> Vec<u64> {
        self.samples
    }
}
