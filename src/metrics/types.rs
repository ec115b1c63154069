use std::time::Duration;

use serde::Serialize;

use super::histogram::{HISTOGRAM_BUCKETS, HistogramBucket};
use super::samples::LatencySummary;

/// Coarse HTTP status classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusBand {
    Informational,
    Success,
    Redirection,
    ClientError,
    ServerError,
}

impl StatusBand {
    /// Returns `None` for codes outside `[100, 600)`.
    #[must_use]
    pub const fn from_status(status: u16) -> Option<Self> {
        match status {
            100..=199 => Some(StatusBand::Informational),
            200..=299 => Some(StatusBand::Success),
            300..=399 => Some(StatusBand::Redirection),
            400..=499 => Some(StatusBand::ClientError),
            500..=599 => Some(StatusBand::ServerError),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub connection_errors: u64,
    pub status_1xx: u64,
    pub status_2xx: u64,
    pub status_3xx: u64,
    pub status_4xx: u64,
    pub status_5xx: u64,
}

impl StatusCounts {
    pub const fn record(&mut self, band: StatusBand) {
        let counter = match band {
            StatusBand::Informational => &mut self.status_1xx,
            StatusBand::Success => &mut self.status_2xx,
            StatusBand::Redirection => &mut self.status_3xx,
            StatusBand::ClientError => &mut self.status_4xx,
            StatusBand::ServerError => &mut self.status_5xx,
        };
        *counter = counter.saturating_add(1);
    }

    pub const fn record_connection_error(&mut self) {
        self.connection_errors = self.connection_errors.saturating_add(1);
    }

    pub const fn merge(&mut self, other: &StatusCounts) {
        self.connection_errors = self.connection_errors.saturating_add(other.connection_errors);
        self.status_1xx = self.status_1xx.saturating_add(other.status_1xx);
        self.status_2xx = self.status_2xx.saturating_add(other.status_2xx);
        self.status_3xx = self.status_3xx.saturating_add(other.status_3xx);
        self.status_4xx = self.status_4xx.saturating_add(other.status_4xx);
        self.status_5xx = self.status_5xx.saturating_add(other.status_5xx);
    }

    /// Every request counts once: all bands plus connection errors.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.connection_errors
            .saturating_add(self.status_1xx)
            .saturating_add(self.status_2xx)
            .saturating_add(self.status_3xx)
            .saturating_add(self.status_4xx)
            .saturating_add(self.status_5xx)
    }
}

/// What a worker hands over when it finishes. Emitted exactly once.
#[derive(Debug)]
pub struct WorkerReport {
    pub worker_id: usize,
    pub counts: StatusCounts,
    pub latency: LatencySummary,
    pub dropped_samples: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LatencyStats {
    pub min: Duration,
    pub max: Duration,
    pub average: Duration,
    pub sample_count: u64,
    pub histogram: [HistogramBucket; HISTOGRAM_BUCKETS],
}

/// Final merged outcome of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunResult {
    pub counts: StatusCounts,
    pub total_requests: u64,
    pub time_taken: Duration,
    pub requests_per_second: u64,
    /// Present only for fixed-count runs with at least one retained sample.
    pub latency: Option<LatencyStats>,
    pub dropped_samples: u64,
}
