//! Per-worker latency sampling, status tallies, and result aggregation.
mod aggregate;
mod histogram;
mod samples;
mod types;


pub use aggregate::aggregate_reports;
pub use histogram::{HISTOGRAM_BUCKETS, HistogramBucket, cumulative_histogram};
pub use samples::{DEFAULT_SAMPLE_CAPACITY, LatencyBuffer, LatencySummary};
pub use types::{LatencyStats, RunResult, StatusBand, StatusCounts, WorkerReport};
