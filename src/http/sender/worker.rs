use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};
use std::time::{Duration, Instant};

use reqwest::Client;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::metrics::{LatencyBuffer, StatusBand, StatusCounts, WorkerReport};

use super::super::workload::{RequestOutcome, RequestSource, execute_request};

/// Shared supply of request permits for fixed-count runs.
///
/// Each permit is handed out at most once across all workers.
#[derive(Debug)]
pub(in crate::http) struct TokenPool {
    remaining: AtomicU64,
}

impl TokenPool {
    pub(in crate::http) const fn new(total: u64) -> Self {
        Self {
            remaining: AtomicU64::new(total),
        }
    }

    /// Takes one permit; `false` once the pool is exhausted.
    pub(in crate::http) fn try_take(&self) -> bool {
        loop {
            let current = self.remaining.load(Ordering::Relaxed);
            let Some(next) = current.checked_sub(1) else {
                return false;
            };
            if self
                .remaining
                .compare_exchange(current, next, Ordering::AcqRel, Ordering::Relaxed)
                .is_ok()
            {
                return true;
            }
        }
    }

    pub(in crate::http) fn remaining(&self) -> u64 {
        self.remaining.load(Ordering::Relaxed)
    }
}

/// Termination policy for a worker loop.
#[derive(Debug, Clone)]
pub(in crate::http) enum DriveMode {
    CountDriven(Arc<TokenPool>),
    /// Checked between iterations only, so an in-flight request always
    /// completes.
    TimeDriven { duration: Duration },
}

impl DriveMode {
    fn should_continue(&self, started: Instant) -> bool {
        match self {
            DriveMode::CountDriven(tokens) => tokens.try_take(),
            DriveMode::TimeDriven { duration } => started.elapsed() < *duration,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WorkerPhase {
    Idle,
    Running,
    Draining,
    Finished,
}

pub(in crate::http) struct WorkerChannels {
    pub(in crate::http) results_tx: mpsc::Sender<WorkerReport>,
    pub(in crate::http) done_tx: mpsc::Sender<usize>,
}

pub(in crate::http) struct Worker {
    id: usize,
    client: Client,
    source: RequestSource,
    drive: DriveMode,
    sample_capacity: usize,
    phase: WorkerPhase,
}

impl Worker {
    pub(in crate::http) const fn new(
        id: usize,
        client: Client,
        source: RequestSource,
        drive: DriveMode,
        sample_capacity: usize,
    ) -> Self {
        Self {
            id,
            client,
            source,
            drive,
            sample_capacity,
            phase: WorkerPhase::Idle,
        }
    }

    /// Runs until the drive mode says stop, then emits one report followed
    /// by one completion signal.
    pub(in crate::http) async fn run(mut self, channels: WorkerChannels) {
        let mut counts = StatusCounts::default();
        let mut latencies = LatencyBuffer::with_capacity(self.sample_capacity);
        let started = Instant::now();

        self.transition(WorkerPhase::Running);
        while self.drive.should_continue(started) {
            self.iterate(&mut counts, &mut latencies).await;
        }
        self.transition(WorkerPhase::Draining);

        let dropped_samples = latencies.dropped();
        let report = WorkerReport {
            worker_id: self.id,
            counts,
            latency: latencies.summarize(),
            dropped_samples,
        };
        debug!(
            worker_id = self.id,
            total = counts.total(),
            connection_errors = counts.connection_errors,
            samples = report.latency.count(),
            dropped_samples,
            "Worker drained"
        );

        if channels.results_tx.send(report).await.is_err() {
            warn!(worker_id = self.id, "Result receiver closed before report was sent");
        }
        self.transition(WorkerPhase::Finished);
        if channels.done_tx.send(self.id).await.is_err() {
            warn!(worker_id = self.id, "Completion receiver closed before signal was sent");
        }
    }

    async fn iterate(&self, counts: &mut StatusCounts, latencies: &mut LatencyBuffer) {
        let descriptor = self.source.next();
        let start = Instant::now();
        let request = match descriptor.build(&self.client) {
            Ok(request) => request,
            Err(err) => {
                debug!(worker_id = self.id, "Failed to build request: {}", err);
                counts.record_connection_error();
                return;
            }
        };

        match execute_request(&self.client, request).await {
            RequestOutcome::TransportError(err) => {
                debug!(worker_id = self.id, "Request failed: {}", err);
                counts.record_connection_error();
            }
            RequestOutcome::Response { status } => {
                let elapsed_us = u64::try_from(start.elapsed().as_micros()).unwrap_or(u64::MAX);
                match StatusBand::from_status(status) {
                    Some(band) => {
                        counts.record(band);
                        latencies.try_push(elapsed_us);
                    }
                    None => {
                        debug!(worker_id = self.id, status, "Status code outside 100-599");
                        counts.record_connection_error();
                    }
                }
            }
        }
    }

    fn transition(&mut self, next: WorkerPhase) {
        debug!(worker_id = self.id, from = ?self.phase, to = ?next, "Worker phase changed");
        self.phase = next;
    }
}
