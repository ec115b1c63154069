mod config;
mod worker;

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc;
use tokio::time::sleep;
use tracing::{debug, info};

use crate::{
    config::{RunConfig, RunMode},
    error::{AppError, AppResult, RunError},
    metrics::{DEFAULT_SAMPLE_CAPACITY, RunResult, WorkerReport, aggregate_reports},
};

use super::workload::RequestSource;

pub use config::{TransportConfig, build_client};
pub(in crate::http) use worker::{DriveMode, TokenPool, Worker, WorkerChannels};

/// Runs the configured load and returns the aggregated result.
///
/// Per-request failures never abort the run; they are tallied as connection
/// errors by the worker that saw them.
///
/// # Errors
///
/// Returns an error when the HTTP client cannot be built or when workers do
/// not all report back.
pub async fn run_load(config: &RunConfig) -> AppResult<RunResult> {
    let concurrency = config.concurrency.get();
    let (drive, sample_capacity) = match config.mode {
        RunMode::FixedCount(total) => {
            info!(
                "Configuring to send {} requests to {} with concurrency {}",
                total,
                describe_target(&config.workload),
                concurrency
            );
            let capacity = usize::try_from(total.get()).unwrap_or(DEFAULT_SAMPLE_CAPACITY);
            (
                DriveMode::CountDriven(Arc::new(TokenPool::new(total.get()))),
                capacity,
            )
        }
        RunMode::TimedDuration(duration) => {
            info!(
                "Configuring to send requests to {} for {:?} with concurrency {}",
                describe_target(&config.workload),
                duration,
                concurrency
            );
            (DriveMode::TimeDriven { duration }, DEFAULT_SAMPLE_CAPACITY)
        }
    };

    if !config.wait.is_zero() {
        info!("Waiting {:?} before starting", config.wait);
        sleep(config.wait).await;
    }

    let client = build_client(&TransportConfig {
        insecure: config.insecure,
        request_timeout: config.request_timeout,
    })?;
    let (results_tx, mut results_rx) = mpsc::channel::<WorkerReport>(concurrency);
    let (done_tx, mut done_rx) = mpsc::channel::<usize>(concurrency);

    info!("Sending the requests to the server...");
    let started = Instant::now();
    let mut handles = Vec::with_capacity(concurrency);
    for worker_id in 0..concurrency {
        let worker = Worker::new(
            worker_id,
            client.clone(),
            config.workload.clone(),
            drive.clone(),
            sample_capacity,
        );
        let channels = WorkerChannels {
            results_tx: results_tx.clone(),
            done_tx: done_tx.clone(),
        };
        handles.push(tokio::spawn(worker.run(channels)));
    }
    drop(results_tx);
    drop(done_tx);

    let mut completed: usize = 0;
    while completed < concurrency {
        let Some(worker_id) = done_rx.recv().await else {
            break;
        };
        debug!(worker_id, "Worker finished");
        completed = completed.saturating_add(1);
    }
    let time_taken = started.elapsed();
    if completed != concurrency {
        return Err(AppError::run(RunError::MissingCompletions {
            expected: concurrency,
            received: completed,
        }));
    }
    info!("Finished sending the requests");
    if let DriveMode::CountDriven(tokens) = &drive {
        debug!(remaining = tokens.remaining(), "Token pool drained");
    }

    info!("Processing the results...");
    let mut reports = Vec::with_capacity(concurrency);
    while let Some(report) = results_rx.recv().await {
        reports.push(report);
    }
    if reports.len() != concurrency {
        return Err(AppError::run(RunError::MissingResults {
            expected: concurrency,
            received: reports.len(),
        }));
    }
    for handle in handles {
        handle
            .await
            .map_err(|err| AppError::run(RunError::WorkerJoin { source: err }))?;
    }

    Ok(aggregate_reports(
        reports,
        time_taken,
        config.mode.reports_latency(),
    ))
}

pub(in crate::http) fn describe_target(source: &RequestSource) -> String {
    match source {
        RequestSource::Template(template) => template.url().to_string(),
        RequestSource::Preloaded(requests) => format!("{} preloaded requests", requests.len()),
    }
}
