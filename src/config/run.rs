use std::num::{NonZeroU64, NonZeroUsize};
use std::path::Path;
use std::time::Duration;

use bytes::Bytes;
use reqwest::Url;
use tracing::debug;

use crate::args::{OutputFormat, TesterArgs};
use crate::error::{AppError, AppResult, ConfigError, ValidationError};
use crate::http::{RequestDescriptor, RequestSource, load_request_file};

/// How a run decides it is finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    FixedCount(NonZeroU64),
    TimedDuration(Duration),
}

impl RunMode {
    /// Latency statistics are only reported for fixed-count runs.
    #[must_use]
    pub const fn reports_latency(&self) -> bool {
        matches!(self, RunMode::FixedCount(_))
    }
}

/// Fully resolved, validated settings for one run.
///
/// Built once at startup and only ever passed by reference afterwards.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub concurrency: NonZeroUsize,
    pub mode: RunMode,
    pub workload: RequestSource,
    pub wait: Duration,
    pub insecure: bool,
    pub request_timeout: Duration,
    pub quiet: bool,
    pub output_format: OutputFormat,
}

impl RunConfig {
    /// Validates the parsed flags and loads every file they reference.
    ///
    /// # Errors
    ///
    /// Returns an error for out-of-range counts, a missing or malformed URL,
    /// an unreadable body file, or an invalid request list.
    pub fn from_args(args: &TesterArgs) -> AppResult<Self> {
        let concurrency =
            NonZeroUsize::new(args.concurrency).ok_or(ValidationError::InvalidConcurrency {
                value: args.concurrency,
            })?;
        let mode = resolve_mode(args)?;
        let workload = resolve_workload(args)?;

        Ok(Self {
            concurrency,
            mode,
            workload,
            wait: Duration::from_secs(args.wait),
            insecure: args.insecure,
            request_timeout: args.request_timeout,
            quiet: args.quiet,
            output_format: args.output_format,
        })
    }
}

fn resolve_mode(args: &TesterArgs) -> AppResult<RunMode> {
    if args.duration > 0 {
        if args.requests != 1 {
            debug!(
                requests = args.requests,
                "Request count ignored because a duration is set"
            );
        }
        return Ok(RunMode::TimedDuration(Duration::from_secs(args.duration)));
    }
    let total = NonZeroU64::new(args.requests).ok_or(ValidationError::InvalidRequestCount)?;
    Ok(RunMode::FixedCount(total))
}

fn resolve_workload(args: &TesterArgs) -> AppResult<RequestSource> {
    if let Some(path) = args.requests_file.as_deref() {
        if args.url.is_some() {
            debug!("URL ignored because a request file is set");
        }
        let requests = load_request_file(Path::new(path))?;
        debug!(count = requests.len(), "Loaded requests from {}", path);
        return Ok(RequestSource::preloaded(requests));
    }

    let raw_url = args
        .url
        .as_deref()
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .ok_or(ValidationError::MissingUrl)?;
    let url = Url::parse(raw_url).map_err(|err| {
        AppError::validation(ValidationError::InvalidUrl {
            url: raw_url.to_owned(),
            source: err,
        })
    })?;
    let body = resolve_body(args)?;

    Ok(RequestSource::template(RequestDescriptor::new(
        args.method.into(),
        url,
        body,
        Vec::new(),
    )))
}

fn resolve_body(args: &TesterArgs) -> AppResult<Bytes> {
    match args.body_file.as_deref() {
        Some(_) if !args.body.is_empty() => {
            Err(AppError::validation(ValidationError::BodyConflict))
        }
        Some(path) => {
            let content = std::fs::read(path).map_err(|err| {
                AppError::config(ConfigError::ReadBodyFile {
                    path: path.into(),
                    source: err,
                })
            })?;
            Ok(Bytes::from(content))
        }
        None => Ok(Bytes::from(args.body.clone())),
    }
}
