use clap::Parser;
use std::time::Duration;

use super::defaults::DEFAULT_REQUEST_TIMEOUT;
use super::parsers::parse_duration_arg;
use super::types::{HttpMethod, OutputFormat};

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Async HTTP load generator - drive a fixed number of requests, or run for a fixed duration, across concurrent workers and report latency and status-code statistics."
)]
pub struct TesterArgs {
    /// URL to run against
    #[arg(long, short = 'u')]
    pub url: Option<String>,

    /// HTTP method (GET, POST, PUT, DELETE)
    #[arg(long, short = 'm', default_value = "get", ignore_case = true)]
    pub method: HttpMethod,

    /// Request body (use instead of -f)
    #[arg(long, short = 'b', default_value = "")]
    pub body: String,

    /// File whose contents are used as the request body (use instead of -b)
    #[arg(long = "body-file", short = 'f', conflicts_with = "body")]
    pub body_file: Option<String>,

    /// Read requests from a CSV file (method,url[,body[,headers]])
    #[arg(long = "requests-file", short = 'z')]
    pub requests_file: Option<String>,

    /// Number of concurrent workers
    #[arg(long, short = 'c', default_value_t = 1)]
    pub concurrency: usize,

    /// Number of requests (use instead of -t)
    #[arg(long, short = 'r', default_value_t = 1)]
    pub requests: u64,

    /// Duration of the run in seconds (use instead of -r)
    #[arg(long, short = 't', default_value_t = 0)]
    pub duration: u64,

    /// Seconds to wait before starting the run
    #[arg(long, short = 'w', default_value_t = 0)]
    pub wait: u64,

    /// Ignore TLS/SSL certificate validation
    #[arg(long, short = 'i')]
    pub insecure: bool,

    /// Suppress output, no results will be printed to stdout
    #[arg(long, short = 'o')]
    pub quiet: bool,

    /// Per-request timeout (supports ms/s/m/h)
    #[arg(
        long = "timeout",
        default_value = DEFAULT_REQUEST_TIMEOUT,
        value_parser = parse_duration_arg
    )]
    pub request_timeout: Duration,

    /// Format of the final report
    #[arg(long = "output-format", value_enum, default_value = "text")]
    pub output_format: OutputFormat,

    /// Path to config file (TOML/JSON)
    #[arg(long)]
    pub config: Option<String>,

    /// Enable verbose logging (sets log level to debug unless overridden by BATON_LOG/RUST_LOG)
    #[arg(long, short = 'v')]
    pub verbose: bool,
}
