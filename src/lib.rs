//! Core library for the `baton` CLI.
//!
//! `baton` drives a fixed number of HTTP requests, or runs for a fixed
//! duration, across a pool of concurrent workers and reports status-code and
//! latency statistics. The library exposes the argument and configuration
//! types, the request workload and its runner, and the metrics aggregation
//! used by the binary.
pub mod args;
pub mod config;
pub mod entry;
pub mod error;
pub mod http;
pub mod metrics;
mod system;

#[cfg(feature = "fuzzing")]
pub mod fuzzing;
