use std::time::Duration;

use serde::Serialize;

use crate::args::OutputFormat;
use crate::error::AppResult;
use crate::metrics::{HistogramBucket, RunResult, StatusCounts};

/// Microseconds per hundredth of a millisecond.
const US_PER_CENTI_MS: u128 = 10;
/// Hundredths per unit.
const CENTI: u128 = 100;

const RULE: &str = "=====================================================";

#[derive(Debug, Serialize)]
struct JsonReport<'res> {
    total_requests: u64,
    time_taken_us: u64,
    requests_per_second: u64,
    counts: &'res StatusCounts,
    dropped_samples: u64,
    latency: Option<JsonLatency<'res>>,
}

#[derive(Debug, Serialize)]
struct JsonLatency<'res> {
    min_us: u64,
    max_us: u64,
    average_us: u64,
    sample_count: u64,
    histogram: &'res [HistogramBucket],
}

/// Renders the final report in the requested format.
///
/// # Errors
///
/// Returns an error when the JSON report cannot be serialized.
pub(crate) fn render_report(result: &RunResult, format: OutputFormat) -> AppResult<String> {
    match format {
        OutputFormat::Text => Ok(summary_lines(result).join("\n")),
        OutputFormat::Json => render_json(result),
    }
}

pub(crate) fn summary_lines(result: &RunResult) -> Vec<String> {
    let mut lines = Vec::new();
    lines.push("====================== Results ======================".to_owned());
    lines.push(format!(
        "Total requests:                            {:>10}",
        result.total_requests
    ));
    lines.push(format!(
        "Time taken to complete requests:      {:>15}",
        format!("{:?}", result.time_taken)
    ));
    lines.push(format!(
        "Requests per second:                       {:>10}",
        result.requests_per_second
    ));
    if let Some(latency) = result.latency.as_ref() {
        lines.push(format!(
            "Max response time (ms):                    {:>10}",
            format_ms(latency.max)
        ));
        lines.push(format!(
            "Min response time (ms):                    {:>10}",
            format_ms(latency.min)
        ));
        lines.push(format!(
            "Avg response time (ms):                    {:>10}",
            format_ms(latency.average)
        ));
    }

    let counts = &result.counts;
    lines.push("===================== Breakdown =====================".to_owned());
    lines.push(format!(
        "Number of connection errors:               {:>10}",
        counts.connection_errors
    ));
    for (label, value) in [
        ("1xx", counts.status_1xx),
        ("2xx", counts.status_2xx),
        ("3xx", counts.status_3xx),
        ("4xx", counts.status_4xx),
        ("5xx", counts.status_5xx),
    ] {
        lines.push(format!(
            "Number of {} responses:                   {:>10}",
            label, value
        ));
    }

    if let Some(latency) = result.latency.as_ref() {
        lines.push("=============== Latency distribution ================".to_owned());
        for bucket in &latency.histogram {
            lines.push(format!(
                "  <= {:>10} ms {:>15} {:>10}%",
                format_ms(Duration::from_micros(bucket.upper_bound_us)),
                bucket.cumulative_count,
                bucket.percent
            ));
        }
    }
    lines.push(RULE.to_owned());
    lines
}

fn render_json(result: &RunResult) -> AppResult<String> {
    let report = JsonReport {
        total_requests: result.total_requests,
        time_taken_us: duration_us(result.time_taken),
        requests_per_second: result.requests_per_second,
        counts: &result.counts,
        dropped_samples: result.dropped_samples,
        latency: result.latency.as_ref().map(|latency| JsonLatency {
            min_us: duration_us(latency.min),
            max_us: duration_us(latency.max),
            average_us: duration_us(latency.average),
            sample_count: latency.sample_count,
            histogram: &latency.histogram,
        }),
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

/// Milliseconds with two decimals, rounded half up.
fn format_ms(duration: Duration) -> String {
    let centi_ms = duration
        .as_micros()
        .saturating_add(US_PER_CENTI_MS / 2)
        .checked_div(US_PER_CENTI_MS)
        .unwrap_or(0);
    format!(
        "{}.{:02}",
        centi_ms.checked_div(CENTI).unwrap_or(0),
        centi_ms.checked_rem(CENTI).unwrap_or(0)
    )
}

fn duration_us(duration: Duration) -> u64 {
    u64::try_from(duration.as_micros()).unwrap_or(u64::MAX)
}
