use clap::ArgMatches;
use clap::parser::ValueSource;

use crate::args::TesterArgs;
use crate::error::AppResult;

use super::types::ConfigFile;

/// Applies configuration values to CLI arguments. Flags given on the
/// command line always win.
///
/// # Errors
///
/// Returns an error when a config value is invalid.
pub fn apply_config(
    args: &mut TesterArgs,
    matches: &ArgMatches,
    config: &ConfigFile,
) -> AppResult<()> {
    if !is_cli(matches, "url")
        && let Some(url) = config.url.clone()
    {
        args.url = Some(url);
    }

    if !is_cli(matches, "method")
        && let Some(method) = config.method
    {
        args.method = method;
    }

    // A body given either way on the command line shadows both config keys.
    let body_on_cli = is_cli(matches, "body") || is_cli(matches, "body_file");
    if !body_on_cli {
        if let Some(body) = config.body.clone() {
            args.body = body;
        }
        if let Some(body_file) = config.body_file.clone() {
            args.body_file = Some(body_file);
        }
    }

    if !is_cli(matches, "requests_file")
        && let Some(requests_file) = config.requests_file.clone()
    {
        args.requests_file = Some(requests_file);
    }

    if !is_cli(matches, "concurrency")
        && let Some(concurrency) = config.concurrency
    {
        args.concurrency = concurrency;
    }

    if !is_cli(matches, "requests")
        && let Some(requests) = config.requests
    {
        args.requests = requests;
    }

    if !is_cli(matches, "duration")
        && let Some(duration) = config.duration
    {
        args.duration = duration;
    }

    if !is_cli(matches, "wait")
        && let Some(wait) = config.wait
    {
        args.wait = wait;
    }

    if !is_cli(matches, "insecure")
        && let Some(insecure) = config.insecure
    {
        args.insecure = insecure;
    }

    if !is_cli(matches, "quiet")
        && let Some(quiet) = config.quiet
    {
        args.quiet = quiet;
    }

    if !is_cli(matches, "request_timeout")
        && let Some(timeout) = config.timeout.as_ref()
    {
        args.request_timeout = timeout.to_duration()?;
    }

    if !is_cli(matches, "output_format")
        && let Some(format) = config.output_format
    {
        args.output_format = format;
    }

    Ok(())
}

fn is_cli(matches: &ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(ValueSource::CommandLine)
}
