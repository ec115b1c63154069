use super::*;

#[test]
fn parse_args_defaults() -> AppResult<()> {
    let args = parse_test_args(["baton", "-u", "http://localhost"])?;

    let checks = [
        (
            matches!(args.method, HttpMethod::Get),
            "Expected HttpMethod::Get",
        ),
        (
            args.url.as_deref() == Some("http://localhost"),
            "Unexpected url",
        ),
        (args.body.is_empty(), "Expected empty body"),
        (args.body_file.is_none(), "Expected body_file to be None"),
        (
            args.requests_file.is_none(),
            "Expected requests_file to be None",
        ),
        (args.concurrency == 1, "Unexpected concurrency"),
        (args.requests == 1, "Unexpected requests"),
        (args.duration == 0, "Unexpected duration"),
        (args.wait == 0, "Unexpected wait"),
        (!args.insecure, "Expected insecure to be false"),
        (!args.quiet, "Expected quiet to be false"),
        (
            args.request_timeout == Duration::from_secs(30),
            "Unexpected request_timeout",
        ),
        (
            matches!(args.output_format, OutputFormat::Text),
            "Expected OutputFormat::Text",
        ),
        (args.config.is_none(), "Expected config to be None"),
        (!args.verbose, "Expected verbose to be false"),
    ];

    for (ok, message) in checks {
        if !ok {
            return Err(AppError::validation(message));
        }
    }
    Ok(())
}

#[test]
fn parse_args_without_url_is_accepted_by_cli() -> AppResult<()> {
    let args = parse_test_args(["baton", "-z", "requests.csv"])?;
    if args.url.is_some() {
        return Err(AppError::validation("Expected url to be None"));
    }
    if args.requests_file.as_deref() != Some("requests.csv") {
        return Err(AppError::validation("Unexpected requests_file"));
    }
    Ok(())
}
