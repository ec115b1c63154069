//! Binary entry point: flags, config file, logging, then the run itself.
use clap::{ArgMatches, CommandFactory, FromArgMatches};
use tracing::debug;

use crate::args::TesterArgs;
use crate::config::{RunConfig, apply_config, load_config};
use crate::error::{AppError, AppResult};
use crate::http::run_load;
use crate::system::{logger::init_logging, summary_output::render_report};

/// Parses the command line, runs the load, and prints the report.
///
/// # Errors
///
/// Returns an error when the configuration is invalid, the runtime cannot
/// start, or the run fails to collect every worker's result.
pub fn run() -> AppResult<()> {
    let matches = TesterArgs::command().get_matches();
    let config = match prepare(&matches) {
        Ok(config) => config,
        Err(err) => {
            if err.is_preflight() {
                report_preflight_error(&err);
            }
            return Err(err);
        }
    };

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let result = runtime.block_on(run_load(&config))?;
    debug!(
        total_requests = result.total_requests,
        dropped_samples = result.dropped_samples,
        "Run complete"
    );

    if !config.quiet {
        println!("{}", render_report(&result, config.output_format)?);
    }
    Ok(())
}

fn prepare(matches: &ArgMatches) -> AppResult<RunConfig> {
    let mut args = TesterArgs::from_arg_matches(matches)?;
    if let Some(config_file) = load_config(args.config.as_deref())? {
        apply_config(&mut args, matches, &config_file)?;
    }
    init_logging(args.verbose, args.quiet);
    RunConfig::from_args(&args)
}

fn report_preflight_error(err: &AppError) {
    eprintln!("{}", err);
    eprintln!("{}", TesterArgs::command().render_help());
}
