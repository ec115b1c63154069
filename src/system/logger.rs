use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Installs the global subscriber. `quiet` silences every log line.
pub fn init_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("off")
    } else {
        std::env::var("BATON_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .map_or_else(
                |_| {
                    if verbose {
                        EnvFilter::new("debug")
                    } else {
                        EnvFilter::new("info")
                    }
                },
                |value| EnvFilter::try_new(value).unwrap_or_else(|_| EnvFilter::new("info")),
            )
    };

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set global default subscriber: {}", err);
    }
}
