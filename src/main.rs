use std::process::ExitCode;

fn main() -> ExitCode {
    match baton::entry::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // Pre-flight failures are already reported with the usage text.
            if !err.is_preflight() {
                eprintln!("Error: {}", err);
            }
            ExitCode::FAILURE
        }
    }
}
