mod app;
mod config;
mod http;
mod request_file;
mod run;
mod validation;

#[cfg(test)]
mod test_support;

pub use app::{AppError, AppResult};
pub use config::ConfigError;
pub use http::HttpError;
pub use request_file::RequestFileError;
pub use run::RunError;
pub use validation::ValidationError;
