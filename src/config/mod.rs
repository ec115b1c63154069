//! Configuration file loading and the immutable run configuration.
mod apply;
mod loader;
mod run;
pub mod types;


pub use apply::apply_config;
pub use loader::{load_config, load_config_file};
pub use run::{RunConfig, RunMode};
