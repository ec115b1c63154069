use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RequestFileError {
    #[error("Failed to read request file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed CSV: {source}")]
    Csv {
        #[source]
        source: csv::Error,
    },
    #[error("Row {row}: invalid number of fields (expected at least 2, found {found}).")]
    TooFewFields { row: u64, found: usize },
    #[error("Row {row}: invalid HTTP method '{value}'.")]
    InvalidMethod { row: u64, value: String },
    #[error("Row {row}: invalid URL '{value}': {source}")]
    InvalidUrl {
        row: u64,
        value: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Row {row}: invalid header '{name}'.")]
    InvalidHeader { row: u64, name: String },
    #[error("Request file contained no requests.")]
    Empty,
}
