mod data;
mod execution;
mod request_file;

pub use data::{PreloadedRequests, RequestDescriptor, RequestSource};
pub use request_file::{load_request_file, parse_request_list};

pub(in crate::http) use execution::{RequestOutcome, execute_request};
