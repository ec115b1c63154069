//! HTTP request execution and workload orchestration.
mod sender;
mod workload;

#[cfg(test)]
mod tests;

pub use sender::{TransportConfig, build_client, run_load};
pub use workload::{
    PreloadedRequests, RequestDescriptor, RequestSource, load_request_file, parse_request_list,
};
