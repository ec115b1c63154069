use std::time::Duration;

use reqwest::{Client, redirect};
use tracing::{debug, error};

use crate::{args::DEFAULT_USER_AGENT, error::HttpError};

/// Settings for the shared HTTP client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportConfig {
    pub insecure: bool,
    pub request_timeout: Duration,
}

/// Builds the single connection-pooling client every worker shares.
///
/// Redirects are not followed so 3xx responses land in their own band.
///
/// # Errors
///
/// Returns an error when reqwest cannot initialize the client or its TLS
/// backend.
pub fn build_client(config: &TransportConfig) -> Result<Client, HttpError> {
    let mut client_builder = Client::builder()
        .timeout(config.request_timeout)
        .user_agent(DEFAULT_USER_AGENT)
        .redirect(redirect::Policy::none());

    if config.insecure {
        debug!("TLS certificate and hostname verification disabled");
        client_builder = client_builder
            .danger_accept_invalid_certs(true)
            .danger_accept_invalid_hostnames(true);
    }

    client_builder.build().map_err(|err| {
        error!("Failed to build HTTP client: {}", err);
        HttpError::BuildClientFailed { source: err }
    })
}
