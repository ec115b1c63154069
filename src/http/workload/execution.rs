use futures_util::StreamExt;
use reqwest::{Client, Request};

#[derive(Debug)]
pub(in crate::http) enum RequestOutcome {
    Response { status: u16 },
    TransportError(reqwest::Error),
}

/// Sends the request and drains the body so the connection can go back to
/// the pool. Failing to read the body counts as a transport failure.
pub(in crate::http) async fn execute_request(client: &Client, request: Request) -> RequestOutcome {
    match client.execute(request).await {
        Ok(response) => {
            let status = response.status().as_u16();
            match drain_response_body(response).await {
                Ok(_) => RequestOutcome::Response { status },
                Err(err) => RequestOutcome::TransportError(err),
            }
        }
        Err(err) => RequestOutcome::TransportError(err),
    }
}

async fn drain_response_body(response: reqwest::Response) -> Result<u64, reqwest::Error> {
    let mut stream = response.bytes_stream();
    let mut total_bytes: u64 = 0;
    while let Some(chunk) = stream.next().await {
        let bytes = chunk?;
        total_bytes = total_bytes.saturating_add(u64::try_from(bytes.len()).unwrap_or(u64::MAX));
    }
    Ok(total_bytes)
}
