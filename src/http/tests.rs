use super::sender::{
    DriveMode, TokenPool, TransportConfig, Worker, WorkerChannels, build_client, describe_target,
};
use super::*;
use bytes::Bytes;
use rand::SeedableRng;
use rand::rngs::StdRng;
use reqwest::{Method, Url};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

const OK_RESPONSE: &[u8] = b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\nConnection: close\r\n\r\nOK";

fn run_async_test<F>(future: F) -> Result<(), String>
where
    F: Future<Output = Result<(), String>>,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| format!("Failed to build runtime: {}", err))?;
    runtime.block_on(future)
}

fn descriptor(url: &str) -> Result<RequestDescriptor, String> {
    let url = Url::parse(url).map_err(|err| format!("bad url {}: {}", url, err))?;
    Ok(RequestDescriptor::new(
        Method::GET,
        url,
        Bytes::new(),
        Vec::new(),
    ))
}

/// Answers every connection with `200 OK` after `delay`, counting the
/// requests it has read.
async fn spawn_ok_server(delay: Duration) -> Result<(SocketAddr, Arc<AtomicUsize>), String> {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .map_err(|err| format!("bind failed: {}", err))?;
    let addr = listener
        .local_addr()
        .map_err(|err| format!("local_addr failed: {}", err))?;
    let hits = Arc::new(AtomicUsize::new(0));
    let server_hits = Arc::clone(&hits);
    tokio::spawn(async move {
        while let Ok((mut stream, _)) = listener.accept().await {
            let counter = Arc::clone(&server_hits);
            tokio::spawn(async move {
                let mut buffer = [0u8; 4096];
                if stream.read(&mut buffer).await.is_err() {
                    return;
                }
                counter.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(delay).await;
                if stream.write_all(OK_RESPONSE).await.is_ok() {
                    drop(stream.shutdown().await);
                }
            });
        }
    });
    Ok((addr, hits))
}

fn test_client() -> Result<reqwest::Client, String> {
    build_client(&TransportConfig {
        insecure: false,
        request_timeout: Duration::from_secs(2),
    })
    .map_err(|err| err.to_string())
}

fn header_value<'req>(request: &'req RequestDescriptor, name: &str) -> Option<&'req str> {
    request
        .headers()
        .iter()
        .find(|(header, _)| header.as_str().eq_ignore_ascii_case(name))
        .and_then(|(_, value)| value.to_str().ok())
}

#[test]
fn template_source_always_returns_template() -> Result<(), String> {
    let template = descriptor("http://localhost/one")?;
    let source = RequestSource::template(template.clone());
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..16 {
        if source.next_with(&mut rng) != &template {
            return Err("Template source returned a different descriptor".to_owned());
        }
    }
    if source.len() != 1 {
        return Err(format!("Expected len 1, got {}", source.len()));
    }
    Ok(())
}

#[test]
fn preloaded_source_picks_uniformly() -> Result<(), String> {
    const DRAWS: usize = 40_000;
    let urls = [
        "http://localhost/a",
        "http://localhost/b",
        "http://localhost/c",
        "http://localhost/d",
    ];
    let mut descriptors = Vec::with_capacity(urls.len());
    for url in urls {
        descriptors.push(descriptor(url)?);
    }
    let requests =
        PreloadedRequests::new(descriptors).ok_or("Expected non-empty request list")?;
    let source = RequestSource::preloaded(requests);

    let mut rng = StdRng::seed_from_u64(42);
    let mut hits = [0usize; 4];
    for _ in 0..DRAWS {
        let picked = source.next_with(&mut rng);
        let index = urls
            .iter()
            .position(|url| picked.url().as_str() == *url)
            .ok_or("Picked descriptor not in list")?;
        let slot = hits.get_mut(index).ok_or("Index out of range")?;
        *slot = slot.saturating_add(1);
    }

    // Expected 10_000 per index; allow 5% either way.
    for (index, count) in hits.iter().enumerate() {
        if !(9_500..=10_500).contains(count) {
            return Err(format!("Index {} drawn {} times: {:?}", index, count, hits));
        }
    }
    Ok(())
}

#[test]
fn preloaded_requests_reject_empty_list() -> Result<(), String> {
    if PreloadedRequests::new(Vec::new()).is_some() {
        return Err("Empty list must be rejected".to_owned());
    }
    Ok(())
}

#[test]
fn parse_request_list_reads_method_url_and_body() -> Result<(), String> {
    let content = "POST,http://localhost:8080/items,Data\nget,http://localhost:8080/items\n";
    let requests = parse_request_list(content.as_bytes()).map_err(|err| err.to_string())?;

    let [first, second] = requests.as_slice() else {
        return Err(format!("Expected 2 requests, got {}", requests.len()));
    };
    if first.method() != Method::POST || first.body().as_ref() != b"Data" {
        return Err(format!("Unexpected first request: {:?}", first));
    }
    if first.url().as_str() != "http://localhost:8080/items" {
        return Err(format!("Unexpected url: {}", first.url()));
    }
    if second.method() != Method::GET || !second.body().is_empty() {
        return Err(format!("Unexpected second request: {:?}", second));
    }
    Ok(())
}

#[test]
fn parse_request_list_rejects_single_field_row() -> Result<(), String> {
    let content = "GET,http://localhost/ok\nGET\n";
    match parse_request_list(content.as_bytes()) {
        Err(crate::error::RequestFileError::TooFewFields { row: 2, found: 1 }) => Ok(()),
        other => Err(format!("Expected TooFewFields on row 2, got {:?}", other)),
    }
}

#[test]
fn parse_request_list_splits_header_lines() -> Result<(), String> {
    let content = "POST,http://localhost/,Data,\"Content-Type:Hello\nSecret:World\"\n";
    let requests = parse_request_list(content.as_bytes()).map_err(|err| err.to_string())?;
    let request = requests.first().ok_or("Expected one request")?;

    if header_value(request, "Content-Type") != Some("Hello") {
        return Err(format!("Unexpected Content-Type: {:?}", request.headers()));
    }
    if header_value(request, "Secret") != Some("World") {
        return Err(format!("Unexpected Secret: {:?}", request.headers()));
    }
    Ok(())
}

#[test]
fn parse_request_list_skips_header_lines_without_colon() -> Result<(), String> {
    let content = "GET,http://localhost/,,\"not-a-header\nX-Trace: abc:def \"\n";
    let requests = parse_request_list(content.as_bytes()).map_err(|err| err.to_string())?;
    let request = requests.first().ok_or("Expected one request")?;

    if request.headers().len() != 1 {
        return Err(format!("Expected one header, got {:?}", request.headers()));
    }
    if header_value(request, "X-Trace") != Some("abc:def") {
        return Err(format!("Value must keep everything after the first colon: {:?}", request.headers()));
    }
    Ok(())
}

#[test]
fn parse_request_list_rejects_invalid_url() -> Result<(), String> {
    match parse_request_list("GET,not a url\n".as_bytes()) {
        Err(crate::error::RequestFileError::InvalidUrl { row: 1, .. }) => Ok(()),
        other => Err(format!("Expected InvalidUrl, got {:?}", other)),
    }
}

#[test]
fn load_request_file_rejects_empty_file() -> Result<(), String> {
    let file = tempfile::NamedTempFile::new().map_err(|err| format!("tempfile failed: {}", err))?;
    match load_request_file(file.path()) {
        Err(crate::error::RequestFileError::Empty) => Ok(()),
        other => Err(format!("Expected Empty, got {:?}", other)),
    }
}

#[test]
fn token_pool_hands_out_each_token_once() -> Result<(), String> {
    const TOTAL: u64 = 10_000;
    let pool = Arc::new(TokenPool::new(TOTAL));
    let mut handles = Vec::new();
    for _ in 0..8 {
        let pool = Arc::clone(&pool);
        handles.push(std::thread::spawn(move || {
            let mut taken: u64 = 0;
            while pool.try_take() {
                taken = taken.saturating_add(1);
            }
            taken
        }));
    }

    let mut total_taken: u64 = 0;
    for handle in handles {
        let taken = handle
            .join()
            .map_err(|_| "Token thread panicked".to_owned())?;
        total_taken = total_taken.saturating_add(taken);
    }
    if total_taken != TOTAL {
        return Err(format!("Expected {} tokens taken, got {}", TOTAL, total_taken));
    }
    if pool.remaining() != 0 || pool.try_take() {
        return Err("Pool must stay exhausted".to_owned());
    }
    Ok(())
}

#[test]
fn worker_counts_unreachable_target_as_connection_errors() -> Result<(), String> {
    run_async_test(async {
        // Bind then drop a listener so the port is known to be closed.
        let addr = std::net::TcpListener::bind("127.0.0.1:0")
            .and_then(|listener| listener.local_addr())
            .map_err(|err| format!("bind failed: {}", err))?;
        let source = RequestSource::template(descriptor(&format!("http://{}/", addr))?);
        let client = test_client()?;

        let (results_tx, mut results_rx) = mpsc::channel(1);
        let (done_tx, mut done_rx) = mpsc::channel(1);
        let worker = Worker::new(
            3,
            client,
            source,
            DriveMode::CountDriven(Arc::new(TokenPool::new(5))),
            16,
        );
        worker.run(WorkerChannels { results_tx, done_tx }).await;

        let report = results_rx.recv().await.ok_or("Missing worker report")?;
        if report.worker_id != 3 {
            return Err(format!("Unexpected worker id {}", report.worker_id));
        }
        if report.counts.connection_errors != 5 || report.counts.total() != 5 {
            return Err(format!("Unexpected counts: {:?}", report.counts));
        }
        if report.latency.count() != 0 {
            return Err("Failed requests must not record latency".to_owned());
        }
        if done_rx.recv().await != Some(3) {
            return Err("Missing completion signal".to_owned());
        }
        Ok(())
    })
}

#[test]
fn time_driven_worker_stops_at_first_check_after_deadline() -> Result<(), String> {
    run_async_test(async {
        let delay = Duration::from_millis(150);
        let (addr, hits) = spawn_ok_server(delay).await?;
        let source = RequestSource::template(descriptor(&format!("http://{}/", addr))?);

        let (results_tx, mut results_rx) = mpsc::channel(1);
        let (done_tx, _done_rx) = mpsc::channel(1);
        let duration = Duration::from_millis(400);
        let started = Instant::now();
        Worker::new(
            0,
            test_client()?,
            source,
            DriveMode::TimeDriven { duration },
            16,
        )
        .run(WorkerChannels { results_tx, done_tx })
        .await;
        let elapsed = started.elapsed();

        if elapsed < duration {
            return Err(format!("Worker stopped early after {:?}", elapsed));
        }
        // Only the request in flight at the deadline may overrun it.
        let slack = Duration::from_millis(300);
        if elapsed > duration.saturating_add(delay).saturating_add(slack) {
            return Err(format!("Worker overran the deadline: {:?}", elapsed));
        }
        let report = results_rx.recv().await.ok_or("Missing worker report")?;
        let served = u64::try_from(hits.load(Ordering::SeqCst)).map_err(|err| err.to_string())?;
        if report.counts.status_2xx == 0 || report.counts.total() != served {
            return Err(format!(
                "Worker counted {:?}, server answered {}",
                report.counts, served
            ));
        }
        Ok(())
    })
}

#[test]
fn worker_counts_responses_whose_samples_were_dropped() -> Result<(), String> {
    run_async_test(async {
        let (addr, hits) = spawn_ok_server(Duration::ZERO).await?;
        let source = RequestSource::template(descriptor(&format!("http://{}/", addr))?);

        let (results_tx, mut results_rx) = mpsc::channel(1);
        let (done_tx, _done_rx) = mpsc::channel(1);
        Worker::new(
            1,
            test_client()?,
            source,
            DriveMode::CountDriven(Arc::new(TokenPool::new(7))),
            3,
        )
        .run(WorkerChannels { results_tx, done_tx })
        .await;

        let report = results_rx.recv().await.ok_or("Missing worker report")?;
        if report.counts.status_2xx != 7 || report.counts.total() != 7 {
            return Err(format!("Unexpected counts: {:?}", report.counts));
        }
        if report.dropped_samples != 4 {
            return Err(format!("Expected 4 dropped samples, got {}", report.dropped_samples));
        }
        // Three buffered samples minus the warm-up one.
        if report.latency.count() != 2 {
            return Err(format!("Expected 2 samples, got {}", report.latency.count()));
        }
        if hits.load(Ordering::SeqCst) != 7 {
            return Err(format!("Server saw {} requests", hits.load(Ordering::SeqCst)));
        }
        Ok(())
    })
}

#[test]
fn target_description_follows_source_kind() -> Result<(), String> {
    let template = RequestSource::template(descriptor("http://localhost:8080/one")?);
    if describe_target(&template) != "http://localhost:8080/one" {
        return Err(format!("Unexpected template description: {}", describe_target(&template)));
    }

    let single_row = PreloadedRequests::new(vec![descriptor("http://localhost:8080/two")?])
        .ok_or("Expected a non-empty list")?;
    let preloaded = RequestSource::preloaded(single_row);
    if describe_target(&preloaded) != "1 preloaded requests" {
        return Err(format!("Unexpected list description: {}", describe_target(&preloaded)));
    }
    Ok(())
}
