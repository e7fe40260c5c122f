use registry_harvest::client::{BodyMode, FetchOutcome, Fetcher, ReqwestFetcher};
use registry_harvest::config::UserAgentConfig;
use registry_harvest::prober::{probe_all, probe_sequential, ProbeOptions, ProbeStatus};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fetcher() -> ReqwestFetcher {
    ReqwestFetcher::for_probing(&UserAgentConfig::default()).expect("Failed to build client")
}

/// Adapter stand-in keyed on the URL
struct CannedFetcher;

#[async_trait::async_trait]
impl Fetcher for CannedFetcher {
    async fn fetch(&self, url: &str, _timeout: Duration, _mode: BodyMode) -> FetchOutcome {
        match url {
            "http://ok" => FetchOutcome::Response {
                status: 200,
                body: None,
            },
            "http://slow" => FetchOutcome::Timeout,
            _ => FetchOutcome::Error("connection refused".to_string()),
        }
    }
}

#[tokio::test]
async fn test_mocked_adapter_pairs_results() {
    let urls = ["http://ok", "http://slow", "http://bad"];

    let report = probe_all(
        &CannedFetcher,
        &urls,
        ProbeOptions::new(Duration::from_secs(1), urls.len()),
    )
    .await;

    let pairs: HashSet<_> = report
        .iter()
        .map(|r| (r.url.clone(), r.status.to_string()))
        .collect();
    let expected: HashSet<_> = [
        ("http://ok".to_string(), "200".to_string()),
        ("http://slow".to_string(), "timeout".to_string()),
        ("http://bad".to_string(), "error".to_string()),
    ]
    .into_iter()
    .collect();
    assert_eq!(pairs, expected);
}

#[tokio::test]
async fn test_status_codes_are_preserved() {
    let server = MockServer::start().await;
    for (route, status) in [("/ok", 200), ("/moved", 301), ("/gone", 410), ("/down", 503)] {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(status))
            .mount(&server)
            .await;
    }
    let urls: Vec<String> = ["/ok", "/moved", "/gone", "/down"]
        .iter()
        .map(|route| format!("{}{}", server.uri(), route))
        .collect();

    let report = probe_all(&fetcher(), &urls, ProbeOptions::default()).await;

    let statuses: Vec<_> = report.iter().map(|r| r.status).collect();
    assert_eq!(
        statuses,
        vec![
            ProbeStatus::Code(200),
            ProbeStatus::Code(301),
            ProbeStatus::Code(410),
            ProbeStatus::Code(503),
        ]
    );
}

#[tokio::test]
async fn test_one_timeout_does_not_delay_the_rest() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(300)))
        .mount(&server)
        .await;

    let mut urls = vec![format!("{}/slow", server.uri())];
    urls.extend((0..9).map(|i| format!("{}/fast/{}", server.uri(), i)));

    let started = Instant::now();
    let report = probe_all(
        &fetcher(),
        &urls,
        ProbeOptions::new(Duration::from_millis(500), 20),
    )
    .await;
    let elapsed = started.elapsed();

    assert_eq!(report.len(), 10);
    assert_eq!(report.results()[0].status, ProbeStatus::Timeout);
    assert!(report.results()[1..]
        .iter()
        .all(|r| r.status == ProbeStatus::Code(200)));
    assert!(
        elapsed < Duration::from_millis(2000),
        "probing took {:?}, expected roughly one timeout",
        elapsed
    );
}

#[tokio::test]
async fn test_duplicates_and_unreachable_hosts() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(3)
        .mount(&server)
        .await;

    let ok = format!("{}/tool", server.uri());
    let urls = vec![
        ok.clone(),
        "http://127.0.0.1:1/".to_string(),
        ok.clone(),
        "not a url".to_string(),
        ok,
    ];

    let report = probe_all(&fetcher(), &urls, ProbeOptions::new(Duration::from_secs(2), 2)).await;

    assert_eq!(report.len(), 5);
    let statuses: Vec<_> = report.iter().map(|r| r.status).collect();
    assert_eq!(
        statuses,
        vec![
            ProbeStatus::Code(200),
            ProbeStatus::Error,
            ProbeStatus::Code(200),
            ProbeStatus::Error,
            ProbeStatus::Code(200),
        ]
    );
    assert_eq!(report.failure_count(), 2);
}

#[tokio::test]
async fn test_sequential_probe_against_server() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let urls = [
        format!("{}/home", server.uri()),
        format!("{}/missing", server.uri()),
    ];

    let report = probe_sequential(&fetcher(), &urls, Duration::from_secs(2)).await;

    assert_eq!(report.results()[0].status, ProbeStatus::Code(200));
    assert_eq!(report.results()[1].status, ProbeStatus::Code(404));
}

#[tokio::test]
async fn test_connections_closed_when_probe_all_returns() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/", listener.local_addr().unwrap());
    let accepted: Arc<Mutex<Vec<TcpStream>>> = Arc::new(Mutex::new(Vec::new()));

    let server = {
        let accepted = Arc::clone(&accepted);
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let mut request = [0u8; 2048];
                let _ = socket.read(&mut request).await;
                let _ = socket
                    .write_all(b"HTTP/1.1 200 OK\r\ncontent-length: 0\r\n\r\n")
                    .await;
                accepted.lock().await.push(socket);
            }
        })
    };

    let urls = [url.clone(), url.clone(), url];
    let report = probe_all(
        &fetcher(),
        &urls,
        ProbeOptions::new(Duration::from_secs(2), 3),
    )
    .await;
    assert!(report.iter().all(|r| r.status == ProbeStatus::Code(200)));

    tokio::time::sleep(Duration::from_millis(200)).await;
    server.abort();
    let mut sockets = std::mem::take(&mut *accepted.lock().await);
    assert!(!sockets.is_empty());

    for socket in sockets.iter_mut() {
        let mut buf = [0u8; 16];
        let read = tokio::time::timeout(Duration::from_secs(1), socket.read(&mut buf)).await;
        assert!(
            matches!(read, Ok(Ok(0))),
            "connection still open after probe_all returned: {:?}",
            read
        );
    }
}
