use registry_harvest::client::ReqwestFetcher;
use registry_harvest::config::{parse_config, UserAgentConfig};
use registry_harvest::harvester::{harvest, total_count, HarvestOptions, StopReason};
use registry_harvest::registry::Column;
use registry_harvest::{HarvestError, SchemaError};
use serde_json::{json, Value};
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOPIC: &str = "Systems biology";

fn fetcher() -> ReqwestFetcher {
    ReqwestFetcher::from_config(&UserAgentConfig::default()).expect("Failed to build client")
}

fn options(server: &MockServer) -> HarvestOptions {
    HarvestOptions::new(format!("{}/api/tool/", server.uri()), TOPIC)
        .with_page_timeout(Duration::from_secs(2))
}

/// A registry page with one record per name
fn page_body(names: &[&str], next: Option<&str>) -> Value {
    let list: Vec<Value> = names
        .iter()
        .map(|name| {
            json!({
                "name": name,
                "biotoolsID": name.to_lowercase(),
                "homepage": format!("https://{}.example.org", name.to_lowercase()),
                "additionDate": "2016-04-01T10:00:00Z",
            })
        })
        .collect();
    json!({ "count": 6, "next": next, "list": list })
}

/// Mounts one page, answering only requests for `page=<n>` with the fixed filters
async fn mount_page(server: &MockServer, n: u32, body: Value, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path("/api/tool/"))
        .and(query_param("format", "json"))
        .and(query_param("topic", format!("\"{}\"", TOPIC)))
        .and(query_param("sort", "additionDate"))
        .and(query_param("ord", "asc"))
        .and(query_param("page", n.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(expected_calls)
        .mount(server)
        .await;
}

fn names(table: &registry_harvest::CollectionTable) -> Vec<String> {
    table
        .column(Column::Name)
        .map(|v| v.as_str().unwrap_or_default().to_string())
        .collect()
}

#[tokio::test]
async fn test_two_pages_of_three_records() {
    let server = MockServer::start().await;
    mount_page(&server, 1, page_body(&["A", "B", "C"], Some("?page=2")), 1).await;
    mount_page(&server, 2, page_body(&["D", "E", "F"], None), 1).await;
    mount_page(&server, 3, page_body(&["never"], None), 0).await;

    let outcome = harvest(&fetcher(), options(&server)).await.expect("Harvest failed");

    assert_eq!(names(&outcome.table), vec!["A", "B", "C", "D", "E", "F"]);
    assert_eq!(outcome.pages_requested, 2);
    assert_eq!(outcome.stop, StopReason::EndOfData);
    assert_eq!(outcome.reported_count, Some(6));
    assert_eq!(outcome.table.homepages().len(), 6);
}

#[tokio::test]
async fn test_max_pages_limits_requests() {
    let server = MockServer::start().await;
    mount_page(&server, 1, page_body(&["A"], Some("?page=2")), 1).await;
    mount_page(&server, 2, page_body(&["B"], Some("?page=3")), 1).await;
    mount_page(&server, 3, page_body(&["C"], Some("?page=4")), 0).await;

    let outcome = harvest(&fetcher(), options(&server).with_max_pages(Some(2)))
        .await
        .expect("Harvest failed");

    assert_eq!(names(&outcome.table), vec!["A", "B"]);
    assert_eq!(outcome.stop, StopReason::MaxPagesReached { max_pages: 2 });
}

#[tokio::test]
async fn test_not_found_page_truncates_without_error() {
    let server = MockServer::start().await;
    mount_page(&server, 1, page_body(&["A", "B"], Some("?page=2")), 1).await;
    mount_page(&server, 2, page_body(&["C"], Some("?page=3")), 1).await;
    Mock::given(method("GET"))
        .and(query_param("page", "3"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "Invalid page."})))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = harvest(&fetcher(), options(&server)).await.expect("Harvest failed");

    assert_eq!(names(&outcome.table), vec!["A", "B", "C"]);
    assert_eq!(outcome.stop, StopReason::NonSuccessStatus { status: 404 });
}

#[tokio::test]
async fn test_slow_page_truncates_as_timeout() {
    let server = MockServer::start().await;
    mount_page(&server, 1, page_body(&["A"], Some("?page=2")), 1).await;
    Mock::given(method("GET"))
        .and(query_param("page", "2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(page_body(&["late"], None))
                .set_delay(Duration::from_millis(800)),
        )
        .mount(&server)
        .await;

    let outcome = harvest(
        &fetcher(),
        options(&server).with_page_timeout(Duration::from_millis(150)),
    )
    .await
    .expect("Harvest failed");

    assert_eq!(names(&outcome.table), vec!["A"]);
    assert_eq!(outcome.stop, StopReason::Timeout);
}

#[tokio::test]
async fn test_heterogeneous_records_stay_rectangular() {
    let server = MockServer::start().await;
    let body = json!({
        "count": 3,
        "next": null,
        "list": [
            {"name": "full", "license": "MIT", "topic": [{"term": "Proteomics"}]},
            {"name": "sparse"},
            {"list": [{"description": "enveloped\nrecord"}]},
        ],
    });
    mount_page(&server, 1, body, 1).await;

    let outcome = harvest(&fetcher(), options(&server)).await.expect("Harvest failed");
    let table = outcome.table;

    assert_eq!(table.len(), 3);
    assert!(table.iter().all(|row| row.width() == Column::ALL.len()));
    assert_eq!(table.rows()[1].get(Column::License), &Value::Null);
    assert_eq!(table.rows()[2].get(Column::Name), &Value::Null);
    assert_eq!(
        table.rows()[2].get_str(Column::Description),
        Some("enveloped record")
    );
}

#[tokio::test]
async fn test_undecodable_page_aborts_harvest() {
    let server = MockServer::start().await;
    mount_page(&server, 1, page_body(&["A"], Some("?page=2")), 1).await;
    Mock::given(method("GET"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let result = harvest(&fetcher(), options(&server)).await;

    assert!(matches!(
        result,
        Err(HarvestError::Schema(SchemaError::MalformedPage { page: 2, .. }))
    ));
}

#[tokio::test]
async fn test_no_content_page_ends_harvest() {
    let server = MockServer::start().await;
    mount_page(&server, 1, page_body(&["A", "B"], Some("?page=2")), 1).await;
    Mock::given(method("GET"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = harvest(&fetcher(), options(&server))
        .await
        .expect("empty page should not abort");

    assert_eq!(names(&outcome.table), vec!["A", "B"]);
    assert_eq!(outcome.pages_requested, 2);
    assert_eq!(outcome.stop, StopReason::EndOfData);
}

#[tokio::test]
async fn test_total_count() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tool/"))
        .and(query_param("format", "json"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(&["A"], Some("?page=2"))))
        .expect(1)
        .mount(&server)
        .await;

    let count = total_count(
        &fetcher(),
        &format!("{}/api/tool/", server.uri()),
        Duration::from_secs(2),
    )
    .await
    .expect("Count failed");

    assert_eq!(count, 6);
}

#[tokio::test]
async fn test_options_from_config_file_text() {
    let server = MockServer::start().await;
    mount_page(&server, 1, page_body(&["A"], Some("?page=2")), 1).await;
    mount_page(&server, 2, page_body(&["B"], None), 0).await;

    let config = parse_config(&format!(
        "[registry]\napi-url = \"{}/api/tool/\"\ntopic = \"{}\"\nmax-pages = 1\n",
        server.uri(),
        TOPIC
    ))
    .expect("Invalid config");

    let outcome = harvest(&fetcher(), HarvestOptions::from_config(&config.registry))
        .await
        .expect("Harvest failed");

    assert_eq!(names(&outcome.table), vec!["A"]);
}
