//! Integration tests for FortuneFetcher using wiremock
//!
//! These tests validate the HTTP fetcher's behavior with mock servers.

mod common;

use flate2::write::GzEncoder;
use flate2::Compression;
use fortune_cache::config::FetcherConfig;
use fortune_cache::crawler::{FortuneFetcher, PageSource};
use fortune_cache::error::FetchError;
use std::io::Write;
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fetcher(max_retries: u32) -> FortuneFetcher {
    let config = FetcherConfig {
        max_retries,
        requests_per_second: 100,
        ..FetcherConfig::default()
    };
    FortuneFetcher::new(&config)
        .unwrap()
        .with_base_delay(Duration::from_millis(10))
}

/// Test successful fetch from mock server
#[tokio::test]
async fn test_fetch_success() {
    let mock_server = MockServer::start().await;
    let html = common::detail_page(5, "今日");

    Mock::given(method("GET"))
        .and(path("/bloodtype_today_a.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string(html))
        .mount(&mock_server)
        .await;

    let url = format!("{}/bloodtype_today_a.html", mock_server.uri());
    let result = fetcher(0).fetch(&url).await;

    assert!(result.is_ok(), "Fetch should succeed: {:?}", result.err());
    assert!(result.unwrap().contains("rank05.png"));
}

/// Test that the configured User-Agent is sent
#[tokio::test]
async fn test_sends_browser_user_agent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ua"))
        .and(header("user-agent", "fortune-test/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = FetcherConfig {
        user_agent: "fortune-test/1.0".to_string(),
        ..FetcherConfig::default()
    };
    let fetcher = FortuneFetcher::new(&config).unwrap();
    let body = fetcher
        .fetch_text(&format!("{}/ua", mock_server.uri()))
        .await
        .unwrap();

    assert_eq!(body, "ok");
}

/// Test gzip body served without Content-Encoding is inflated
#[tokio::test]
async fn test_gzip_body_without_content_encoding() {
    let mock_server = MockServer::start().await;

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all("{\"horoscope\": {}}".as_bytes()).unwrap();
    let gzipped = encoder.finish().unwrap();

    Mock::given(method("GET"))
        .and(path("/api/horoscope/free/2024/01/01"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(gzipped))
        .mount(&mock_server)
        .await;

    let url = format!("{}/api/horoscope/free/2024/01/01", mock_server.uri());
    let body = fetcher(0).fetch_text(&url).await.unwrap();

    assert_eq!(body, "{\"horoscope\": {}}");
}

/// Test that server errors trigger retries
#[tokio::test]
async fn test_server_error_retry() {
    let mock_server = MockServer::start().await;

    // Return 503 twice, then succeed
    Mock::given(method("GET"))
        .and(path("/test"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/test"))
        .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
        .mount(&mock_server)
        .await;

    let result = fetcher(2)
        .fetch_text(&format!("{}/test", mock_server.uri()))
        .await;

    assert_eq!(result.unwrap(), "OK");
}

/// Test 404 does not retry
#[tokio::test]
async fn test_404_no_retry() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/notfound"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1) // Should only be called once (no retry)
        .mount(&mock_server)
        .await;

    let result = fetcher(3)
        .fetch_text(&format!("{}/notfound", mock_server.uri()))
        .await;

    assert!(matches!(result, Err(FetchError::ServerError(404))));
}

/// Test retries run out on a persistent 500
#[tokio::test]
async fn test_max_retries_exceeded() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/down"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3) // first attempt plus two retries
        .mount(&mock_server)
        .await;

    let result = fetcher(2)
        .fetch_text(&format!("{}/down", mock_server.uri()))
        .await;

    assert!(matches!(result, Err(FetchError::MaxRetriesExceeded)));
}

/// Test that without retries the status itself is reported
#[tokio::test]
async fn test_no_retries_reports_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/busy"))
        .respond_with(ResponseTemplate::new(429))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = fetcher(0)
        .fetch_text(&format!("{}/busy", mock_server.uri()))
        .await;

    assert!(matches!(result, Err(FetchError::ServerError(429))));
}

/// Test request timeout is reported as a fetch failure
#[tokio::test]
async fn test_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&mock_server)
        .await;

    let config = FetcherConfig {
        request_timeout_secs: 1,
        max_retries: 0,
        ..FetcherConfig::default()
    };
    let fetcher = FortuneFetcher::new(&config).unwrap();
    let result = fetcher
        .fetch_text(&format!("{}/slow", mock_server.uri()))
        .await;

    assert!(matches!(result, Err(FetchError::Timeout)));
}
