//! End-to-end tests: GraphClient + run_export against a local HTTP server

use std::time::Duration;

use libigexport::config::ApiConfig;
use libigexport::service::{run_export, ExportOptions};
use libigexport::source::graph::GraphClient;
use libigexport::{ExportError, FetchError};
use secrecy::SecretString;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn record_json(id: &str, shortcode: &str, day: u32) -> String {
    format!(
        r#"{{"id": "{id}_17841400000000000", "permalink": "https://www.instagram.com/p/{shortcode}/", "timestamp": "2024-05-{day:02}T09:00:00+0000", "media_type": "IMAGE", "media_url": "https://cdn.example.com/{id}.jpg"}}"#
    )
}

fn page_json(records: &[String], next: Option<String>) -> String {
    let paging = match next {
        Some(url) => format!(r#", "paging": {{"next": "{}"}}"#, url),
        None => String::new(),
    };
    format!(r#"{{"data": [{}]{}}}"#, records.join(","), paging)
}

async fn client_for(server: &MockServer) -> (GraphClient, String) {
    let api = ApiConfig {
        base_url: server.uri(),
        page_delay_ms: 0,
        ..ApiConfig::default()
    };
    let client = GraphClient::new(&api).unwrap();
    let token = SecretString::from("tok".to_string());
    let seed = client.seed_url("42", &token).unwrap();
    (client, seed)
}

#[tokio::test]
async fn test_three_pages_until_next_is_absent() {
    let server = MockServer::start().await;
    let uri = server.uri();

    Mock::given(method("GET"))
        .and(path("/v22.0/42/media"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page_json(
            &[record_json("1", "A1", 1), record_json("2", "A2", 2)],
            Some(format!("{}/page/2", uri)),
        )))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/page/2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page_json(
            &[record_json("3", "A3", 3)],
            Some(format!("{}/page/3", uri)),
        )))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/page/3"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(page_json(&[record_json("4", "A4", 4)], None)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (client, seed) = client_for(&server).await;
    let temp_dir = TempDir::new().unwrap();
    let options = ExportOptions::new(temp_dir.path(), Duration::ZERO);

    let summary = run_export(&client, seed, &options).await;

    assert_eq!(summary.pages, 3);
    assert_eq!(summary.written, 4);
    assert!(summary.is_complete());
    for (day, id, shortcode) in [(1, "1", "A1"), (2, "2", "A2"), (3, "3", "A3"), (4, "4", "A4")] {
        let file = temp_dir.path().join(format!("2024-05-{:02}-{}.md", day, id));
        let content = std::fs::read_to_string(&file).unwrap();
        assert!(content.contains(&format!("shortcode: {}\n", shortcode)));
        assert!(content.contains(&format!("instagram_id: {}\n", id)));
    }
}

#[tokio::test]
async fn test_server_error_on_page_two_of_three() {
    let server = MockServer::start().await;
    let uri = server.uri();

    Mock::given(method("GET"))
        .and(path("/v22.0/42/media"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page_json(
            &[record_json("1", "A1", 1), record_json("2", "A2", 2)],
            Some(format!("{}/page/2", uri)),
        )))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/page/2"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream unavailable"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/page/3"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page_json(&[record_json("4", "A4", 4)], None)))
        .expect(0)
        .mount(&server)
        .await;

    let (client, seed) = client_for(&server).await;
    let temp_dir = TempDir::new().unwrap();
    let options = ExportOptions::new(temp_dir.path(), Duration::ZERO);

    let summary = run_export(&client, seed, &options).await;

    assert_eq!(summary.written, 2);
    assert_eq!(summary.pages, 1);
    match &summary.stopped_by {
        Some(ExportError::Fetch(FetchError::Status { status, body })) => {
            assert_eq!(*status, 500);
            assert_eq!(body, "upstream unavailable");
        }
        other => panic!("Expected a status error, got {:?}", other),
    }
    assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 2);
}

#[tokio::test]
async fn test_malformed_body_stops_run() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"data": "not a list"}"#))
        .mount(&server)
        .await;

    let (client, seed) = client_for(&server).await;
    let temp_dir = TempDir::new().unwrap();
    let options = ExportOptions::new(temp_dir.path(), Duration::ZERO);

    let summary = run_export(&client, seed, &options).await;

    assert_eq!(summary.written, 0);
    assert!(matches!(
        summary.stopped_by,
        Some(ExportError::Fetch(FetchError::Decode(_)))
    ));
}

#[tokio::test]
async fn test_null_timestamp_does_not_stop_run() {
    let server = MockServer::start().await;
    let body = format!(
        r#"{{"data": [{{"id": "9_1", "permalink": "https://www.instagram.com/p/NUL/", "timestamp": null}}, {}]}}"#,
        record_json("2", "A2", 2)
    );
    Mock::given(method("GET"))
        .and(path("/v22.0/42/media"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(1)
        .mount(&server)
        .await;

    let (client, seed) = client_for(&server).await;
    let temp_dir = TempDir::new().unwrap();
    let options = ExportOptions::new(temp_dir.path(), Duration::ZERO);

    let summary = run_export(&client, seed, &options).await;

    assert!(summary.is_complete());
    assert_eq!(summary.written, 2);
    assert!(temp_dir.path().join("2024-05-02-2.md").exists());
    assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 2);
}
