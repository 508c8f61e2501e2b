use courier::config::HistoryConfig;
use courier::history::{HistoryStorage, build_entry, record_history};
use courier::http::{ApiRequest, Client, HttpMethod};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_history_recording() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/history-test"))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "status": "created"
        })))
        .mount(&mock_server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let storage = HistoryStorage::new_with_path(temp_dir.path().join("history.jsonl"));

    let url = format!("{}/history-test", mock_server.uri());
    let request = ApiRequest::new("Create", HttpMethod::Post, url.clone())
        .with_header("X-Trace", "1")
        .with_json(r#"{"test": "data"}"#);

    let response = Client::new().execute(&request).await.unwrap();
    assert_eq!(response.status_code(), 201);
    record_history(&storage, &build_entry(&request, &response));

    let entries = storage.list().unwrap();
    assert_eq!(entries.len(), 1);
    let entry = &entries[0];
    assert_eq!(entry.url, url);
    assert_eq!(entry.method, HttpMethod::Post);
    assert_eq!(entry.status_code, Some(201));
    assert_eq!(entry.request_body.as_deref(), Some(r#"{"test": "data"}"#));
    assert_eq!(entry.request_headers[0].key, "X-Trace");
    assert!(entry.response_body.as_deref().unwrap().contains("created"));
    assert!(entry.was_successful);
    assert_eq!(entry.saved_request_id, Some(request.id));

    // 每行一个 JSON 对象，字段为 snake_case
    let raw = std::fs::read_to_string(storage.path()).unwrap();
    assert_eq!(raw.lines().count(), 1);
    assert!(raw.contains("\"was_successful\":true"));
    assert!(raw.contains("\"status_code\":201"));
}

#[tokio::test]
async fn test_failed_request_is_recorded() {
    let temp_dir = TempDir::new().unwrap();
    let storage = HistoryStorage::new_with_path(temp_dir.path().join("history.jsonl"));

    let request = ApiRequest::new("down", HttpMethod::Get, "http://127.0.0.1:1/");
    let response = Client::new().execute(&request).await.unwrap();
    record_history(&storage, &build_entry(&request, &response));

    let entry = storage.list().unwrap().remove(0);
    assert_eq!(entry.status_code, None);
    assert_eq!(entry.response_time_ms, None);
    assert!(!entry.was_successful);
    assert!(!entry.response_body.unwrap_or_default().is_empty());
}

#[test]
fn test_history_dir_env_override() {
    let temp_dir = TempDir::new().unwrap();
    // 本文件中只有这个测试读取环境变量
    unsafe {
        std::env::set_var("COURIER_HISTORY_DIR", temp_dir.path());
    }

    let config = HistoryConfig {
        dir: Some("ignored".into()),
        ..HistoryConfig::default()
    };
    let storage = HistoryStorage::from_config(&config);
    assert_eq!(storage.path(), temp_dir.path().join("history.jsonl"));

    unsafe {
        std::env::remove_var("COURIER_HISTORY_DIR");
    }
}
