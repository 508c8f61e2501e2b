use chrono::Utc;
use courier::history::{HistoryEntry, HistoryStorage};
use courier::http::HttpMethod;
use std::collections::HashSet;
use std::thread;
use tempfile::TempDir;
use uuid::Uuid;

fn dummy_entry(url: String) -> HistoryEntry {
    HistoryEntry {
        id: Uuid::new_v4(),
        timestamp: Utc::now(),
        url,
        method: HttpMethod::Get,
        request_headers: Vec::new(),
        request_body: None,
        status_code: Some(200),
        response_headers: Some(Vec::new()),
        response_body: Some("{}".to_string()),
        response_time_ms: Some(3.0),
        response_size_bytes: Some(2),
        was_successful: true,
        saved_request_id: None,
    }
}

#[test]
fn test_concurrent_writes() {
    let temp_dir = TempDir::new().unwrap();
    let history_file = temp_dir.path().join("history.jsonl");

    let thread_count = 10;
    let entries_per_thread = 50;

    // 每个线程独立创建 storage，模拟多个进程
    let handles: Vec<_> = (0..thread_count)
        .map(|i| {
            let path = history_file.clone();
            thread::spawn(move || {
                let storage = HistoryStorage::new_with_path(path);
                for j in 0..entries_per_thread {
                    storage
                        .append(&dummy_entry(format!("https://example.com/{}/{}", i, j)))
                        .unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let entries = HistoryStorage::new_with_path(history_file).list().unwrap();
    assert_eq!(entries.len(), thread_count * entries_per_thread);

    let unique: HashSet<_> = entries.iter().map(|e| e.url.as_str()).collect();
    assert_eq!(unique.len(), entries.len());
}
