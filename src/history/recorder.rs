use crate::history::model::HistoryEntry;
use crate::history::storage::HistoryStorage;
use crate::http::{ApiRequest, Response};
use chrono::Utc;
use tracing::warn;
use uuid::Uuid;

/// 由请求配置和响应生成历史条目（不做任何 IO）
pub fn build_entry(request: &ApiRequest, response: &Response) -> HistoryEntry {
    let failed = response.is_transport_failure();

    HistoryEntry {
        id: Uuid::new_v4(),
        timestamp: Utc::now(),
        url: request.url.clone(),
        method: request.method,
        request_headers: request.active_headers().cloned().collect(),
        request_body: request.outgoing_body().map(str::to_string),
        status_code: (!failed).then(|| response.status_code()),
        response_headers: (!failed).then(|| response.headers.clone()),
        response_body: response.body.clone(),
        response_time_ms: (!failed).then_some(response.response_time_ms),
        response_size_bytes: (!failed).then(|| response.size_bytes()),
        was_successful: response.is_success(),
        saved_request_id: Some(request.id),
    }
}

/// 记录请求历史
///
/// Best-effort：写入失败只打印警告，不影响请求结果。
pub fn record_history(storage: &HistoryStorage, entry: &HistoryEntry) {
    if let Err(e) = storage.append(entry) {
        warn!("Failed to save request history: {}", e);
    }
}
