use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::http::{HttpMethod, KeyValuePair};

/// 历史记录条目，只追加不修改
///
/// 传输失败的请求没有状态码、响应头和耗时，错误信息保存在 `response_body`。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,

    /// 用户填写的 URL（不含 query 参数）
    pub url: String,
    pub method: HttpMethod,
    #[serde(default)]
    pub request_headers: Vec<KeyValuePair>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_body: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_headers: Option<Vec<KeyValuePair>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_time_ms: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_size_bytes: Option<usize>,

    pub was_successful: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_request_id: Option<Uuid>,
}
