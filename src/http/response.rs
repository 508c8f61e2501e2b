use crate::http::types::{KeyValuePair, Status};
use reqwest::header::HeaderMap;

/// 规范化后的响应，构造后不再修改
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: Status,
    pub headers: Vec<KeyValuePair>,
    /// 非 UTF-8 的响应体为 None
    pub body: Option<String>,
    pub response_time_ms: f64,
    pub content_type: Option<String>,
}

impl Response {
    pub fn new(status: u16, headers: &HeaderMap, bytes: &[u8], response_time_ms: f64) -> Self {
        let headers: Vec<KeyValuePair> = headers
            .iter()
            .map(|(name, value)| {
                KeyValuePair::new(name.as_str(), String::from_utf8_lossy(value.as_bytes()))
            })
            .collect();
        let content_type = headers
            .iter()
            .find(|h| h.key.eq_ignore_ascii_case("content-type"))
            .map(|h| h.value.clone());

        Self {
            status: Status::new(status),
            headers,
            body: String::from_utf8(bytes.to_vec()).ok(),
            response_time_ms,
            content_type,
        }
    }

    /// 传输失败时的占位响应：状态码 0，body 为错误描述
    pub fn transport_error(message: String) -> Self {
        Self {
            status: Status::TRANSPORT_FAILURE,
            headers: Vec::new(),
            body: Some(message),
            response_time_ms: 0.0,
            content_type: None,
        }
    }

    pub fn status_code(&self) -> u16 {
        self.status.code()
    }

    pub fn status_text(&self) -> &'static str {
        self.status.reason_phrase()
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn is_client_error(&self) -> bool {
        self.status.is_client_error()
    }

    pub fn is_transport_failure(&self) -> bool {
        self.status.is_transport_failure()
    }

    pub fn text(&self) -> &str {
        self.body.as_deref().unwrap_or_default()
    }

    pub fn size_bytes(&self) -> usize {
        self.body.as_ref().map_or(0, String::len)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|h| h.key.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
    }
}
