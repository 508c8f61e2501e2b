use std::error::Error as _;
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use tracing::{debug, warn};

use crate::http::auth::apply_auth;
use crate::http::request::ApiRequest;
use crate::http::response::Response;
use crate::http::types::HttpMethod;
use crate::{CourierError, Result};

/// 每个请求固定的超时时间
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// 已经转换为线路格式、可以直接发送的请求
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    pub method: HttpMethod,
    pub url: url::Url,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
}

#[derive(Clone)]
pub struct Client {
    inner: reqwest::Client,
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

impl Client {
    pub fn new() -> Self {
        Self {
            inner: reqwest::Client::new(),
        }
    }

    pub fn with_client(inner: reqwest::Client) -> Self {
        Self { inner }
    }

    /// 把请求配置转换为线路请求，只有 URL 无法解析时失败
    pub fn prepare(request: &ApiRequest) -> Result<PreparedRequest> {
        // 1-2. URL 和 query 参数
        let url = build_url(request)?;

        // 3. 用户 headers，按顺序追加
        let mut headers = HeaderMap::new();
        for header in request.active_headers() {
            match (
                HeaderName::from_bytes(header.key.trim().as_bytes()),
                HeaderValue::from_bytes(header.value.as_bytes()),
            ) {
                (Ok(name), Ok(value)) => {
                    headers.append(name, value);
                }
                _ => warn!("Skipping invalid header: {}", header.key),
            }
        }

        // 4. 认证覆盖用户设置的 Authorization
        apply_auth(&request.credentials(), &mut headers);

        // 5. 请求体及默认 Content-Type
        let body = request.outgoing_body().map(|content| {
            if !headers.contains_key(CONTENT_TYPE)
                && let Some(mime) = request.body_type.mime_type()
            {
                headers.insert(CONTENT_TYPE, HeaderValue::from_static(mime));
            }
            content.as_bytes().to_vec()
        });

        Ok(PreparedRequest {
            method: request.method,
            url,
            headers,
            body,
        })
    }

    /// 发送请求。网络层失败以 `CourierError::Transport` 返回
    pub async fn send(&self, request: &ApiRequest) -> Result<Response> {
        let prepared = Self::prepare(request)?;
        self.dispatch(prepared).await
    }

    /// 发送请求。网络层失败折叠为状态码 0 的占位响应，
    /// URL 或响应格式错误仍然返回 Err
    pub async fn execute(&self, request: &ApiRequest) -> Result<Response> {
        match self.send(request).await {
            Err(CourierError::Transport(message)) => {
                warn!("Request to {} failed: {}", request.url, message);
                Ok(Response::transport_error(message))
            }
            other => other,
        }
    }

    async fn dispatch(&self, prepared: PreparedRequest) -> Result<Response> {
        debug!("{} {}", prepared.method, prepared.url);

        let mut req = self
            .inner
            .request(prepared.method.to_reqwest(), prepared.url)
            .headers(prepared.headers)
            .timeout(REQUEST_TIMEOUT);
        if let Some(body) = prepared.body {
            req = req.body(body);
        }

        let start = Instant::now();
        let response = req.send().await.map_err(describe)?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let bytes = response.bytes().await.map_err(describe)?;
        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

        debug!("{} in {:.1}ms ({} bytes)", status, elapsed_ms, bytes.len());
        Ok(Response::new(status, &headers, &bytes, elapsed_ms))
    }
}

/// 使用进程内共享的 Client 执行请求，语义同 [`Client::execute`]
pub async fn execute(request: &ApiRequest) -> Result<Response> {
    static CLIENT: OnceLock<Client> = OnceLock::new();
    CLIENT.get_or_init(Client::new).execute(request).await
}

/// 解析 URL 并追加启用的 query 参数，保留 URL 中已有的部分
///
/// 发送请求和生成代码共用，保证两者使用同一个规范化后的 URL。
pub fn build_url(request: &ApiRequest) -> Result<url::Url> {
    let mut url = parse_url(&request.url)?;
    let mut params = request.active_query_params().peekable();
    if params.peek().is_some() {
        let mut pairs = url.query_pairs_mut();
        for param in params {
            pairs.append_pair(&param.key, &param.value);
        }
    }
    Ok(url)
}

/// 解析 URL，没有 scheme 时默认使用 http
///
/// 支持的简写:
/// - ":3000" -> "http://localhost:3000"
/// - "localhost:3000/api" -> "http://localhost:3000/api"
pub fn parse_url(raw: &str) -> Result<url::Url> {
    if raw.trim().is_empty() {
        return Err(CourierError::InvalidUrl("empty URL".to_string()));
    }

    let url = url::Url::parse(&with_default_scheme(raw))
        .map_err(|e| CourierError::InvalidUrl(format!("{}: {}", raw, e)))?;
    if !url.has_host() {
        return Err(CourierError::InvalidUrl(format!("{}: missing host", raw)));
    }
    Ok(url)
}

/// 补全缺省的 scheme 和 host，不做其他校验
pub fn with_default_scheme(raw: &str) -> String {
    let input = raw.trim();
    if input.starts_with(':') {
        format!("http://localhost{}", input)
    } else if !input.is_empty() && !input.contains("://") {
        format!("http://{}", input)
    } else {
        input.to_string()
    }
}

/// reqwest 的错误信息只有最外层，把 source 链拼起来便于展示
fn describe(err: reqwest::Error) -> CourierError {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    match CourierError::from(err) {
        CourierError::InvalidUrl(_) => CourierError::InvalidUrl(message),
        CourierError::InvalidResponse(_) => CourierError::InvalidResponse(message),
        _ => CourierError::Transport(message),
    }
}
