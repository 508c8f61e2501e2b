//! 把请求配置渲染为可直接运行的代码片段
//!
//! 三个生成器共享 [`GenerationPlan`]：启用的 headers/query、认证覆盖、
//! 默认 Content-Type 以及 JSON 请求体的解析都在这里完成一次，
//! 各语言只负责拼接模板和转义。

pub mod curl;
pub mod escape;
pub mod python;
pub mod swift;

use std::fmt;
use std::str::FromStr;

use serde_json::Value;
use url::form_urlencoded::byte_serialize;

use crate::CourierError;
use crate::http::client::{build_url, with_default_scheme};
use crate::http::{ApiRequest, BodyType, Credentials, HttpMethod, KeyValuePair};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodeLanguage {
    Curl,
    Swift,
    Python,
}

impl CodeLanguage {
    pub const ALL: [CodeLanguage; 3] = [
        CodeLanguage::Curl,
        CodeLanguage::Swift,
        CodeLanguage::Python,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            CodeLanguage::Curl => "cURL",
            CodeLanguage::Swift => "Swift",
            CodeLanguage::Python => "Python",
        }
    }

    pub fn file_extension(&self) -> &'static str {
        match self {
            CodeLanguage::Curl => "sh",
            CodeLanguage::Swift => "swift",
            CodeLanguage::Python => "py",
        }
    }

    pub fn generate(&self, request: &ApiRequest) -> String {
        match self {
            CodeLanguage::Curl => curl::generate(request),
            CodeLanguage::Swift => swift::generate(request),
            CodeLanguage::Python => python::generate(request),
        }
    }
}

impl FromStr for CodeLanguage {
    type Err = CourierError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "curl" | "shell" | "sh" => Ok(CodeLanguage::Curl),
            "swift" | "urlsession" => Ok(CodeLanguage::Swift),
            "python" | "py" | "requests" => Ok(CodeLanguage::Python),
            _ => Err(CourierError::Other(format!("Unsupported language: {}", s))),
        }
    }
}

impl fmt::Display for CodeLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

pub fn generate_curl(request: &ApiRequest) -> String {
    curl::generate(request)
}

pub fn generate_swift(request: &ApiRequest) -> String {
    swift::generate(request)
}

pub fn generate_python(request: &ApiRequest) -> String {
    python::generate(request)
}

/// 请求体在生成代码中的形态
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum PlannedBody<'a> {
    /// JSON 解析成功，用目标语言的字面量重建
    Json(Value),
    /// 其他类型，或 JSON 解析失败时原样作为字符串
    Raw(&'a str),
}

/// Everything a generator needs, resolved once from the request.
#[derive(Debug, Clone)]
pub(crate) struct GenerationPlan<'a> {
    pub method: HttpMethod,
    /// URL with scheme filled in and active query params appended.
    pub url: String,
    /// Headers in emission order, `Authorization` already resolved for Bearer.
    pub headers: Vec<(String, String)>,
    /// Only `Basic` remains for the generator to render idiomatically.
    pub credentials: Credentials<'a>,
    pub body: Option<PlannedBody<'a>>,
}

impl<'a> GenerationPlan<'a> {
    pub fn new(request: &'a ApiRequest) -> Self {
        let credentials = request.credentials();
        let auth_wins = !credentials.is_none();

        let mut headers: Vec<(String, String)> = request
            .active_headers()
            .filter(|h| !(auth_wins && h.key.eq_ignore_ascii_case("authorization")))
            .map(|h| (h.key.clone(), h.value.clone()))
            .collect();

        if let Credentials::Bearer(_) = credentials
            && let Some(value) = credentials.header_value()
        {
            headers.push(("Authorization".to_string(), value));
        }

        let body = request.outgoing_body().map(|content| {
            if request.body_type == BodyType::Json
                && let Ok(value) = serde_json::from_str::<Value>(content)
            {
                PlannedBody::Json(value)
            } else {
                PlannedBody::Raw(content)
            }
        });

        if body.is_some()
            && !request.has_content_type_header()
            && let Some(mime) = request.body_type.mime_type()
        {
            headers.push(("Content-Type".to_string(), mime.to_string()));
        }

        Self {
            method: request.method,
            url: match build_url(request) {
                Ok(url) => url.to_string(),
                // 无法解析的 URL 仍然生成代码，按原文拼接
                Err(_) => url_with_query(&request.url, request.active_query_params()),
            },
            headers,
            credentials: match credentials {
                Credentials::Basic { .. } => credentials,
                _ => Credentials::None,
            },
            body,
        }
    }

    pub fn basic_auth(&self) -> Option<(&'a str, &'a str)> {
        match self.credentials {
            Credentials::Basic { username, password } => Some((username, password)),
            _ => None,
        }
    }
}

/// 把 query 参数编码后拼到原始 URL 上（位于 `#fragment` 之前）
pub(crate) fn url_with_query<'p>(
    raw: &str,
    params: impl Iterator<Item = &'p KeyValuePair>,
) -> String {
    let url = with_default_scheme(raw);
    let query = params
        .map(|p| format!("{}={}", encode(&p.key), encode(&p.value)))
        .collect::<Vec<_>>()
        .join("&");
    if query.is_empty() {
        return url;
    }

    let (base, fragment) = match url.split_once('#') {
        Some((base, fragment)) => (base, Some(fragment)),
        None => (url.as_str(), None),
    };
    let separator = match base.find('?') {
        None => "?",
        Some(_) if base.ends_with('?') || base.ends_with('&') => "",
        Some(_) => "&",
    };

    let mut out = format!("{}{}{}", base, separator, query);
    if let Some(fragment) = fragment {
        out.push('#');
        out.push_str(fragment);
    }
    out
}

fn encode(s: &str) -> String {
    byte_serialize(s.as_bytes()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> ApiRequest {
        ApiRequest::new("test", HttpMethod::Post, "https://api.example.com/users")
    }

    #[test]
    fn test_url_with_query() {
        let params = [
            KeyValuePair::new("page", "1"),
            KeyValuePair::disabled("limit", "10"),
            KeyValuePair::new("q", "a b"),
        ];
        let active = params.iter().filter(|p| p.is_active());
        assert_eq!(
            url_with_query("https://x.dev/api", active),
            "https://x.dev/api?page=1&q=a+b"
        );
    }

    #[test]
    fn test_url_with_existing_query_and_fragment() {
        let params = [KeyValuePair::new("b", "2")];
        assert_eq!(
            url_with_query("https://x.dev/api?a=1#top", params.iter()),
            "https://x.dev/api?a=1&b=2#top"
        );
    }

    #[test]
    fn test_url_without_scheme_gets_http() {
        assert_eq!(
            url_with_query("localhost:3000/api", std::iter::empty()),
            "http://localhost:3000/api"
        );
    }

    #[test]
    fn test_plan_url_matches_wire_url() {
        let req = ApiRequest::new("r", HttpMethod::Get, "https://example.com/a b/ü")
            .with_query("x", "1 2");
        let plan = GenerationPlan::new(&req);
        let prepared = crate::http::Client::prepare(&req).unwrap();
        assert_eq!(plan.url, prepared.url.as_str());
        assert_eq!(plan.url, "https://example.com/a%20b/%C3%BC?x=1+2");
    }

    #[test]
    fn test_plan_url_falls_back_when_unparsable() {
        let req = ApiRequest::new("r", HttpMethod::Get, "http://").with_query("a", "1");
        assert_eq!(GenerationPlan::new(&req).url, "http://?a=1");
    }

    #[test]
    fn test_plan_drops_explicit_authorization_for_bearer() {
        let req = request()
            .with_header("Authorization", "Token old")
            .with_auth_bearer("new");
        let plan = GenerationPlan::new(&req);
        let auth: Vec<_> = plan
            .headers
            .iter()
            .filter(|(k, _)| k.eq_ignore_ascii_case("authorization"))
            .collect();
        assert_eq!(auth.len(), 1);
        assert_eq!(auth[0].1, "Bearer new");
        assert_eq!(plan.basic_auth(), None);
    }

    #[test]
    fn test_plan_keeps_authorization_without_auth() {
        let req = request().with_header("Authorization", "Token mine");
        let plan = GenerationPlan::new(&req);
        assert_eq!(
            plan.headers,
            vec![("Authorization".to_string(), "Token mine".to_string())]
        );
    }

    #[test]
    fn test_plan_basic_auth() {
        let req = request()
            .with_header("authorization", "stale")
            .with_auth_basic("u", "p");
        let plan = GenerationPlan::new(&req);
        assert!(plan.headers.is_empty());
        assert_eq!(plan.basic_auth(), Some(("u", "p")));
    }

    #[test]
    fn test_plan_synthesizes_content_type() {
        let req = request().with_json(r#"{"a":1}"#);
        let plan = GenerationPlan::new(&req);
        assert_eq!(
            plan.headers,
            vec![("Content-Type".to_string(), "application/json".to_string())]
        );
        assert!(matches!(plan.body, Some(PlannedBody::Json(_))));
    }

    #[test]
    fn test_plan_respects_explicit_content_type() {
        let req = request()
            .with_header("content-type", "application/hal+json")
            .with_json("{}");
        let plan = GenerationPlan::new(&req);
        assert_eq!(plan.headers.len(), 1);
        assert_eq!(plan.headers[0].1, "application/hal+json");
    }

    #[test]
    fn test_plan_invalid_json_degrades_to_raw() {
        let req = request().with_json("{not json");
        let plan = GenerationPlan::new(&req);
        assert_eq!(plan.body, Some(PlannedBody::Raw("{not json")));
    }

    #[test]
    fn test_plan_no_body_no_content_type() {
        let req = request().with_json("");
        let plan = GenerationPlan::new(&req);
        assert!(plan.body.is_none());
        assert!(plan.headers.is_empty());
    }

    #[test]
    fn test_language_parse() {
        assert_eq!("cURL".parse::<CodeLanguage>().unwrap(), CodeLanguage::Curl);
        assert_eq!("py".parse::<CodeLanguage>().unwrap(), CodeLanguage::Python);
        assert!("cobol".parse::<CodeLanguage>().is_err());
    }
}
