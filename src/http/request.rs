use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::http::auth::{AuthType, Credentials, OAuthConfig};
use crate::http::types::{BodyType, HttpMethod, KeyValuePair, active_pairs};

/// 一个完整的 HTTP 请求配置
///
/// `url` 原样保存，其中的 `{{var}}` 占位符不会被替换
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiRequest {
    pub id: Uuid,
    pub name: String,
    pub url: String,
    pub method: HttpMethod,
    #[serde(default)]
    pub headers: Vec<KeyValuePair>,
    #[serde(default)]
    pub query_params: Vec<KeyValuePair>,
    #[serde(default)]
    pub body_type: BodyType,
    #[serde(default)]
    pub body_content: String,
    #[serde(default)]
    pub auth_type: AuthType,
    #[serde(default)]
    pub auth_bearer_token: Option<String>,
    #[serde(default)]
    pub auth_basic_username: Option<String>,
    #[serde(default)]
    pub auth_basic_password: Option<String>,
    #[serde(default)]
    pub auth_oauth_config: Option<OAuthConfig>,
    /// 所属文件夹（弱引用，由 workspace 维护）
    #[serde(default)]
    pub folder_id: Option<Uuid>,
    #[serde(default)]
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ApiRequest {
    pub fn new(name: impl Into<String>, method: HttpMethod, url: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            url: url.into(),
            method,
            headers: Vec::new(),
            query_params: Vec::new(),
            body_type: BodyType::None,
            body_content: String::new(),
            auth_type: AuthType::None,
            auth_bearer_token: None,
            auth_basic_username: None,
            auth_basic_password: None,
            auth_oauth_config: None,
            folder_id: None,
            sort_order: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.push(KeyValuePair::new(key, value));
        self
    }

    pub fn with_query(mut self, key: &str, value: &str) -> Self {
        self.query_params.push(KeyValuePair::new(key, value));
        self
    }

    pub fn with_body(mut self, body_type: BodyType, content: &str) -> Self {
        self.body_type = body_type;
        self.body_content = content.to_owned();
        self
    }

    pub fn with_json(self, content: &str) -> Self {
        self.with_body(BodyType::Json, content)
    }

    pub fn with_auth_bearer(mut self, token: &str) -> Self {
        self.auth_type = AuthType::Bearer;
        self.auth_bearer_token = Some(token.to_owned());
        self
    }

    pub fn with_auth_basic(mut self, username: &str, password: &str) -> Self {
        self.auth_type = AuthType::Basic;
        self.auth_basic_username = Some(username.to_owned());
        self.auth_basic_password = Some(password.to_owned());
        self
    }

    pub fn active_headers(&self) -> impl Iterator<Item = &KeyValuePair> {
        active_pairs(&self.headers)
    }

    pub fn active_query_params(&self) -> impl Iterator<Item = &KeyValuePair> {
        active_pairs(&self.query_params)
    }

    /// 实际发送的请求体：类型不为 None 且内容非空
    pub fn outgoing_body(&self) -> Option<&str> {
        if self.body_type == BodyType::None || self.body_content.is_empty() {
            None
        } else {
            Some(&self.body_content)
        }
    }

    pub fn credentials(&self) -> Credentials<'_> {
        Credentials::resolve(
            self.auth_type,
            self.auth_bearer_token.as_deref(),
            self.auth_basic_username.as_deref(),
            self.auth_basic_password.as_deref(),
        )
    }

    /// 是否有启用的 Content-Type 头（不区分大小写）
    pub fn has_content_type_header(&self) -> bool {
        self.active_headers()
            .any(|h| h.key.eq_ignore_ascii_case("content-type"))
    }

    /// Copy with fresh identities for the request and every pair.
    pub fn duplicate(&self, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            headers: self.headers.iter().map(KeyValuePair::duplicate).collect(),
            query_params: self
                .query_params
                .iter()
                .map(KeyValuePair::duplicate)
                .collect(),
            created_at: now,
            updated_at: now,
            ..self.clone()
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
