use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::http::{ApiRequest, AuthType, BodyType, HttpMethod, KeyValuePair, OAuthConfig};

/// 当前导出格式版本
pub const FORMAT_VERSION: &str = "1.0";

/// 导出文件的顶层结构
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportContainer {
    pub version: String,
    #[serde(with = "iso8601")]
    pub export_date: DateTime<Utc>,
    pub folder: ExportedFolder,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportedFolder {
    pub name: String,
    #[serde(default)]
    pub requests: Vec<ExportableRequest>,
}

/// 请求配置去掉 id、所属文件夹和时间戳后的投影
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportableRequest {
    pub name: String,
    pub url: String,
    pub method: HttpMethod,
    #[serde(default)]
    pub headers: Vec<ExportableKeyValue>,
    #[serde(default)]
    pub query_params: Vec<ExportableKeyValue>,
    #[serde(default)]
    pub body_type: BodyType,
    #[serde(default)]
    pub body_content: String,
    #[serde(default)]
    pub authentication_type: AuthType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_bearer_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_basic_username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_basic_password: Option<String>,
    #[serde(
        rename = "authOAuthConfig",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub auth_oauth_config: Option<OAuthConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportableKeyValue {
    pub key: String,
    #[serde(default)]
    pub value: String,
    #[serde(default = "enabled_by_default")]
    pub is_enabled: bool,
}

fn enabled_by_default() -> bool {
    true
}

impl From<&KeyValuePair> for ExportableKeyValue {
    fn from(pair: &KeyValuePair) -> Self {
        Self {
            key: pair.key.clone(),
            value: pair.value.clone(),
            is_enabled: pair.is_enabled,
        }
    }
}

impl From<ExportableKeyValue> for KeyValuePair {
    fn from(pair: ExportableKeyValue) -> Self {
        let mut kv = KeyValuePair::new(pair.key, pair.value);
        kv.is_enabled = pair.is_enabled;
        kv
    }
}

impl From<&ApiRequest> for ExportableRequest {
    fn from(request: &ApiRequest) -> Self {
        Self {
            name: request.name.clone(),
            url: request.url.clone(),
            method: request.method,
            headers: request.headers.iter().map(Into::into).collect(),
            query_params: request.query_params.iter().map(Into::into).collect(),
            body_type: request.body_type,
            body_content: request.body_content.clone(),
            authentication_type: request.auth_type,
            auth_bearer_token: request.auth_bearer_token.clone(),
            auth_basic_username: request.auth_basic_username.clone(),
            auth_basic_password: request.auth_basic_password.clone(),
            auth_oauth_config: request.auth_oauth_config.clone(),
        }
    }
}

impl ExportableRequest {
    /// 生成新的请求对象（新 id，不继承文档中的任何标识）
    pub fn into_request(self, sort_order: i32) -> ApiRequest {
        let mut request = ApiRequest::new(self.name, self.method, self.url);
        request.headers = self.headers.into_iter().map(Into::into).collect();
        request.query_params = self.query_params.into_iter().map(Into::into).collect();
        request.body_type = self.body_type;
        request.body_content = self.body_content;
        request.auth_type = self.authentication_type;
        request.auth_bearer_token = self.auth_bearer_token;
        request.auth_basic_username = self.auth_basic_username;
        request.auth_basic_password = self.auth_basic_password;
        request.auth_oauth_config = self.auth_oauth_config;
        request.sort_order = sort_order;
        request
    }
}

/// ISO-8601 UTC timestamps with second precision, e.g. `2024-05-01T10:00:00Z`.
mod iso8601 {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.to_rfc3339_opts(SecondsFormat::Secs, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|d| d.with_timezone(&Utc))
            .map_err(de::Error::custom)
    }
}
