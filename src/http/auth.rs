use std::fmt;
use std::str::FromStr;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::CourierError;

/// 认证方式，序列化为界面显示用的字符串
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
pub enum AuthType {
    #[default]
    #[serde(rename = "None")]
    None,
    #[serde(rename = "Bearer Token")]
    Bearer,
    #[serde(rename = "Basic Auth")]
    Basic,
    /// 仅保存配置，不执行授权流程
    #[serde(rename = "OAuth 2.0")]
    OAuth2,
}

impl AuthType {
    pub fn display_name(&self) -> &'static str {
        match self {
            AuthType::None => "None",
            AuthType::Bearer => "Bearer Token",
            AuthType::Basic => "Basic Auth",
            AuthType::OAuth2 => "OAuth 2.0",
        }
    }
}

impl FromStr for AuthType {
    type Err = CourierError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" => Ok(AuthType::None),
            "bearer" | "bearer token" => Ok(AuthType::Bearer),
            "basic" | "basic auth" => Ok(AuthType::Basic),
            "oauth2" | "oauth 2.0" => Ok(AuthType::OAuth2),
            _ => Err(CourierError::Other(format!("Invalid auth type: {}", s))),
        }
    }
}

impl fmt::Display for AuthType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// OAuth 2.0 settings kept alongside a request. Stored and exported only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OAuthConfig {
    #[serde(default)]
    pub auth_url: String,
    #[serde(default)]
    pub token_url: String,
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    #[serde(default)]
    pub scope: String,
    #[serde(default)]
    pub redirect_uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

/// Auth settings resolved against the selected [`AuthType`].
///
/// Only the variants that actually produce an `Authorization` header exist;
/// incomplete credentials and OAuth 2.0 resolve to [`Credentials::None`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Credentials<'a> {
    None,
    Bearer(&'a str),
    Basic { username: &'a str, password: &'a str },
}

impl<'a> Credentials<'a> {
    pub fn resolve(
        auth_type: AuthType,
        bearer_token: Option<&'a str>,
        basic_username: Option<&'a str>,
        basic_password: Option<&'a str>,
    ) -> Self {
        match auth_type {
            AuthType::None | AuthType::OAuth2 => Credentials::None,
            AuthType::Bearer => match bearer_token {
                Some(token) if !token.is_empty() => Credentials::Bearer(token),
                _ => Credentials::None,
            },
            AuthType::Basic => match (basic_username, basic_password) {
                (Some(username), Some(password)) => Credentials::Basic { username, password },
                _ => Credentials::None,
            },
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Credentials::None)
    }

    /// `Authorization` 头的值
    pub fn header_value(&self) -> Option<String> {
        match self {
            Credentials::None => None,
            Credentials::Bearer(token) => Some(format!("Bearer {}", token)),
            Credentials::Basic { username, password } => Some(format!(
                "Basic {}",
                STANDARD.encode(format!("{}:{}", username, password))
            )),
        }
    }
}

/// 将认证信息写入请求头，覆盖已有的 Authorization
///
/// 凭据不完整时不做任何修改，也不报错
pub fn apply_auth(credentials: &Credentials<'_>, headers: &mut HeaderMap) {
    let Some(value) = credentials.header_value() else {
        return;
    };
    match HeaderValue::from_bytes(value.as_bytes()) {
        Ok(value) => {
            headers.insert(AUTHORIZATION, value);
        }
        Err(e) => warn!("Skipping Authorization header with invalid value: {}", e),
    }
}
