use thiserror::Error;

#[derive(Error, Debug)]
pub enum CourierError {
    #[error("无效的 URL: {0}")]
    InvalidUrl(String),

    #[error("无效的响应: {0}")]
    InvalidResponse(String),

    #[error("网络错误: {0}")]
    Transport(String),

    #[error("导入失败: {0}")]
    ImportDecode(String),

    #[error("导出失败: {0}")]
    ExportEncode(String),

    #[error("未找到: {0}")]
    NotFound(String),

    #[error("配置错误: {0}")]
    Config(String),

    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON 解析错误: {0}")]
    Json(#[from] serde_json::Error),

    #[error("URL 解析错误: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for CourierError {
    fn from(err: anyhow::Error) -> Self {
        CourierError::Other(err.to_string())
    }
}

/// reqwest 错误按阶段归类：构建失败视为 URL 问题，解码失败视为响应问题，其余为网络错误
impl From<reqwest::Error> for CourierError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            CourierError::InvalidUrl(err.to_string())
        } else if err.is_decode() || err.is_body() {
            CourierError::InvalidResponse(err.to_string())
        } else {
            CourierError::Transport(err.to_string())
        }
    }
}

/// Result type for courier crate
pub type Result<T> = std::result::Result<T, CourierError>;
