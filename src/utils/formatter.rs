use crate::http::Response;
use crate::utils::json::format_json;
use colored::*;

/// 短响应体直接展示的长度上限
const COMPACT_BODY_LIMIT: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    Compact,
    Verbose,
}

pub struct ResponseFormatter {
    format: ResponseFormat,
    color: bool,
}

impl ResponseFormatter {
    pub fn new(format: ResponseFormat) -> Self {
        Self {
            format,
            color: true,
        }
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn format(&self, response: &Response) -> String {
        let mut output = vec![self.status_line(response), self.timing_line(response)];

        if self.format == ResponseFormat::Verbose && !response.headers.is_empty() {
            output.push(String::new());
            output.push(self.paint("Headers:", |s| s.blue().bold()));
            for header in &response.headers {
                output.push(self.paint(&format!("   {}: {}", header.key, header.value), |s| {
                    s.blue()
                }));
            }
        }

        if let Some(body) = self.body_section(response) {
            output.push(String::new());
            output.push(body);
        }

        output.join("\n")
    }

    fn status_line(&self, response: &Response) -> String {
        let line = if response.is_transport_failure() {
            "Request failed".to_string()
        } else {
            format!("HTTP {}", response.status)
        };
        let bold = self.format == ResponseFormat::Verbose;
        self.paint(&line, |s| {
            let s = if response.is_success() {
                s.green()
            } else if response.is_client_error() {
                s.yellow()
            } else {
                s.red()
            };
            if bold { s.bold() } else { s }
        })
    }

    fn timing_line(&self, response: &Response) -> String {
        let line = format!(
            "Time: {:.0}ms  Size: {} bytes",
            response.response_time_ms,
            response.size_bytes()
        );
        self.paint(&line, |s| s.cyan())
    }

    fn body_section(&self, response: &Response) -> Option<String> {
        let Some(body) = response.body.as_deref() else {
            return Some("<binary body>".to_string());
        };
        if body.is_empty() {
            return None;
        }
        // 尝试格式化 JSON，失败则显示原始内容
        let pretty = format_json(body).unwrap_or_else(|| body.to_string());
        match self.format {
            ResponseFormat::Compact if body.len() >= COMPACT_BODY_LIMIT => {
                Some(format!("Body: {} bytes", body.len()))
            }
            _ => Some(pretty),
        }
    }

    fn paint(&self, text: &str, style: impl FnOnce(&str) -> ColoredString) -> String {
        if self.color {
            style(text).to_string()
        } else {
            text.to_string()
        }
    }
}
