use super::escape::shell_quote;
use super::{GenerationPlan, PlannedBody};
use crate::http::{ApiRequest, HttpMethod};

const CONTINUATION: &str = " \\\n  ";

/// 生成 cURL 命令，GET 省略 `-X`
///
/// 第一行是 `curl [-X M|--head] <url>`，其余选项各占一行。
/// GET 带请求体时同样省略 `-X`，此时 curl 会因 `--data-raw` 改用 POST 发送。
pub fn generate(request: &ApiRequest) -> String {
    let plan = GenerationPlan::new(request);

    let mut first = String::from("curl");
    match plan.method {
        HttpMethod::Get => {}
        // `-X HEAD` 会让 curl 等待响应体
        HttpMethod::Head => first.push_str(" --head"),
        method => first.push_str(&format!(" -X {}", method)),
    }
    first.push(' ');
    first.push_str(&shell_quote(&plan.url));

    let mut parts = vec![first];
    for (key, value) in &plan.headers {
        parts.push(format!("-H {}", shell_quote(&format!("{}: {}", key, value))));
    }

    if let Some((username, password)) = plan.basic_auth() {
        parts.push(format!(
            "-u {}",
            shell_quote(&format!("{}:{}", username, password))
        ));
    }

    if let Some(body) = &plan.body {
        let text = match body {
            PlannedBody::Json(_) => request.body_content.as_str(),
            PlannedBody::Raw(raw) => *raw,
        };
        parts.push(format!("--data-raw {}", shell_quote(text)));
    }

    let mut command = parts.join(CONTINUATION);
    command.push('\n');
    command
}
