use serde_json::{Number, Value};

use super::escape::swift_string;
use super::{GenerationPlan, PlannedBody};
use crate::http::ApiRequest;
use crate::http::client::REQUEST_TIMEOUT;

const INDENT: &str = "    ";

const PRELUDE: &str = r#"import Foundation
#if canImport(FoundationNetworking)
import FoundationNetworking
#endif
"#;

// 命令行脚本需要等待回调完成
const SEND_AND_WAIT: &str = r#"let semaphore = DispatchSemaphore(value: 0)
let task = URLSession.shared.dataTask(with: request) { data, response, error in
    defer { semaphore.signal() }
    if let error = error {
        print("Error: \(error)")
        return
    }
    if let httpResponse = response as? HTTPURLResponse {
        print("Status: \(httpResponse.statusCode)")
    }
    if let data = data, let body = String(data: data, encoding: .utf8) {
        print(body)
    }
}
task.resume()
semaphore.wait()
"#;

/// 生成基于 URLSession 的 Swift 脚本
pub fn generate(request: &ApiRequest) -> String {
    let plan = GenerationPlan::new(request);
    let mut code = String::from(PRELUDE);

    code.push_str(&format!(
        "\nvar request = URLRequest(url: URL(string: {})!, timeoutInterval: {})\n",
        swift_string(&plan.url),
        REQUEST_TIMEOUT.as_secs()
    ));
    code.push_str(&format!(
        "request.httpMethod = {}\n",
        swift_string(plan.method.as_str())
    ));
    for (key, value) in &plan.headers {
        code.push_str(&format!(
            "request.setValue({}, forHTTPHeaderField: {})\n",
            swift_string(value),
            swift_string(key)
        ));
    }

    if let Some((username, password)) = plan.basic_auth() {
        code.push_str(&format!(
            "\nlet credentials = Data({}.utf8).base64EncodedString()\n",
            swift_string(&format!("{}:{}", username, password))
        ));
        code.push_str(
            "request.setValue(\"Basic \\(credentials)\", forHTTPHeaderField: \"Authorization\")\n",
        );
    }

    match &plan.body {
        Some(PlannedBody::Json(value @ (Value::Object(_) | Value::Array(_)))) => {
            let annotation = match value {
                Value::Object(_) => "[String: Any]",
                _ => "[Any]",
            };
            code.push_str(&format!(
                "\nlet parameters: {} = {}\n",
                annotation,
                top_level_literal(value)
            ));
            code.push_str(
                "request.httpBody = try! JSONSerialization.data(withJSONObject: parameters)\n",
            );
        }
        // JSONSerialization 不接受顶层标量，按原文发送
        Some(PlannedBody::Json(_)) => {
            push_raw_body(&mut code, &request.body_content);
        }
        Some(PlannedBody::Raw(raw)) => push_raw_body(&mut code, raw),
        None => {}
    }

    code.push('\n');
    code.push_str(SEND_AND_WAIT);
    code
}

fn push_raw_body(code: &mut String, raw: &str) {
    code.push_str(&format!(
        "\nrequest.httpBody = Data({}.utf8)\n",
        swift_string(raw)
    ));
}

/// 顶层容器由变量的类型注解确定类型
fn top_level_literal(value: &Value) -> String {
    match value {
        Value::Object(map) if map.is_empty() => "[:]".to_string(),
        Value::Array(items) if items.is_empty() => "[]".to_string(),
        Value::Object(map) => dictionary(map, 0),
        Value::Array(items) => array(items, 0),
        scalar => literal(scalar, 0),
    }
}

/// 嵌套的容器放在 `Any` 上下文里，需要显式 `as` 才能推断
fn literal(value: &Value, depth: usize) -> String {
    match value {
        Value::Null => "NSNull()".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => number(n),
        Value::String(s) => swift_string(s),
        Value::Array(items) if items.is_empty() => "[Any]()".to_string(),
        Value::Array(items) => format!("{} as [Any]", array(items, depth)),
        Value::Object(map) if map.is_empty() => "[String: Any]()".to_string(),
        Value::Object(map) => format!("{} as [String: Any]", dictionary(map, depth)),
    }
}

fn array(items: &[Value], depth: usize) -> String {
    let inner = INDENT.repeat(depth + 1);
    let body: Vec<String> = items
        .iter()
        .map(|item| format!("{}{}", inner, literal(item, depth + 1)))
        .collect();
    format!("[\n{},\n{}]", body.join(",\n"), INDENT.repeat(depth))
}

fn dictionary(map: &serde_json::Map<String, Value>, depth: usize) -> String {
    let inner = INDENT.repeat(depth + 1);
    let body: Vec<String> = map
        .iter()
        .map(|(k, v)| format!("{}{}: {}", inner, swift_string(k), literal(v, depth + 1)))
        .collect();
    format!("[\n{},\n{}]", body.join(",\n"), INDENT.repeat(depth))
}

/// 超出 Int 范围的整数按 Double 输出，否则字面量会溢出
fn number(n: &Number) -> String {
    if n.is_u64() && n.as_i64().is_none() {
        format!("{:?}", n.as_f64().unwrap_or(f64::MAX))
    } else {
        n.to_string()
    }
}
