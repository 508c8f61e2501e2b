use serde_json::Value;

use super::escape::python_string;
use super::{GenerationPlan, PlannedBody};
use crate::http::ApiRequest;
use crate::http::client::REQUEST_TIMEOUT;

const INDENT: &str = "    ";

/// 生成基于 `requests` 的 Python 脚本
pub fn generate(request: &ApiRequest) -> String {
    let plan = GenerationPlan::new(request);
    let mut code = String::from("import requests\n\n");
    let mut arguments = vec![python_string(plan.method.as_str()), "url".to_string()];

    code.push_str(&format!("url = {}\n", python_string(&plan.url)));

    if !plan.headers.is_empty() {
        code.push_str("\nheaders = {\n");
        for (key, value) in &plan.headers {
            code.push_str(&format!(
                "{}{}: {},\n",
                INDENT,
                python_string(key),
                python_string(value)
            ));
        }
        code.push_str("}\n");
        arguments.push("headers=headers".to_string());
    }

    match &plan.body {
        // requests 把 json=None 当作没有请求体，null 按原文发送
        Some(PlannedBody::Json(Value::Null)) => {
            code.push_str(&format!(
                "\npayload = {}\n",
                python_string(&request.body_content)
            ));
            arguments.push("data=payload.encode(\"utf-8\")".to_string());
        }
        Some(PlannedBody::Json(value)) => {
            code.push_str(&format!("\npayload = {}\n", literal(value, 0)));
            arguments.push("json=payload".to_string());
        }
        Some(PlannedBody::Raw(raw)) => {
            code.push_str(&format!("\npayload = {}\n", python_string(raw)));
            arguments.push("data=payload.encode(\"utf-8\")".to_string());
        }
        None => {}
    }

    if let Some((username, password)) = plan.basic_auth() {
        arguments.push(format!(
            "auth=({}, {})",
            python_string(username),
            python_string(password)
        ));
    }
    arguments.push(format!("timeout={}", REQUEST_TIMEOUT.as_secs()));

    code.push_str("\nresponse = requests.request(\n");
    for argument in &arguments {
        code.push_str(&format!("{}{},\n", INDENT, argument));
    }
    code.push_str(")\n\n");
    code.push_str("print(response.status_code)\n");
    code.push_str("print(response.text)\n");
    code
}

/// JSON 值转为 Python 字面量（dict / list / True / None ...）
fn literal(value: &Value, depth: usize) -> String {
    match value {
        Value::Null => "None".to_string(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => python_string(s),
        Value::Array(items) if items.is_empty() => "[]".to_string(),
        Value::Array(items) => {
            let inner = INDENT.repeat(depth + 1);
            let body: Vec<String> = items
                .iter()
                .map(|item| format!("{}{}", inner, literal(item, depth + 1)))
                .collect();
            format!("[\n{},\n{}]", body.join(",\n"), INDENT.repeat(depth))
        }
        Value::Object(map) if map.is_empty() => "{}".to_string(),
        Value::Object(map) => {
            let inner = INDENT.repeat(depth + 1);
            let body: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{}{}: {}", inner, python_string(k), literal(v, depth + 1)))
                .collect();
            format!("{{\n{},\n{}}}", body.join(",\n"), INDENT.repeat(depth))
        }
    }
}
