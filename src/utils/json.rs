//! JSON 显示辅助函数。无效输入返回 None，由调用方原样展示

use serde_json::{Map, Value};

/// 格式化为两空格缩进、key 有序的 JSON
pub fn format_json(input: &str) -> Option<String> {
    let value: Value = serde_json::from_str(input).ok()?;
    serde_json::to_string_pretty(&sort_keys(value)).ok()
}

/// 压缩为单行 JSON
pub fn minify_json(input: &str) -> Option<String> {
    let value: Value = serde_json::from_str(input).ok()?;
    serde_json::to_string(&sort_keys(value)).ok()
}

/// 与 `format_json` 判定一致：超出 f64 范围的数字同样无效
pub fn is_valid_json(input: &str) -> bool {
    serde_json::from_str::<Value>(input).is_ok()
}

/// Recursively rebuilds every object with its keys in lexicographic order.
pub fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            let sorted: Map<String, Value> = entries
                .into_iter()
                .map(|(k, v)| (k, sort_keys(v)))
                .collect();
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}
