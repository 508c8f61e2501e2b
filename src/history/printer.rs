use super::model::HistoryEntry;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, Table};

/// 历史记录表格，最新的在最上面
pub fn render_history(entries: &[HistoryEntry]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["ID", "Time", "Method", "URL", "Status", "Duration", "Size"]);

    for entry in entries.iter().rev() {
        let id = entry.id.simple().to_string();
        let status = match entry.status_code {
            Some(code) => Cell::new(code).fg(if entry.was_successful {
                Color::Green
            } else {
                Color::Red
            }),
            None => Cell::new("failed").fg(Color::Red),
        };

        table.add_row(vec![
            Cell::new(&id[..8]),
            Cell::new(entry.timestamp.format("%m-%d %H:%M:%S")),
            Cell::new(entry.method),
            Cell::new(&entry.url).add_attribute(Attribute::Dim),
            status,
            Cell::new(
                entry
                    .response_time_ms
                    .map_or_else(|| "-".to_string(), |ms| format!("{:.0}ms", ms)),
            ),
            Cell::new(
                entry
                    .response_size_bytes
                    .map_or_else(|| "-".to_string(), |b| format!("{} B", b)),
            ),
        ]);
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::build_entry;
    use crate::http::{ApiRequest, HttpMethod, Response};
    use reqwest::header::HeaderMap;

    #[test]
    fn test_render_newest_first() {
        let first = build_entry(
            &ApiRequest::new("a", HttpMethod::Get, "https://first.test"),
            &Response::new(200, &HeaderMap::new(), b"ok", 5.0),
        );
        let second = build_entry(
            &ApiRequest::new("b", HttpMethod::Delete, "https://second.test"),
            &Response::transport_error("refused".to_string()),
        );

        let rendered = render_history(&[first, second]).to_string();
        let first_pos = rendered.find("first.test").unwrap();
        let second_pos = rendered.find("second.test").unwrap();
        assert!(second_pos < first_pos);
        assert!(rendered.contains("DELETE"));
        assert!(rendered.contains("failed"));
        assert!(rendered.contains("5ms"));
    }
}
