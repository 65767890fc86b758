//! プレーンテキスト出力
//!
//! コンソール表示と同じ `field: "value"` 形式。メモは行末コメントとして付ける。

use super::ExportRequest;
use crate::format::OutputFormat;
use crate::view::{CONSOLE_HEADER, EMPTY_PLACEHOLDER};

/// テキストを生成
pub fn render_text(request: &ExportRequest) -> String {
    let mut out = String::new();
    out.push_str(CONSOLE_HEADER);
    out.push('\n');
    if !request.generated_at.is_empty() {
        out.push_str("# ");
        out.push_str(&request.generated_at);
        out.push('\n');
    }
    out.push('\n');

    if request.fields.is_empty() {
        out.push_str("# ");
        out.push_str(EMPTY_PLACEHOLDER);
        out.push('\n');
        return out;
    }

    for (index, field) in request.fields.iter().enumerate() {
        out.push_str(&field.field);
        out.push_str(": ");
        out.push_str(&OutputFormat::Text.present_value(&single_line(&field.value)));
        if let Some(note) = request.note(index) {
            out.push_str("  # ");
            out.push_str(&single_line(note));
        }
        out.push('\n');
    }
    out
}

/// 改行を含む値・メモでも1項目1行に収める
fn single_line(text: &str) -> String {
    text.replace("\r\n", " ").replace(['\r', '\n'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::ExportOptions;
    use crate::types::Field;
    use std::collections::BTreeMap;

    fn options() -> ExportOptions {
        ExportOptions {
            title: "scan".to_string(),
            generated_at: "2026-01-02T03:04:05+00:00".to_string(),
        }
    }

    #[test]
    fn test_render_text_with_notes() {
        let fields = vec![Field::new("Name", "John Doe", 98), Field::new("Date", "2026-01-02", 95)];
        let mut notes = BTreeMap::new();
        notes.insert(1, "written as 2/1\non the form".to_string());
        let request = ExportRequest::new(OutputFormat::Text, &fields, &notes, &options());

        assert_eq!(
            render_text(&request),
            "# Generated output based on OCR scan\n\
             # 2026-01-02T03:04:05+00:00\n\
             \n\
             Name: \"John Doe\"\n\
             Date: \"2026-01-02\"  # written as 2/1 on the form\n"
        );
    }

    #[test]
    fn test_render_text_multiline_value_stays_on_one_line() {
        let fields = vec![
            Field::new("Address", "1 Main St\r\nSpringfield\n", 80),
            Field::new("City", "Springfield", 90),
        ];
        let mut notes = BTreeMap::new();
        notes.insert(0, "two lines on the form".to_string());
        let request = ExportRequest::new(OutputFormat::Text, &fields, &notes, &options());
        let text = render_text(&request);

        assert!(text.contains("Address: \"1 Main St Springfield \"  # two lines on the form\n"));
        assert!(text.ends_with("City: \"Springfield\"\n"));
        assert_eq!(text.lines().filter(|l| l.starts_with("Address")).count(), 1);
    }

    #[test]
    fn test_render_text_empty() {
        let request = ExportRequest::new(OutputFormat::Text, &[], &BTreeMap::new(), &options());
        let text = render_text(&request);
        assert!(text.ends_with("# No data found in this document.\n"));
    }

    #[test]
    fn test_render_text_is_deterministic() {
        let fields = vec![Field::new("A", "1", 10)];
        let request = ExportRequest::new(OutputFormat::Text, &fields, &BTreeMap::new(), &options());
        assert_eq!(render_text(&request), render_text(&request.clone()));
    }
}
