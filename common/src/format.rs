//! 出力形式（表示・エクスポート形式）の選択

use serde::{Deserialize, Serialize};
use std::fmt;

/// 出力形式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Excel,
    Word,
    Pdf,
    Text,
}

/// 形式ごとの表示の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    /// 表形式（入力欄）
    Tabular,
    /// 文書形式（contentEditable相当の自由入力）
    Document,
    /// コンソール形式（引用符付きリテラル）
    Console,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 4] = [
        OutputFormat::Excel,
        OutputFormat::Word,
        OutputFormat::Pdf,
        OutputFormat::Text,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            OutputFormat::Excel => "excel",
            OutputFormat::Word => "word",
            OutputFormat::Pdf => "pdf",
            OutputFormat::Text => "text",
        }
    }

    /// 画面表示名
    pub fn display_name(&self) -> &'static str {
        match self {
            OutputFormat::Excel => "Excel (.xlsx)",
            OutputFormat::Word => "Word (.docx)",
            OutputFormat::Pdf => "PDF Document",
            OutputFormat::Text => "Plain Text",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Excel => "xlsx",
            OutputFormat::Word => "docx",
            OutputFormat::Pdf => "pdf",
            OutputFormat::Text => "txt",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            OutputFormat::Excel => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            OutputFormat::Word => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            OutputFormat::Pdf => "application/pdf",
            OutputFormat::Text => "text/plain; charset=utf-8",
        }
    }

    /// Word と PDF は同じ文書形式の表示を共有する
    pub fn view_kind(&self) -> ViewKind {
        match self {
            OutputFormat::Excel => ViewKind::Tabular,
            OutputFormat::Word | OutputFormat::Pdf => ViewKind::Document,
            OutputFormat::Text => ViewKind::Console,
        }
    }

    /// 表示上の入力を保存用の値に変換
    pub fn capture_edit(&self, raw: &str) -> String {
        self.view_kind().capture_edit(raw)
    }

    /// 値を入力欄に表示する形へ変換
    pub fn present_value(&self, value: &str) -> String {
        self.view_kind().present_value(value)
    }
}

impl ViewKind {
    pub fn capture_edit(&self, raw: &str) -> String {
        match self {
            ViewKind::Tabular => raw.to_string(),
            ViewKind::Document => raw.trim_end_matches(['\r', '\n']).to_string(),
            ViewKind::Console => {
                let inner = raw.strip_prefix('"').unwrap_or(raw);
                inner.strip_suffix('"').unwrap_or(inner).to_string()
            }
        }
    }

    pub fn present_value(&self, value: &str) -> String {
        match self {
            ViewKind::Tabular | ViewKind::Document => value.to_string(),
            ViewKind::Console => format!("\"{}\"", value),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "excel" | "xlsx" => Ok(OutputFormat::Excel),
            "word" | "docx" => Ok(OutputFormat::Word),
            "pdf" => Ok(OutputFormat::Pdf),
            "text" | "txt" | "plain" => Ok(OutputFormat::Text),
            _ => Err(format!(
                "Unknown format: {}. Use excel, word, pdf, or text",
                s
            )),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_aliases() {
        assert_eq!("xlsx".parse::<OutputFormat>().unwrap(), OutputFormat::Excel);
        assert_eq!("DOCX".parse::<OutputFormat>().unwrap(), OutputFormat::Word);
        assert_eq!("pdf".parse::<OutputFormat>().unwrap(), OutputFormat::Pdf);
        assert_eq!("plain".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert!("csv".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_word_and_pdf_share_document_view() {
        assert_eq!(OutputFormat::Word.view_kind(), ViewKind::Document);
        assert_eq!(OutputFormat::Pdf.view_kind(), ViewKind::Document);
        assert_eq!(OutputFormat::Excel.view_kind(), ViewKind::Tabular);
        assert_eq!(OutputFormat::Text.view_kind(), ViewKind::Console);
    }

    #[test]
    fn test_console_capture_strips_one_quote_each_side() {
        let format = OutputFormat::Text;
        assert_eq!(format.capture_edit("\"John Doe\""), "John Doe");
        assert_eq!(format.capture_edit("\"John Doe"), "John Doe");
        assert_eq!(format.capture_edit("John Doe\""), "John Doe");
        assert_eq!(format.capture_edit("\"\"quoted\"\""), "\"quoted\"");
        assert_eq!(format.capture_edit("\"\""), "");
    }

    #[test]
    fn test_console_round_trip_does_not_leak_quotes() {
        let format = OutputFormat::Text;
        for value in ["plain", "", "\"already quoted\"", "a \" b"] {
            let shown = format.present_value(value);
            assert_eq!(format.capture_edit(&shown), value);
        }
    }

    #[test]
    fn test_document_capture_drops_trailing_newlines() {
        assert_eq!(OutputFormat::Word.capture_edit("line one\nline two\n\n"), "line one\nline two");
        assert_eq!(OutputFormat::Pdf.capture_edit("value\r\n"), "value");
    }

    #[test]
    fn test_tabular_capture_is_verbatim() {
        assert_eq!(OutputFormat::Excel.capture_edit(" \"x\" \n"), " \"x\" \n");
    }

    #[test]
    fn test_display_names() {
        let names: Vec<&str> = OutputFormat::ALL.iter().map(|f| f.display_name()).collect();
        assert_eq!(names, vec!["Excel (.xlsx)", "Word (.docx)", "PDF Document", "Plain Text"]);
    }
}
