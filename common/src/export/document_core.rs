//! 文書形式（Word/PDF）共通のレイアウト
//!
//! 両形式とも「タイトル → 生成日時 → 項目ごとのラベル・値・メモ」の
//! 同じ並びを出力する。PDF側はここで計算したページ割付をそのまま描画する。

use super::ExportRequest;
use crate::view::EMPTY_PLACEHOLDER;

/// 文書の1要素
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentLine {
    Title(String),
    Meta(String),
    Label(String),
    Value(String),
    Note(String),
    Placeholder(String),
    Spacer,
}

impl DocumentLine {
    pub fn text(&self) -> &str {
        match self {
            DocumentLine::Title(t)
            | DocumentLine::Meta(t)
            | DocumentLine::Label(t)
            | DocumentLine::Value(t)
            | DocumentLine::Note(t)
            | DocumentLine::Placeholder(t) => t,
            DocumentLine::Spacer => "",
        }
    }

    /// フォントサイズ（pt）
    pub fn font_size_pt(&self) -> f32 {
        match self {
            DocumentLine::Title(_) => 18.0,
            DocumentLine::Meta(_) | DocumentLine::Label(_) | DocumentLine::Note(_) => 9.0,
            DocumentLine::Value(_) | DocumentLine::Placeholder(_) => 12.0,
            DocumentLine::Spacer => 6.0,
        }
    }
}

/// 文書の要素列を構築
pub fn build_document_lines(request: &ExportRequest) -> Vec<DocumentLine> {
    let mut lines = vec![DocumentLine::Title(request.title.clone())];
    if !request.generated_at.is_empty() {
        lines.push(DocumentLine::Meta(format!("Generated {}", request.generated_at)));
    }
    lines.push(DocumentLine::Spacer);

    if request.fields.is_empty() {
        lines.push(DocumentLine::Placeholder(EMPTY_PLACEHOLDER.to_string()));
        return lines;
    }

    for (index, field) in request.fields.iter().enumerate() {
        lines.push(DocumentLine::Label(field.field.to_uppercase()));
        if let Some(note) = request.note(index) {
            lines.push(DocumentLine::Note(format!("Note: {}", note)));
        }
        lines.push(DocumentLine::Value(field.value.clone()));
        lines.push(DocumentLine::Spacer);
    }
    lines
}

/// A4ページのレイアウト（mm単位）
#[derive(Debug, Clone)]
pub struct PageLayout {
    pub page_width_mm: f32,
    pub page_height_mm: f32,
    pub margin_mm: f32,
    /// 1行に収める最大文字数（折り返し用）
    pub max_chars_per_line: usize,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            page_width_mm: 210.0,
            page_height_mm: 297.0,
            margin_mm: 20.0,
            max_chars_per_line: 80,
        }
    }
}

/// ページ上に配置済みの1行
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub text: String,
    pub font_size_pt: f32,
    pub bold: bool,
    /// ベースラインのY座標（下端基準, mm）
    pub y_mm: f32,
}

const PT_TO_MM: f32 = 0.352_778;
const LINE_SPACING: f32 = 1.4;

impl PageLayout {
    fn line_height_mm(font_size_pt: f32) -> f32 {
        font_size_pt * PT_TO_MM * LINE_SPACING
    }

    /// 要素列をページに割り付ける（空ページは作らないが、最低1ページは返す）
    pub fn paginate(&self, lines: &[DocumentLine]) -> Vec<Vec<PlacedLine>> {
        let top = self.page_height_mm - self.margin_mm;
        let mut pages: Vec<Vec<PlacedLine>> = vec![Vec::new()];
        let mut cursor = top;

        for line in lines {
            let size = line.font_size_pt();
            let height = Self::line_height_mm(size);
            let bold = matches!(line, DocumentLine::Title(_) | DocumentLine::Label(_));

            let wrapped = if matches!(line, DocumentLine::Spacer) {
                vec![String::new()]
            } else {
                wrap_text(line.text(), self.max_chars_per_line)
            };

            for text in wrapped {
                if cursor - height < self.margin_mm {
                    pages.push(Vec::new());
                    cursor = top;
                }
                cursor -= height;
                if !text.is_empty() {
                    if let Some(page) = pages.last_mut() {
                        page.push(PlacedLine {
                            text,
                            font_size_pt: size,
                            bold,
                            y_mm: cursor,
                        });
                    }
                }
            }
        }

        // 末尾のスペーサーだけで増えたページは捨てる
        while pages.len() > 1 && pages.last().is_some_and(Vec::is_empty) {
            pages.pop();
        }
        pages
    }
}

/// 文字数で折り返す（単語境界を優先、明示的な改行も保持）
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut out = Vec::new();

    for paragraph in text.split('\n') {
        let mut current = String::new();
        let mut current_len = 0;

        for word in paragraph.split(' ') {
            let word_len = word.chars().count();
            let sep = usize::from(current_len > 0);

            if current_len + sep + word_len <= max_chars {
                if sep == 1 {
                    current.push(' ');
                }
                current.push_str(word);
                current_len += sep + word_len;
                continue;
            }

            if current_len > 0 {
                out.push(std::mem::take(&mut current));
                current_len = 0;
            }

            // 1語が行幅を超える場合は文字単位で分割
            let mut chars = word.chars().peekable();
            while chars.peek().is_some() {
                let chunk: String = chars.by_ref().take(max_chars).collect();
                let chunk_len = chunk.chars().count();
                if chunk_len == max_chars && chars.peek().is_some() {
                    out.push(chunk);
                } else {
                    current = chunk;
                    current_len = chunk_len;
                }
            }
        }

        out.push(current);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::ExportOptions;
    use crate::format::OutputFormat;
    use crate::types::Field;
    use std::collections::BTreeMap;

    fn request(fields: &[Field]) -> ExportRequest {
        let mut notes = BTreeMap::new();
        notes.insert(0, "double-checked".to_string());
        let options = ExportOptions {
            title: "Invoice 42".to_string(),
            generated_at: "2026-01-02".to_string(),
        };
        ExportRequest::new(OutputFormat::Pdf, fields, &notes, &options)
    }

    #[test]
    fn test_document_lines_order() {
        let lines = build_document_lines(&request(&[Field::new("Name", "John", 90)]));
        assert_eq!(
            lines,
            vec![
                DocumentLine::Title("Invoice 42".to_string()),
                DocumentLine::Meta("Generated 2026-01-02".to_string()),
                DocumentLine::Spacer,
                DocumentLine::Label("NAME".to_string()),
                DocumentLine::Note("Note: double-checked".to_string()),
                DocumentLine::Value("John".to_string()),
                DocumentLine::Spacer,
            ]
        );
    }

    #[test]
    fn test_document_lines_empty_placeholder() {
        let lines = build_document_lines(&request(&[]));
        assert_eq!(
            lines.last(),
            Some(&DocumentLine::Placeholder(EMPTY_PLACEHOLDER.to_string()))
        );
    }

    #[test]
    fn test_wrap_text() {
        assert_eq!(wrap_text("aaa bbb ccc", 7), vec!["aaa bbb", "ccc"]);
        assert_eq!(wrap_text("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
        assert_eq!(wrap_text("one\ntwo", 80), vec!["one", "two"]);
        assert_eq!(wrap_text("", 10), vec![""]);
    }

    #[test]
    fn test_paginate_single_page() {
        let layout = PageLayout::default();
        let pages = layout.paginate(&build_document_lines(&request(&[Field::new("A", "1", 1)])));
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0][0].text, "Invoice 42");
        assert!(pages[0][0].bold);
        assert!(pages[0][0].y_mm > pages[0][1].y_mm);
    }

    #[test]
    fn test_paginate_overflows_to_new_pages() {
        let fields: Vec<Field> = (0..200).map(|i| Field::new(format!("F{}", i), "v", 50)).collect();
        let layout = PageLayout::default();
        let pages = layout.paginate(&build_document_lines(&request(&fields)));
        assert!(pages.len() > 1);
        for page in &pages {
            assert!(!page.is_empty());
            for line in page {
                assert!(line.y_mm >= layout.margin_mm);
            }
        }
    }
}
