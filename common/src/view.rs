//! レビュー画面の表示モデル
//!
//! 同じ項目列・メモから、形式ごとに別の表示を組み立てる。
//! 表示は読み取り専用で、編集は `OutputFormat::capture_edit` を経由して戻す。

use crate::annotation::AnnotationStore;
use crate::format::{OutputFormat, ViewKind};
use crate::types::{ConfidenceBand, Field};
use std::fmt;

/// 項目が空の場合の表示
pub const EMPTY_PLACEHOLDER: &str = "No data found in this document.";

/// コンソール表示の先頭コメント
pub const CONSOLE_HEADER: &str = "# Generated output based on OCR scan";

/// 表形式の1行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub index: usize,
    pub field: String,
    pub value: String,
    pub confidence: u8,
    pub band: ConfidenceBand,
    pub has_note: bool,
    /// この行の下書きが開いている場合はその本文
    pub draft: Option<String>,
}

/// 文書形式の1ブロック
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentBlock {
    pub index: usize,
    pub label: String,
    pub value: String,
    /// 保存済みメモ（下書き編集中は表示しない）
    pub note: Option<String>,
    pub draft: Option<String>,
}

/// コンソール形式の1行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleLine {
    pub index: usize,
    pub field: String,
    /// 引用符付きの値
    pub literal: String,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewView {
    /// 項目なし（全形式共通）
    Empty { format: OutputFormat },
    Table(Vec<TableRow>),
    Document {
        format: OutputFormat,
        blocks: Vec<DocumentBlock>,
    },
    Console(Vec<ConsoleLine>),
}

impl ReviewView {
    /// 現在の状態から表示を組み立てる
    pub fn build(format: OutputFormat, fields: &[Field], notes: &AnnotationStore) -> Self {
        if fields.is_empty() {
            return ReviewView::Empty { format };
        }

        let draft_for = |index: usize| {
            notes
                .draft()
                .filter(|d| d.index == index)
                .map(|d| d.text.clone())
        };

        match format.view_kind() {
            ViewKind::Tabular => ReviewView::Table(
                fields
                    .iter()
                    .enumerate()
                    .map(|(index, f)| TableRow {
                        index,
                        field: f.field.clone(),
                        value: f.value.clone(),
                        confidence: f.confidence,
                        band: f.band(),
                        has_note: notes.has_note(index),
                        draft: draft_for(index),
                    })
                    .collect(),
            ),
            ViewKind::Document => ReviewView::Document {
                format,
                blocks: fields
                    .iter()
                    .enumerate()
                    .map(|(index, f)| {
                        let draft = draft_for(index);
                        let note = if draft.is_some() {
                            None
                        } else {
                            notes.note(index).map(str::to_string)
                        };
                        DocumentBlock {
                            index,
                            label: f.field.clone(),
                            value: f.value.clone(),
                            note,
                            draft,
                        }
                    })
                    .collect(),
            },
            ViewKind::Console => ReviewView::Console(
                fields
                    .iter()
                    .enumerate()
                    .map(|(index, f)| ConsoleLine {
                        index,
                        field: f.field.clone(),
                        literal: format.present_value(&f.value),
                        comment: notes.note(index).map(str::to_string),
                    })
                    .collect(),
            ),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ReviewView::Empty { .. })
    }
}

impl fmt::Display for ReviewView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReviewView::Empty { format } => {
                if format.view_kind() == ViewKind::Console {
                    writeln!(f, "{}", CONSOLE_HEADER)?;
                }
                writeln!(f, "{}", EMPTY_PLACEHOLDER)
            }
            ReviewView::Table(rows) => {
                writeln!(
                    f,
                    "{:>3}  {:<20} {:<32} {:>6} {:<6}  Notes",
                    "#", "Field", "Value", "Conf.", "Band"
                )?;
                for row in rows {
                    writeln!(
                        f,
                        "{:>3}  {:<20} {:<32} {:>5}% {:<6}  {}",
                        row.index,
                        row.field,
                        row.value,
                        row.confidence,
                        row.band.label(),
                        if row.has_note { "*" } else { "" }
                    )?;
                    if let Some(draft) = &row.draft {
                        writeln!(f, "     [note draft] {}", draft)?;
                    }
                }
                Ok(())
            }
            ReviewView::Document { blocks, .. } => {
                for (i, block) in blocks.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    writeln!(f, "{}", block.label.to_uppercase())?;
                    if let Some(note) = &block.note {
                        writeln!(f, "  > {}", note)?;
                    }
                    if let Some(draft) = &block.draft {
                        writeln!(f, "  [note draft] {}", draft)?;
                    }
                    writeln!(f, "  {}", block.value)?;
                }
                Ok(())
            }
            ReviewView::Console(lines) => {
                writeln!(f, "{}", CONSOLE_HEADER)?;
                for line in lines {
                    write!(f, "{}: {}", line.field, line.literal)?;
                    if let Some(comment) = &line.comment {
                        write!(f, "  # {}", comment)?;
                    }
                    writeln!(f)?;
                }
                Ok(())
            }
        }
    }
}
