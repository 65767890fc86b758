//! Scan Review Common Library
//!
//! スキャン結果レビューの中核（項目モデル・編集履歴・メモ・出力形式・エクスポート）。
//! 画面やCLIに依存しない。

pub mod annotation;
pub mod error;
pub mod export;
pub mod format;
pub mod history;
pub mod model;
pub mod parser;
pub mod surface;
pub mod types;
pub mod view;

pub use annotation::{AnnotationStore, NoteDraft};
pub use error::{Error, Result};
pub use export::{
    ExportArtifact, ExportError, ExportOptions, ExportRequest, Exporter, Notice, NoticeKind,
};
pub use format::{OutputFormat, ViewKind};
pub use history::EditHistory;
pub use model::FieldModel;
pub use parser::{extract_json, parse_model_reply, parse_scan_result};
pub use surface::ReviewSurface;
pub use types::{ChangeKind, ChangeLogEntry, ConfidenceBand, Field, ScanResult};
pub use view::ReviewView;
