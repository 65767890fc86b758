//! Export core shared by the CLI wrappers.
//!
//! エクスポートは「トリガー時点の項目列とメモのスナップショット」を
//! 形式ごとのエンコーダに渡して成果物（バイト列）を得る処理として扱う。

pub mod document_core;
pub mod text_core;

#[cfg(feature = "excel")]
pub mod excel_core;

use crate::format::OutputFormat;
use crate::types::Field;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use thiserror::Error;

/// エクスポートエラー
///
/// どのエラーも項目・履歴・メモには影響しない。
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Export already in progress")]
    InProgress,

    #[error("{format} encoding failed: {message}")]
    Encoding {
        format: OutputFormat,
        message: String,
    },

    #[error("{0} export is not available in this build")]
    Unsupported(OutputFormat),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExportError {
    pub fn encoding(format: OutputFormat, message: impl Into<String>) -> Self {
        ExportError::Encoding {
            format,
            message: message.into(),
        }
    }
}

/// 呼び出し側が指定するエクスポート設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    /// 文書タイトル（ファイル名にも使用）
    pub title: String,
    /// 生成日時の表記（呼び出し側で決める。同じ値なら同じ出力になる）
    pub generated_at: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            title: "scan-review".to_string(),
            generated_at: String::new(),
        }
    }
}

/// エンコーダに渡すスナップショット
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRequest {
    pub format: OutputFormat,
    pub title: String,
    pub generated_at: String,
    pub fields: Vec<Field>,
    pub notes: BTreeMap<usize, String>,
}

impl ExportRequest {
    pub fn new(
        format: OutputFormat,
        fields: &[Field],
        notes: &BTreeMap<usize, String>,
        options: &ExportOptions,
    ) -> Self {
        Self {
            format,
            title: options.title.clone(),
            generated_at: options.generated_at.clone(),
            fields: fields.to_vec(),
            notes: notes.clone(),
        }
    }

    pub fn note(&self, index: usize) -> Option<&str> {
        self.notes.get(&index).map(String::as_str)
    }

    /// 保存用ファイル名（タイトル + 拡張子）
    pub fn file_name(&self) -> String {
        format!("{}.{}", sanitize_file_stem(&self.title), self.format.extension())
    }
}

/// エクスポート成果物
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub format: OutputFormat,
    pub file_name: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
    /// バイト列のSHA-256（16進）
    pub sha256: String,
}

impl ExportArtifact {
    pub fn new(request: &ExportRequest, bytes: Vec<u8>) -> Self {
        let sha256 = hex::encode(Sha256::digest(&bytes));
        Self {
            format: request.format,
            file_name: request.file_name(),
            mime_type: request.format.mime_type(),
            bytes,
            sha256,
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// xlsxのバイト列（`excel` 機能なしのビルドでは `Unsupported`）
#[cfg(feature = "excel")]
pub fn excel_buffer(request: &ExportRequest) -> Result<Vec<u8>, ExportError> {
    excel_core::generate_excel_buffer(request)
}

#[cfg(not(feature = "excel"))]
pub fn excel_buffer(request: &ExportRequest) -> Result<Vec<u8>, ExportError> {
    Err(ExportError::Unsupported(request.format))
}

/// 形式ごとのエンコード処理
pub trait Exporter {
    fn export(&self, request: &ExportRequest) -> Result<ExportArtifact, ExportError>;
}

/// 通知の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// 閉じられる通知（トースト相当）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub description: String,
}

impl Notice {
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            title: title.into(),
            description: description.into(),
        }
    }
}

fn sanitize_file_stem(title: &str) -> String {
    let stem: String = title
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    if stem.is_empty() {
        "export".to_string()
    } else {
        stem
    }
}
