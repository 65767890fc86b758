//! 元画像（アップロード原本）の保存
//!
//! スキャン結果の `originalImage` は Data URL かローカルパス。
//! リモートURLの取得は行わない。

use crate::error::{ReviewError, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use regex::Regex;
use std::path::{Path, PathBuf};

/// Data URL を分解した結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// MIMEタイプから拡張子を決める（不明なら bin）
pub fn extension_for_mime(mime_type: &str) -> &'static str {
    match mime_type.to_lowercase().as_str() {
        "image/jpeg" | "image/jpg" => "jpg",
        "image/png" => "png",
        "image/gif" => "gif",
        "image/webp" => "webp",
        "image/tiff" => "tiff",
        "image/bmp" => "bmp",
        "application/pdf" => "pdf",
        _ => "bin",
    }
}

/// "data:image/png;base64,...." を解析
pub fn parse_data_url(url: &str) -> Result<DataUrl> {
    lazy_static::lazy_static! {
        static ref DATA_URL_RE: Regex =
            Regex::new(r"(?s)^data:([A-Za-z0-9.+/-]*)((?:;[^;,]*)*),(.*)$").unwrap();
    }

    let caps = DATA_URL_RE
        .captures(url.trim())
        .ok_or_else(|| ReviewError::Original("Data URLの形式ではありません".into()))?;

    let mime_type = match caps.get(1).map(|m| m.as_str()) {
        Some(m) if !m.is_empty() => m.to_string(),
        _ => "text/plain".to_string(),
    };
    let is_base64 = caps
        .get(2)
        .is_some_and(|m| m.as_str().split(';').any(|p| p.eq_ignore_ascii_case("base64")));
    let payload = caps.get(3).map_or("", |m| m.as_str());

    let bytes = if is_base64 {
        let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
        STANDARD
            .decode(compact)
            .map_err(|e| ReviewError::Original(format!("Base64デコード失敗: {}", e)))?
    } else {
        payload.as_bytes().to_vec()
    };

    Ok(DataUrl { mime_type, bytes })
}

fn is_remote(source: &str) -> bool {
    let lower = source.trim_start().to_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// 元画像を `output` に保存し、保存先を返す
///
/// `output` がディレクトリ（または拡張子なし）なら `original.<ext>` を作成する。
pub fn save_original(source: &str, output: &Path) -> Result<PathBuf> {
    if source.trim().is_empty() {
        return Err(ReviewError::Original("元画像が含まれていません".into()));
    }
    if is_remote(source) {
        return Err(ReviewError::Original(format!(
            "リモートURLには対応していません: {}",
            source
        )));
    }

    if source.trim_start().starts_with("data:") {
        let data = parse_data_url(source)?;
        let file_name = format!("original.{}", extension_for_mime(&data.mime_type));
        let path = crate::export::output_path_for(output, &file_name);
        create_parent(&path)?;
        std::fs::write(&path, &data.bytes)?;
        tracing::info!(path = %path.display(), bytes = data.bytes.len(), "original saved from data url");
        return Ok(path);
    }

    let src = Path::new(source);
    if !src.exists() {
        return Err(ReviewError::FileNotFound(source.to_string()));
    }
    let file_name = src
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("original")
        .to_string();
    let path = crate::export::output_path_for(output, &file_name);
    create_parent(&path)?;
    std::fs::copy(src, &path)?;
    tracing::info!(path = %path.display(), "original copied");
    Ok(path)
}

fn create_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
