//! APIレスポンスパーサー
//!
//! 抽出バックエンドの応答からJSONを取り出し、ScanResultに変換する

use crate::error::{Error, Result};
use crate::types::{clamp_confidence, ChangeKind, ChangeLogEntry, Field, ScanResult};
use regex::Regex;
use serde::Deserialize;

/// AI応答からJSONオブジェクト部分を抽出
///
/// 抽出優先順位:
/// 1. ```json ... ``` ブロック
/// 2. 最初の `{` から最後の `}` まで
/// 3. エラー
///
/// # Examples
/// ```
/// use scan_review_common::extract_json;
///
/// let reply = "Here you go: {\"fields\": []} done";
/// assert_eq!(extract_json(reply).unwrap(), "{\"fields\": []}");
/// ```
pub fn extract_json(response: &str) -> Result<&str> {
    lazy_static::lazy_static! {
        static ref FENCED_RE: Regex = Regex::new(r"(?s)```json\s*(.*?)```").unwrap();
        static ref OBJECT_RE: Regex = Regex::new(r"(?s)\{.*\}").unwrap();
    }

    if let Some(block) = FENCED_RE.captures(response).and_then(|c| c.get(1)) {
        return Ok(block.as_str().trim());
    }

    if let Some(object) = OBJECT_RE.find(response) {
        return Ok(object.as_str());
    }

    Err(Error::Parse("JSONが見つかりません".into()))
}

/// シリアライズ済みのScanResultをパース
pub fn parse_scan_result(json: &str) -> Result<ScanResult> {
    let result: ScanResult = serde_json::from_str(json.trim())?;
    tracing::debug!(
        fields = result.refined_data.len(),
        changes = result.change_log.len(),
        "parsed scan result"
    );
    Ok(result)
}

/// モデル応答の生の形
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ModelReply {
    fields: Vec<ModelField>,
    explanation: String,
    formatting_changes: Vec<ModelChange>,
    overall_confidence: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct ModelField {
    field: String,
    value: String,
    confidence: Option<f64>,
}

impl Default for ModelField {
    fn default() -> Self {
        Self {
            field: "Unknown".to_string(),
            value: String::new(),
            confidence: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ModelChange {
    #[serde(rename = "type")]
    kind: ChangeKind,
    message: String,
}

/// AIモデルの応答テキストをScanResultに変換
///
/// JSONが見つからない・壊れている場合も失敗させず、
/// 応答テキストを説明文にした空の結果を返す。
pub fn parse_model_reply(original_image: &str, text: &str) -> ScanResult {
    let reply = extract_json(text)
        .ok()
        .and_then(|json| serde_json::from_str::<ModelReply>(json).ok())
        .or_else(|| serde_json::from_str::<ModelReply>(text.trim()).ok());

    let Some(reply) = reply else {
        tracing::warn!("model reply had no usable JSON, falling back to an empty result");
        return ScanResult {
            original_image: original_image.to_string(),
            ai_explanation: text.to_string(),
            ..Default::default()
        };
    };

    let refined_data: Vec<Field> = reply
        .fields
        .into_iter()
        .map(|f| Field {
            field: f.field,
            value: f.value,
            confidence: clamp_confidence(f.confidence.unwrap_or(0.0)),
        })
        .collect();

    // 項目がある場合は各項目の平均を全体の信頼度とする
    let overall_confidence = if refined_data.is_empty() {
        clamp_confidence(reply.overall_confidence.unwrap_or(0.0))
    } else {
        let sum: f64 = refined_data.iter().map(|f| f64::from(f.confidence)).sum();
        clamp_confidence(sum / refined_data.len() as f64)
    };

    let change_log = reply
        .formatting_changes
        .into_iter()
        .map(|c| ChangeLogEntry {
            kind: c.kind,
            message: c.message,
        })
        .collect();

    ScanResult {
        original_image: original_image.to_string(),
        refined_data,
        ai_explanation: reply.explanation,
        change_log,
        overall_confidence,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_json_fenced_block() {
        let response = "結果です\n```json\n{\"fields\": []}\n```\n以上";
        assert_eq!(extract_json(response).unwrap(), "{\"fields\": []}");
    }

    #[test]
    fn test_extract_json_bare_object() {
        let response = "prefix {\"a\": {\"b\": 1}} suffix";
        assert_eq!(extract_json(response).unwrap(), "{\"a\": {\"b\": 1}}");
    }

    #[test]
    fn test_extract_json_missing() {
        let result = extract_json("no json here");
        assert!(matches!(result, Err(Error::Parse(_))));
    }

    #[test]
    fn test_parse_scan_result_invalid() {
        let result = parse_scan_result("[1, 2");
        assert!(matches!(result, Err(Error::Json(_))));
    }

    #[test]
    fn test_parse_model_reply_averages_confidence() {
        let text = r#"```json
        {
          "fields": [
            {"field": "Name", "value": "John Doe", "confidence": 98},
            {"field": "Date", "value": "2026-01-02", "confidence": 91}
          ],
          "explanation": "Two fields found",
          "formatting_changes": [{"type": "correction", "message": "Jon -> John"}],
          "overall_confidence": 10
        }
        ```"#;
        let result = parse_model_reply("file.jpg", text);
        assert_eq!(result.original_image, "file.jpg");
        assert_eq!(result.refined_data.len(), 2);
        assert_eq!(result.overall_confidence, 95);
        assert_eq!(result.change_log[0].kind, ChangeKind::Correction);
        assert_eq!(result.ai_explanation, "Two fields found");
    }

    #[test]
    fn test_parse_model_reply_field_defaults() {
        let text = r#"{"fields": [{}], "formatting_changes": [{"message": "m"}], "overall_confidence": 40}"#;
        let result = parse_model_reply("", text);
        assert_eq!(result.refined_data, vec![Field::new("Unknown", "", 0)]);
        assert_eq!(result.change_log[0].kind, ChangeKind::Formatting);
        assert_eq!(result.overall_confidence, 0);
    }

    #[test]
    fn test_parse_model_reply_no_fields_uses_reported_confidence() {
        let result = parse_model_reply("", r#"{"fields": [], "overall_confidence": 42.4}"#);
        assert!(result.refined_data.is_empty());
        assert_eq!(result.overall_confidence, 42);
    }

    #[test]
    fn test_parse_model_reply_fallback() {
        let result = parse_model_reply("img.png", "I could not read this document.");
        assert!(result.refined_data.is_empty());
        assert_eq!(result.ai_explanation, "I could not read this document.");
        assert_eq!(result.overall_confidence, 0);
    }
}
