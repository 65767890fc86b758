//! スキャン結果の型定義
//!
//! AI/OCRバックエンドから受け取る結果と、レビュー画面が編集する項目:
//! - Field: 抽出された1項目（ラベル・値・信頼度）
//! - ChangeLogEntry: AIが行った整形・訂正の記録
//! - ScanResult: バックエンドから届く結果一式（読み取り専用）

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// 抽出項目
///
/// 同一性は並び順の位置で決まる（IDは持たない）。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Field {
    /// 項目名（作成後は変更しない）
    pub field: String,

    /// 値（ユーザー編集対象）
    pub value: String,

    /// 信頼度 0-100（ソースから一度だけ設定）
    #[serde(deserialize_with = "deserialize_confidence")]
    pub confidence: u8,
}

impl Field {
    pub fn new(field: impl Into<String>, value: impl Into<String>, confidence: u8) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
            confidence: confidence.min(100),
        }
    }

    pub fn band(&self) -> ConfidenceBand {
        ConfidenceBand::from_score(self.confidence)
    }
}

/// 信頼度の区分（表示色の切り替えに使用）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceBand {
    /// 90以上
    High,
    /// 70以上
    Medium,
    /// 70未満
    Low,
}

impl ConfidenceBand {
    pub fn from_score(score: u8) -> Self {
        if score >= 90 {
            ConfidenceBand::High
        } else if score >= 70 {
            ConfidenceBand::Medium
        } else {
            ConfidenceBand::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ConfidenceBand::High => "high",
            ConfidenceBand::Medium => "medium",
            ConfidenceBand::Low => "low",
        }
    }
}

/// 変更ログの種別
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    #[default]
    Formatting,
    Correction,
    Structure,
    /// 未知の種別（バックエンド側の追加に備える）
    #[serde(other)]
    Other,
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeKind::Formatting => write!(f, "formatting"),
            ChangeKind::Correction => write!(f, "correction"),
            ChangeKind::Structure => write!(f, "structure"),
            ChangeKind::Other => write!(f, "other"),
        }
    }
}

/// 変更ログ1件
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChangeLogEntry {
    #[serde(rename = "type")]
    pub kind: ChangeKind,
    pub message: String,
}

/// AI解析結果一式
///
/// フロント側の形式（camelCase）とバックエンドのレスポンス形式
/// （`original_image_url` など）のどちらでも読める。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScanResult {
    /// 元画像のURI
    #[serde(alias = "original_image_url")]
    pub original_image: String,

    /// 抽出項目（順序付き）
    #[serde(alias = "refined_data")]
    pub refined_data: Vec<Field>,

    /// AIによる処理説明
    #[serde(alias = "ai_explanation")]
    pub ai_explanation: String,

    /// 変更ログ
    #[serde(alias = "formatting_changes")]
    pub change_log: Vec<ChangeLogEntry>,

    /// 全体の信頼度 0-100
    #[serde(alias = "confidence_score", deserialize_with = "deserialize_confidence")]
    pub overall_confidence: u8,
}

const DEFAULT_EXPLANATION: &str = "Analysis complete.";

impl ScanResult {
    /// 説明文（空の場合は既定文言）
    pub fn explanation(&self) -> &str {
        if self.ai_explanation.trim().is_empty() {
            DEFAULT_EXPLANATION
        } else {
            &self.ai_explanation
        }
    }
}

/// 信頼度を0-100の整数に丸める
pub fn clamp_confidence(raw: f64) -> u8 {
    if raw.is_nan() {
        return 0;
    }
    raw.round().clamp(0.0, 100.0) as u8
}

/// 整数・小数・null のいずれでも受け付ける
fn deserialize_confidence<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<f64>::deserialize(deserializer)?;
    Ok(clamp_confidence(raw.unwrap_or(0.0)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_deserialize_float_confidence() {
        let json = r#"{"field": "Name", "value": "John Doe", "confidence": 98.5}"#;
        let field: Field = serde_json::from_str(json).expect("デシリアライズ失敗");
        assert_eq!(field.field, "Name");
        assert_eq!(field.value, "John Doe");
        assert_eq!(field.confidence, 99);
    }

    #[test]
    fn test_field_confidence_clamped() {
        let json = r#"[{"field": "A", "value": "", "confidence": 140},
                       {"field": "B", "value": "", "confidence": -3},
                       {"field": "C", "value": "", "confidence": null},
                       {"field": "D", "value": ""}]"#;
        let fields: Vec<Field> = serde_json::from_str(json).expect("デシリアライズ失敗");
        let scores: Vec<u8> = fields.iter().map(|f| f.confidence).collect();
        assert_eq!(scores, vec![100, 0, 0, 0]);
    }

    #[test]
    fn test_scan_result_front_end_shape() {
        let json = r#"{
            "originalImage": "blob:abc",
            "refinedData": [{"field": "Name", "value": "Jon Doe", "confidence": 80}],
            "aiExplanation": "Found one field.",
            "changeLog": [{"type": "correction", "message": "Fixed spelling"}],
            "overallConfidence": 80
        }"#;
        let result: ScanResult = serde_json::from_str(json).expect("デシリアライズ失敗");
        assert_eq!(result.original_image, "blob:abc");
        assert_eq!(result.refined_data, vec![Field::new("Name", "Jon Doe", 80)]);
        assert_eq!(result.change_log[0].kind, ChangeKind::Correction);
        assert_eq!(result.overall_confidence, 80);
    }

    #[test]
    fn test_scan_result_backend_shape() {
        let json = r#"{
            "original_image_url": "https://example.com/uploads/file.jpg",
            "refined_data": [{"field": "Date", "value": "2026-01-02", "confidence": 95}],
            "ai_explanation": "I have analyzed your document.",
            "formatting_changes": [{"type": "formatting", "message": "ISO 8601"}],
            "confidence_score": 96.5
        }"#;
        let result: ScanResult = serde_json::from_str(json).expect("デシリアライズ失敗");
        assert_eq!(result.original_image, "https://example.com/uploads/file.jpg");
        assert_eq!(result.refined_data.len(), 1);
        assert_eq!(result.change_log[0].kind, ChangeKind::Formatting);
        assert_eq!(result.overall_confidence, 97);
    }

    #[test]
    fn test_scan_result_missing_members() {
        let result: ScanResult = serde_json::from_str("{}").expect("デシリアライズ失敗");
        assert!(result.refined_data.is_empty());
        assert!(result.change_log.is_empty());
        assert_eq!(result.overall_confidence, 0);
        assert_eq!(result.explanation(), "Analysis complete.");
    }

    #[test]
    fn test_unknown_change_kind() {
        let entry: ChangeLogEntry =
            serde_json::from_str(r#"{"type": "layout", "message": "x"}"#).expect("デシリアライズ失敗");
        assert_eq!(entry.kind, ChangeKind::Other);
    }

    #[test]
    fn test_confidence_band() {
        assert_eq!(ConfidenceBand::from_score(100), ConfidenceBand::High);
        assert_eq!(ConfidenceBand::from_score(90), ConfidenceBand::High);
        assert_eq!(ConfidenceBand::from_score(89), ConfidenceBand::Medium);
        assert_eq!(ConfidenceBand::from_score(70), ConfidenceBand::Medium);
        assert_eq!(ConfidenceBand::from_score(69), ConfidenceBand::Low);
        assert_eq!(ConfidenceBand::from_score(0), ConfidenceBand::Low);
    }

    #[test]
    fn test_field_serialize_shape() {
        let json = serde_json::to_string(&Field::new("Name", "John", 90)).expect("シリアライズ失敗");
        assert_eq!(json, r#"{"field":"Name","value":"John","confidence":90}"#);
    }
}
