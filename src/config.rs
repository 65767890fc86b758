use crate::error::{ReviewError, Result};
use scan_review_common::OutputFormat;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const OPERATOR_ENV: &str = "SCAN_REVIEW_OPERATOR";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// レビュー・エクスポートの既定形式
    pub default_format: OutputFormat,
    /// 既定の文書タイトル（出力ファイル名にも使用）
    pub title: String,
    /// 既定の出力先
    pub export_dir: Option<PathBuf>,
    /// 作業者名
    pub operator: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_format: OutputFormat::Excel,
            title: "scan-review".into(),
            export_dir: None,
            operator: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            tracing::debug!(path = %config_path.display(), "config loaded");
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| ReviewError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("scan-review").join("config.json"))
    }

    /// 作業者名（環境変数を優先）
    pub fn operator(&self) -> String {
        if let Ok(name) = std::env::var(OPERATOR_ENV) {
            if !name.trim().is_empty() {
                return name;
            }
        }
        self.operator.clone().unwrap_or_else(|| "anonymous".to_string())
    }

    pub fn set_default_format(&mut self, format: OutputFormat) -> Result<()> {
        self.default_format = format;
        self.save()
    }

    pub fn set_operator(&mut self, name: String) -> Result<()> {
        self.operator = Some(name);
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert_eq!(config.default_format, OutputFormat::Excel);
        assert_eq!(config.title, "scan-review");
        assert!(config.export_dir.is_none());
    }

    #[test]
    fn test_config_partial_json() {
        let config: Config = serde_json::from_str(r#"{"default_format": "text"}"#).unwrap();
        assert_eq!(config.default_format, OutputFormat::Text);
        assert_eq!(config.title, "scan-review");
    }
}
