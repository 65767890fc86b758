//! 作業セッション
//!
//! 作業者・開始時刻・設定をまとめ、各コマンドへ明示的に渡す。
//! 起動時に `open` し、終了時に `close` する。

use crate::config::Config;
use chrono::{DateTime, Local, SecondsFormat, Utc};
use scan_review_common::{ExportOptions, OutputFormat};

#[derive(Debug, Clone)]
pub struct SessionContext {
    pub operator: String,
    pub started_at: DateTime<Local>,
    pub config: Config,
}

impl SessionContext {
    pub fn open(config: Config) -> Self {
        let operator = config.operator();
        let started_at = Local::now();
        tracing::info!(%operator, started_at = %started_at.to_rfc3339(), "session opened");
        Self {
            operator,
            started_at,
            config,
        }
    }

    /// 形式の指定がなければ設定の既定形式
    pub fn format_or_default(&self, format: Option<OutputFormat>) -> OutputFormat {
        format.unwrap_or(self.config.default_format)
    }

    /// エクスポート設定（生成日時は呼び出し時点のUTC）
    pub fn export_options(&self, title: Option<&str>) -> ExportOptions {
        ExportOptions {
            title: title.unwrap_or(self.config.title.as_str()).to_string(),
            generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }

    pub fn close(self) {
        let elapsed = Local::now().signed_duration_since(self.started_at);
        tracing::info!(
            operator = %self.operator,
            elapsed_secs = elapsed.num_seconds(),
            "session closed"
        );
    }
}
