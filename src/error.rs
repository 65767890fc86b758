use scan_review_common::ExportError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReviewError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] scan_review_common::Error),

    #[error("エクスポートエラー: {0}")]
    Export(#[from] ExportError),

    #[error("項目番号が範囲外です: {index} (項目数 {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("編集スクリプトが不正: {0}")]
    InvalidScript(String),

    #[error("元画像を取得できません: {0}")]
    Original(String),

    #[error("入力エラー: {0}")]
    Prompt(String),
}

pub type Result<T> = std::result::Result<T, ReviewError>;
