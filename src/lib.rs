//! scan-review
//!
//! OCRスキャン結果のレビュー（編集・元に戻す・メモ・形式切り替え）とエクスポートを行うCLI。
//! 状態管理の中核は `scan_review_common` にある。

pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod logging;
pub mod original;
pub mod review;
pub mod session;
