use crate::logging::LogFormat;
use clap::{ArgAction, Parser, Subcommand};
use scan_review_common::OutputFormat;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "scan-review")]
#[command(about = "OCRスキャン結果のレビュー・修正・エクスポートツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力（-v: info, -vv: debug, -vvv: trace）
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// ログ形式 (pretty/compact/json)
    #[arg(long, default_value = "pretty", global = true)]
    pub log_format: LogFormat,

    /// ログの出力先ファイル（未指定なら標準エラー）
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// 項目値・メモをログに出力する（既定は伏字）
    #[arg(long, global = true)]
    pub log_values: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// スキャン結果を指定形式で表示
    Show {
        /// スキャン結果JSON（またはモデル応答テキスト）
        #[arg(required = true)]
        input: PathBuf,

        /// 表示形式 (excel/word/pdf/text)（デフォルト: 設定値）
        #[arg(short, long)]
        format: Option<OutputFormat>,

        /// 入力をモデル応答テキストとして解析
        #[arg(long)]
        raw: bool,
    },

    /// 対話式でレビュー（編集・メモ・元に戻す・形式切り替え・エクスポート）
    Review {
        #[arg(required = true)]
        input: PathBuf,

        #[arg(short, long)]
        format: Option<OutputFormat>,

        /// エクスポート先ディレクトリ（デフォルト: 設定値またはカレント）
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[arg(long)]
        raw: bool,
    },

    /// 編集スクリプト（JSON）を適用
    Apply {
        #[arg(required = true)]
        input: PathBuf,

        /// 編集スクリプトJSON
        #[arg(short, long, required = true)]
        script: PathBuf,

        #[arg(short, long)]
        format: Option<OutputFormat>,

        /// レビュー後の状態をJSONで保存
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[arg(long)]
        raw: bool,
    },

    /// スキャン結果をファイルに出力
    Export {
        #[arg(required = true)]
        input: PathBuf,

        /// 出力形式 (excel/word/pdf/text)（デフォルト: 設定値）
        #[arg(short, long)]
        format: Option<OutputFormat>,

        /// 出力ファイル/ディレクトリ
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 文書タイトル（ファイル名にも使用）
        #[arg(short, long)]
        title: Option<String>,

        /// 出力前に適用する編集スクリプト
        #[arg(short, long)]
        script: Option<PathBuf>,

        #[arg(long)]
        raw: bool,
    },

    /// 元画像を保存
    Original {
        #[arg(required = true)]
        input: PathBuf,

        /// 保存先ファイル/ディレクトリ
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },

    /// 設定
    Config {
        /// 既定の形式を設定
        #[arg(long)]
        set_default_format: Option<OutputFormat>,

        /// 作業者名を設定
        #[arg(long)]
        set_operator: Option<String>,

        /// 現在の設定を表示
        #[arg(long)]
        show: bool,
    },
}
