//! レビュー操作
//!
//! - JSON編集スクリプト（`apply` コマンド）
//! - 対話式レビュー（`review` コマンド）

use crate::error::{ReviewError, Result};
use crate::logging::redact_value;
use crate::session::SessionContext;
use dialoguer::Input;
use scan_review_common::{
    parse_model_reply, parse_scan_result, Field, OutputFormat, ReviewSurface, ReviewView, ScanResult,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// 編集スクリプトの1操作
///
/// ```json
/// [
///   {"op": "set", "index": 0, "value": "John Doe"},
///   {"op": "note", "index": 0, "text": "spelling checked"},
///   {"op": "format", "format": "text"},
///   {"op": "edit", "index": 1, "raw": "\"2026-01-02\""},
///   {"op": "undo"}
/// ]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum EditCommand {
    /// 値をそのまま設定
    Set { index: usize, value: String },
    /// 現在の形式の入力欄の内容として設定（Text形式なら引用符を外す）
    Edit { index: usize, raw: String },
    Undo,
    /// メモを保存（空白のみなら削除）
    Note { index: usize, text: String },
    Format { format: OutputFormat },
    Reset,
}

/// スクリプト適用結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplySummary {
    pub applied: usize,
    pub changed: usize,
    pub undone: usize,
    /// 取り消す履歴がなかったUndo
    pub undo_noops: usize,
}

/// レビュー後の状態（`apply --output` で保存）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSnapshot {
    pub format: OutputFormat,
    pub fields: Vec<Field>,
    pub notes: BTreeMap<usize, String>,
    pub overall_confidence: u8,
}

impl ReviewSnapshot {
    pub fn capture(surface: &ReviewSurface) -> Self {
        Self {
            format: surface.format(),
            fields: surface.fields().to_vec(),
            notes: surface.note_map().clone(),
            overall_confidence: surface.overall_confidence(),
        }
    }
}

/// スキャン結果を読み込む
///
/// `raw` 指定時はモデル応答テキストとして解析し、解析できなければ
/// 応答全文を説明文とした空の結果になる。
pub fn load_scan_result(path: &Path, raw: bool) -> Result<ScanResult> {
    if !path.exists() {
        return Err(ReviewError::FileNotFound(path.display().to_string()));
    }
    let content = std::fs::read_to_string(path)?;
    let scan = if raw {
        parse_model_reply("", &content)
    } else {
        parse_scan_result(&content)?
    };
    tracing::info!(
        path = %path.display(),
        fields = scan.refined_data.len(),
        confidence = scan.overall_confidence,
        "scan result loaded"
    );
    Ok(scan)
}

pub fn load_script(path: &Path) -> Result<Vec<EditCommand>> {
    if !path.exists() {
        return Err(ReviewError::FileNotFound(path.display().to_string()));
    }
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| ReviewError::InvalidScript(e.to_string()))
}

fn check_index(surface: &ReviewSurface, index: usize) -> Result<()> {
    if index >= surface.field_count() {
        return Err(ReviewError::IndexOutOfRange {
            index,
            len: surface.field_count(),
        });
    }
    Ok(())
}

/// 1操作を適用。範囲外の項目番号はパニックさせずエラーで返す
pub fn apply_command(
    surface: &mut ReviewSurface,
    command: &EditCommand,
    summary: &mut ApplySummary,
) -> Result<()> {
    match command {
        EditCommand::Set { index, value } => {
            check_index(surface, *index)?;
            tracing::debug!(index, value = redact_value(value), "script set");
            if surface.set_value(*index, value) {
                summary.changed += 1;
            }
        }
        EditCommand::Edit { index, raw } => {
            check_index(surface, *index)?;
            tracing::debug!(index, raw = redact_value(raw), "script edit");
            if surface.edit_from_view(*index, raw) {
                summary.changed += 1;
            }
        }
        EditCommand::Undo => {
            if surface.undo() {
                summary.undone += 1;
            } else {
                summary.undo_noops += 1;
            }
        }
        EditCommand::Note { index, text } => {
            check_index(surface, *index)?;
            tracing::debug!(index, note = redact_value(text), "script note");
            surface.save_note(*index, text);
        }
        EditCommand::Format { format } => surface.set_format(*format),
        EditCommand::Reset => surface.reset(),
    }
    summary.applied += 1;
    Ok(())
}

/// スクリプトを先頭から適用（エラーの時点で中断）
pub fn apply_commands(surface: &mut ReviewSurface, commands: &[EditCommand]) -> Result<ApplySummary> {
    let mut summary = ApplySummary::default();
    for (step, command) in commands.iter().enumerate() {
        apply_command(surface, command, &mut summary).map_err(|e| {
            tracing::warn!(step, error = %e, "edit script aborted");
            e
        })?;
    }
    tracing::info!(
        applied = summary.applied,
        changed = summary.changed,
        undone = summary.undone,
        "edit script applied"
    );
    Ok(summary)
}

/// 対話モードの操作
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewAction {
    /// 項目を編集（入力欄の内容そのまま）
    Edit(usize, String),
    /// メモを保存
    Note(usize, String),
    /// メモの下書きを開いて編集（既存のメモを初期値にする）
    Memo(usize),
    Undo,
    Format(OutputFormat),
    Reset,
    /// エクスポート（タイトル省略可）
    Export(Option<String>),
    Show,
    Help,
    Quit,
}

pub const REVIEW_HELP: &str = "操作: [p]表示 [e 番号 値]編集 [n 番号 メモ]メモ [m 番号]メモ編集 [u]元に戻す [f 形式]形式 [r]リセット [x タイトル]エクスポート [q]終了";

fn parse_index(token: Option<&str>) -> std::result::Result<usize, String> {
    let token = token.ok_or_else(|| "項目番号を指定してください".to_string())?;
    token
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .ok_or_else(|| format!("項目番号が不正です: {}", token))
}

/// 入力行を操作に変換（項目番号は1始まり）
pub fn parse_review_action(line: &str) -> std::result::Result<ReviewAction, String> {
    let line = line.trim();
    let (cmd, rest) = match line.split_once(char::is_whitespace) {
        Some((cmd, rest)) => (cmd, rest.trim_start()),
        None => (line, ""),
    };

    match cmd {
        "" | "p" => Ok(ReviewAction::Show),
        "?" | "h" => Ok(ReviewAction::Help),
        "u" => Ok(ReviewAction::Undo),
        "r" => Ok(ReviewAction::Reset),
        "q" | "Q" => Ok(ReviewAction::Quit),
        "f" => rest
            .parse::<OutputFormat>()
            .map(ReviewAction::Format)
            .map_err(|e| e.to_string()),
        "x" => Ok(ReviewAction::Export(
            Some(rest.to_string()).filter(|t| !t.is_empty()),
        )),
        "m" => parse_index(Some(rest).filter(|s| !s.is_empty())).map(ReviewAction::Memo),
        "e" | "n" => {
            let (index, text) = match rest.split_once(char::is_whitespace) {
                Some((index, text)) => (index, text.trim_start()),
                None => (rest, ""),
            };
            let index = parse_index(Some(index).filter(|s| !s.is_empty()))?;
            if cmd == "e" {
                Ok(ReviewAction::Edit(index, text.to_string()))
            } else {
                Ok(ReviewAction::Note(index, text.to_string()))
            }
        }
        _ => Err(format!("不明な操作: {}", cmd)),
    }
}

/// 下書き編集の入力でこれだけを入力すると保存せずに閉じる
pub const DRAFT_CANCEL: &str = "!";

/// 下書きの結末
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftOutcome {
    Saved,
    Deleted,
    Cancelled,
}

/// 開いている下書きを入力内容で保存、または取り消す
pub fn finish_note_draft(surface: &mut ReviewSurface, input: &str) -> DraftOutcome {
    let Some(index) = surface.notes().draft().map(|d| d.index) else {
        return DraftOutcome::Cancelled;
    };
    if input.trim() == DRAFT_CANCEL {
        surface.close_note();
        return DraftOutcome::Cancelled;
    }
    surface.update_note_draft(input);
    surface.save_open_note();
    if surface.note(index).is_some() {
        DraftOutcome::Saved
    } else {
        DraftOutcome::Deleted
    }
}

fn print_header(surface: &ReviewSurface) {
    println!("📄 {}", surface.explanation());
    println!(
        "   全体の信頼度: {}% / 項目数: {} / 形式: {}",
        surface.overall_confidence(),
        surface.field_count(),
        surface.format().display_name()
    );
    for change in surface.change_log() {
        println!("   - [{}] {}", change.kind, change.message);
    }
}

pub fn print_view(view: &ReviewView) {
    println!("---");
    println!("{}", view);
    println!("---");
}

/// 対話式レビュー
pub async fn run_interactive_review(
    surface: &mut ReviewSurface,
    session: &SessionContext,
    output_dir: &Path,
) -> Result<()> {
    print_header(surface);
    print_view(&surface.view());
    println!("{}\n", REVIEW_HELP);

    loop {
        let input: String = Input::new()
            .with_prompt(format!("review[{}]", surface.format()))
            .allow_empty(true)
            .interact_text()
            .map_err(|e| ReviewError::Prompt(e.to_string()))?;

        let action = match parse_review_action(&input) {
            Ok(action) => action,
            Err(message) => {
                println!("  ✖ {}", message);
                continue;
            }
        };

        match action {
            ReviewAction::Edit(index, _) | ReviewAction::Note(index, _) | ReviewAction::Memo(index)
                if index >= surface.field_count() =>
            {
                println!(
                    "  ✖ {}",
                    ReviewError::IndexOutOfRange {
                        index: index + 1,
                        len: surface.field_count()
                    }
                );
            }
            ReviewAction::Edit(index, raw) => {
                if surface.edit_from_view(index, &raw) {
                    println!("  → 更新しました");
                } else {
                    println!("  → 変更なし");
                }
            }
            ReviewAction::Note(index, text) => {
                surface.save_note(index, &text);
                if surface.note(index).is_some() {
                    println!("  → メモを保存しました");
                } else {
                    println!("  → メモを削除しました");
                }
            }
            ReviewAction::Memo(index) => {
                let seed = surface.open_note(index);
                let input: String = Input::new()
                    .with_prompt(format!("メモ #{} ({}で取消)", index + 1, DRAFT_CANCEL))
                    .with_initial_text(seed)
                    .allow_empty(true)
                    .interact_text()
                    .map_err(|e| ReviewError::Prompt(e.to_string()))?;
                match finish_note_draft(surface, &input) {
                    DraftOutcome::Saved => println!("  → メモを保存しました"),
                    DraftOutcome::Deleted => println!("  → メモを削除しました"),
                    DraftOutcome::Cancelled => println!("  → 取り消しました"),
                }
            }
            ReviewAction::Undo => {
                if surface.undo() {
                    println!("  → 元に戻しました");
                } else {
                    println!("  → 元に戻す操作がありません");
                }
            }
            ReviewAction::Format(format) => {
                surface.set_format(format);
                print_view(&surface.view());
            }
            ReviewAction::Reset => {
                surface.reset();
                println!("  → 抽出結果に戻しました");
            }
            ReviewAction::Export(title) => {
                let options = session.export_options(title.as_deref());
                if let Err(e) =
                    crate::export::export_to_path(surface, &options, output_dir).await
                {
                    tracing::warn!(error = %e, "interactive export failed");
                }
            }
            ReviewAction::Show => print_view(&surface.view()),
            ReviewAction::Help => println!("{}", REVIEW_HELP),
            ReviewAction::Quit => {
                println!("レビューを終了します");
                break;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface() -> ReviewSurface {
        let scan = ScanResult {
            refined_data: vec![Field::new("Name", "Jon Doe", 80), Field::new("Total", "12", 60)],
            ..Default::default()
        };
        ReviewSurface::new(scan, OutputFormat::Excel)
    }

    #[test]
    fn test_command_json() {
        let json = r#"[{"op":"set","index":0,"value":"John"},{"op":"undo"},{"op":"format","format":"pdf"}]"#;
        let commands: Vec<EditCommand> = serde_json::from_str(json).unwrap();
        assert_eq!(
            commands,
            vec![
                EditCommand::Set { index: 0, value: "John".into() },
                EditCommand::Undo,
                EditCommand::Format { format: OutputFormat::Pdf },
            ]
        );
    }

    #[test]
    fn test_apply_commands_summary() {
        let mut s = surface();
        let commands = vec![
            EditCommand::Set { index: 0, value: "John Doe".into() },
            EditCommand::Set { index: 0, value: "John Doe".into() },
            EditCommand::Undo,
            EditCommand::Undo,
        ];
        let summary = apply_commands(&mut s, &commands).unwrap();
        assert_eq!(summary.applied, 4);
        assert_eq!(summary.changed, 1);
        assert_eq!(summary.undone, 1);
        assert_eq!(summary.undo_noops, 1);
        assert_eq!(s.field(0).unwrap().value, "Jon Doe");
    }

    #[test]
    fn test_apply_out_of_range() {
        let mut s = surface();
        let err = apply_commands(&mut s, &[EditCommand::Set { index: 5, value: "x".into() }])
            .unwrap_err();
        assert!(matches!(err, ReviewError::IndexOutOfRange { index: 5, len: 2 }));
    }

    #[test]
    fn test_apply_edit_uses_current_format() {
        let mut s = surface();
        apply_commands(
            &mut s,
            &[
                EditCommand::Format { format: OutputFormat::Text },
                EditCommand::Edit { index: 1, raw: "\"15\"".into() },
            ],
        )
        .unwrap();
        assert_eq!(s.field(1).unwrap().value, "15");
    }

    #[test]
    fn test_parse_review_action() {
        assert_eq!(parse_review_action("e 1 John Doe"), Ok(ReviewAction::Edit(0, "John Doe".into())));
        assert_eq!(parse_review_action("n 2"), Ok(ReviewAction::Note(1, String::new())));
        assert_eq!(parse_review_action("f word"), Ok(ReviewAction::Format(OutputFormat::Word)));
        assert_eq!(parse_review_action("x"), Ok(ReviewAction::Export(None)));
        assert_eq!(parse_review_action(""), Ok(ReviewAction::Show));
        assert!(parse_review_action("e 0 x").is_err());
        assert!(parse_review_action("e").is_err());
        assert!(parse_review_action("zzz").is_err());
    }

    #[test]
    fn test_parse_memo_action() {
        assert_eq!(parse_review_action("m 2"), Ok(ReviewAction::Memo(1)));
        assert!(parse_review_action("m").is_err());
    }

    #[test]
    fn test_note_draft_cancel_keeps_saved_note() {
        let mut s = surface();
        s.save_note(0, "original");
        assert_eq!(s.open_note(0), "original");
        assert_eq!(finish_note_draft(&mut s, " ! "), DraftOutcome::Cancelled);
        assert_eq!(s.note(0), Some("original"));
        assert!(s.notes().draft().is_none());
    }

    #[test]
    fn test_note_draft_save_and_delete() {
        let mut s = surface();
        s.open_note(1);
        assert_eq!(finish_note_draft(&mut s, "total looks low"), DraftOutcome::Saved);
        assert_eq!(s.note(1), Some("total looks low"));

        s.open_note(1);
        assert_eq!(finish_note_draft(&mut s, "   "), DraftOutcome::Deleted);
        assert!(s.note(1).is_none());
    }

    #[test]
    fn test_finish_without_open_draft() {
        let mut s = surface();
        assert_eq!(finish_note_draft(&mut s, "text"), DraftOutcome::Cancelled);
        assert!(s.note_map().is_empty());
    }

    #[test]
    fn test_snapshot_serializes_notes() {
        let mut s = surface();
        s.save_note(1, "check total");
        let json = serde_json::to_string(&ReviewSnapshot::capture(&s)).unwrap();
        assert!(json.contains(r#""notes":{"1":"check total"}"#));
    }
}
