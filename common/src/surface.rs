//! レビュー画面の状態
//!
//! バックエンドの結果（読み取り専用）を受け取り、項目モデル・編集履歴・メモ・
//! 出力形式・エクスポート状態をまとめて管理する。すべての操作は同期的に完了し、
//! 非同期になるのはエクスポートのエンコード部分だけ（`begin_export` /
//! `finish_export` の間）。

use crate::annotation::AnnotationStore;
use crate::export::{ExportArtifact, ExportError, ExportOptions, ExportRequest, Exporter, Notice};
use crate::format::OutputFormat;
use crate::history::EditHistory;
use crate::model::FieldModel;
use crate::types::{ChangeLogEntry, Field, ScanResult};
use crate::view::ReviewView;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct ReviewSurface {
    source: ScanResult,
    model: FieldModel,
    history: EditHistory,
    notes: AnnotationStore,
    format: OutputFormat,
    exporting: bool,
}

impl ReviewSurface {
    pub fn new(source: ScanResult, format: OutputFormat) -> Self {
        let model = FieldModel::new(&source.refined_data);
        info!(fields = model.len(), format = %format, "review surface opened");
        Self {
            source,
            model,
            history: EditHistory::new(),
            notes: AnnotationStore::new(),
            format,
            exporting: false,
        }
    }

    /// 新しいスキャン結果に差し替える
    ///
    /// 位置キーのメモが無関係な項目に付き直さないよう、履歴とメモも破棄する。
    pub fn load(&mut self, source: ScanResult) {
        self.source = source;
        self.replace_sequence();
        info!(fields = self.model.len(), "new scan result loaded");
    }

    /// 元の抽出結果に戻す（履歴・メモも破棄）
    pub fn reset(&mut self) {
        self.replace_sequence();
        info!(fields = self.model.len(), "review reset to extracted values");
    }

    fn replace_sequence(&mut self) {
        self.model.initialize(&self.source.refined_data);
        self.history.clear();
        if !self.notes.is_empty() {
            debug!(notes = self.notes.len(), "dropping notes for replaced field sequence");
        }
        self.notes.clear();
    }

    // ---- 項目 ----

    pub fn fields(&self) -> &[Field] {
        self.model.fields()
    }

    pub fn field(&self, index: usize) -> Option<&Field> {
        self.model.get(index)
    }

    pub fn field_count(&self) -> usize {
        self.model.len()
    }

    pub fn is_empty(&self) -> bool {
        self.model.is_empty()
    }

    /// 値を更新（値が変わった場合 `true`）
    ///
    /// # Panics
    ///
    /// `index` が範囲外の場合。
    pub fn set_value(&mut self, index: usize, value: &str) -> bool {
        let changed = self.model.set_value(index, value, &mut self.history);
        if changed {
            debug!(index, history = self.history.len(), "field value changed");
        }
        changed
    }

    /// 現在の形式の入力欄から受け取った内容で更新
    ///
    /// # Panics
    ///
    /// `index` が範囲外の場合。
    pub fn edit_from_view(&mut self, index: usize, raw: &str) -> bool {
        // 表示したままの内容が戻ってきた場合は変更なし
        if self
            .model
            .get(index)
            .is_some_and(|f| self.format.present_value(&f.value) == raw)
        {
            return false;
        }
        let value = self.format.capture_edit(raw);
        self.set_value(index, &value)
    }

    /// 直前の変更を取り消す。取り消す履歴がなければ `false`
    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(snapshot) => {
                self.model.restore(snapshot);
                debug!(history = self.history.len(), "undo applied");
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    // ---- 形式 ----

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// 形式の切り替え（項目・メモは変更しない）
    pub fn set_format(&mut self, format: OutputFormat) {
        if self.format != format {
            debug!(from = %self.format, to = %format, "format switched");
            self.format = format;
        }
    }

    pub fn view(&self) -> ReviewView {
        ReviewView::build(self.format, self.model.fields(), &self.notes)
    }

    // ---- メモ ----

    fn assert_index(&self, index: usize) {
        assert!(
            index < self.model.len(),
            "field index {} out of range (len {})",
            index,
            self.model.len()
        );
    }

    /// メモの下書きを開き、初期本文を返す
    ///
    /// # Panics
    ///
    /// `index` が範囲外の場合。
    pub fn open_note(&mut self, index: usize) -> String {
        self.assert_index(index);
        self.notes.open_draft(index).to_string()
    }

    pub fn update_note_draft(&mut self, text: &str) {
        self.notes.update_draft(text);
    }

    /// メモを保存（空白のみなら削除）
    ///
    /// # Panics
    ///
    /// `index` が範囲外の場合。
    pub fn save_note(&mut self, index: usize, text: &str) {
        self.assert_index(index);
        self.notes.save_draft(index, text);
        debug!(index, has_note = self.notes.has_note(index), "note saved");
    }

    pub fn save_open_note(&mut self) -> bool {
        self.notes.save_open_draft()
    }

    pub fn close_note(&mut self) {
        self.notes.close_draft();
    }

    /// メモボタン相当：開いていれば閉じ、閉じていれば開く
    ///
    /// # Panics
    ///
    /// `index` が範囲外の場合。
    pub fn toggle_note(&mut self, index: usize) {
        if self.notes.draft().is_some_and(|d| d.index == index) {
            self.notes.close_draft();
        } else {
            self.open_note(index);
        }
    }

    pub fn note(&self, index: usize) -> Option<&str> {
        self.notes.note(index)
    }

    pub fn notes(&self) -> &AnnotationStore {
        &self.notes
    }

    // ---- ヘッダー情報 ----

    pub fn source(&self) -> &ScanResult {
        &self.source
    }

    pub fn original_image(&self) -> &str {
        &self.source.original_image
    }

    pub fn explanation(&self) -> &str {
        self.source.explanation()
    }

    pub fn change_log(&self) -> &[ChangeLogEntry] {
        &self.source.change_log
    }

    pub fn overall_confidence(&self) -> u8 {
        self.source.overall_confidence
    }

    // ---- エクスポート ----

    pub fn is_exporting(&self) -> bool {
        self.exporting
    }

    /// エクスポート開始
    ///
    /// トリガー時点の項目とメモを写し取り、完了まで再実行を受け付けない。
    pub fn begin_export(&mut self, options: &ExportOptions) -> Result<ExportRequest, ExportError> {
        if self.exporting {
            return Err(ExportError::InProgress);
        }
        self.exporting = true;
        info!(format = %self.format, fields = self.model.len(), "export started");
        Ok(ExportRequest::new(
            self.format,
            self.model.fields(),
            self.notes.notes(),
            options,
        ))
    }

    /// エクスポート完了。成否にかかわらず再実行可能に戻し、通知を返す
    ///
    /// ファイル保存まで行う場合は保存の結果まで含めて渡す。
    pub fn finish_export(&mut self, result: Result<&ExportArtifact, &ExportError>) -> Notice {
        self.exporting = false;
        match result {
            Ok(artifact) => {
                info!(file = %artifact.file_name, bytes = artifact.len(), "export finished");
                Notice::success(
                    "Export Successful",
                    format!(
                        "Your file has been exported as {}",
                        artifact.format.display_name()
                    ),
                )
            }
            Err(err) => {
                warn!(error = %err, "export failed");
                Notice::error("Export Failed", err.to_string())
            }
        }
    }

    /// 同期的にエクスポートを実行
    pub fn export_with(
        &mut self,
        exporter: &dyn Exporter,
        options: &ExportOptions,
    ) -> (Result<ExportArtifact, ExportError>, Notice) {
        let request = match self.begin_export(options) {
            Ok(request) => request,
            Err(err) => {
                let notice = Notice::error("Export Failed", err.to_string());
                return (Err(err), notice);
            }
        };
        let result = exporter.export(&request);
        let notice = self.finish_export(result.as_ref());
        (result, notice)
    }

    /// 現在のメモ（位置 → 本文）
    pub fn note_map(&self) -> &BTreeMap<usize, String> {
        self.notes.notes()
    }
}
