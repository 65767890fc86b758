//! 項目データモデル
//!
//! レビュー中の項目列（作業コピー）を保持する。
//! 値の変更は必ずここを通し、変更前の状態を履歴に積む。

use crate::history::EditHistory;
use crate::types::Field;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldModel {
    fields: Vec<Field>,
}

impl FieldModel {
    pub fn new(fields: &[Field]) -> Self {
        Self {
            fields: fields.to_vec(),
        }
    }

    /// 作業コピーを丸ごと置き換える（初回読み込み・リセット）
    pub fn initialize(&mut self, fields: &[Field]) {
        self.fields = fields.to_vec();
    }

    /// 値を更新
    ///
    /// 値が変わる場合のみ、変更前の項目列を `history` に積んでから反映する。
    /// 同じ値なら何もしない。変更した場合に `true` を返す。
    ///
    /// # Panics
    ///
    /// `index` が範囲外の場合（呼び出し側の不具合）。
    pub fn set_value(&mut self, index: usize, new_value: &str, history: &mut EditHistory) -> bool {
        assert!(
            index < self.fields.len(),
            "field index {} out of range (len {})",
            index,
            self.fields.len()
        );

        if self.fields[index].value == new_value {
            return false;
        }

        history.push_snapshot(&self.fields);
        self.fields[index].value = new_value.to_string();
        true
    }

    /// Undoで取り出したスナップショットを反映
    pub fn restore(&mut self, snapshot: Vec<Field>) {
        self.fields = snapshot;
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn get(&self, index: usize) -> Option<&Field> {
        self.fields.get(index)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
