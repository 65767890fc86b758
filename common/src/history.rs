//! 編集履歴（Undo用スナップショット）
//!
//! 値が変わる編集の直前に項目列全体のコピーを積み、Undoで最新のものを取り出す。
//! Redoはない。上限も設けていない（人手の編集ペースなら問題にならない）。

use crate::types::Field;

/// スナップショットの積み上げ（古い順）
#[derive(Debug, Clone, Default)]
pub struct EditHistory {
    snapshots: Vec<Vec<Field>>,
}

impl EditHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// 項目列のコピーを末尾に追加
    pub fn push_snapshot(&mut self, fields: &[Field]) {
        self.snapshots.push(fields.to_vec());
    }

    /// 最新のスナップショットを取り出す（空ならNone、状態は変わらない）
    pub fn undo(&mut self) -> Option<Vec<Field>> {
        self.snapshots.pop()
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn can_undo(&self) -> bool {
        !self.snapshots.is_empty()
    }
}
