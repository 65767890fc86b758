//! 項目メモ（注釈）
//!
//! 項目の位置をキーにしたメモと、編集中の下書きを1つだけ保持する。

use std::collections::BTreeMap;

/// 編集中の下書き
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteDraft {
    pub index: usize,
    pub text: String,
}

#[derive(Debug, Clone, Default)]
pub struct AnnotationStore {
    notes: BTreeMap<usize, String>,
    draft: Option<NoteDraft>,
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 下書きを開く
    ///
    /// 既存メモ（なければ空文字）で初期化する。別の下書きが開いていた場合、
    /// 未保存の内容は確認なしで破棄される。
    pub fn open_draft(&mut self, index: usize) -> &str {
        let text = self.notes.get(&index).cloned().unwrap_or_default();
        if let Some(previous) = self.draft.as_ref().filter(|d| d.index != index) {
            tracing::debug!(index = previous.index, "abandoning unsaved note draft");
        }
        let draft = self.draft.insert(NoteDraft { index, text });
        &draft.text
    }

    /// 開いている下書きの本文を差し替える
    pub fn update_draft(&mut self, text: &str) {
        if let Some(draft) = self.draft.as_mut() {
            draft.text = text.to_string();
        }
    }

    /// メモを保存して下書きを閉じる
    ///
    /// 前後の空白を除いて空になるテキストはメモの削除として扱う。
    pub fn save_draft(&mut self, index: usize, text: &str) {
        if text.trim().is_empty() {
            self.notes.remove(&index);
        } else {
            self.notes.insert(index, text.to_string());
        }
        self.draft = None;
    }

    /// 開いている下書きを自身の本文で保存。下書きがなければ `false`
    pub fn save_open_draft(&mut self) -> bool {
        match self.draft.take() {
            Some(NoteDraft { index, text }) => {
                self.save_draft(index, &text);
                true
            }
            None => false,
        }
    }

    /// 保存せずに下書きを閉じる
    pub fn close_draft(&mut self) {
        self.draft = None;
    }

    pub fn draft(&self) -> Option<&NoteDraft> {
        self.draft.as_ref()
    }

    pub fn note(&self, index: usize) -> Option<&str> {
        self.notes.get(&index).map(String::as_str)
    }

    pub fn has_note(&self, index: usize) -> bool {
        self.notes.contains_key(&index)
    }

    pub fn notes(&self) -> &BTreeMap<usize, String> {
        &self.notes
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.notes.iter().map(|(i, n)| (*i, n.as_str()))
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// メモと下書きをすべて破棄
    pub fn clear(&mut self) {
        self.notes.clear();
        self.draft = None;
    }
}
