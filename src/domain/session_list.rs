use super::meme_record::MemeRecord;
use std::slice;

/// セッション中に作成された `MemeRecord` の一覧。
///
/// 追加のみ可能で、並びは作成順です。削除や重複排除は行いません。
/// グローバル変数ではなく、アプリケーション (セッション) 側が所有して
/// `MemeComposer` に注入します。
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SessionList {
    records: Vec<MemeRecord>,
}

impl SessionList {
    pub fn new() -> Self {
        Self::default()
    }

    /// 末尾にレコードを追加し、追加したレコードへの参照を返します。
    pub fn append(&mut self, record: MemeRecord) -> &MemeRecord {
        self.records.push(record);
        let index = self.records.len() - 1;
        &self.records[index]
    }

    // --- 便利メソッド ---

    /// 保持しているレコードの件数を返します。
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&MemeRecord> {
        self.records.get(index)
    }

    pub fn last(&self) -> Option<&MemeRecord> {
        self.records.last()
    }

    pub fn iter(&self) -> slice::Iter<'_, MemeRecord> {
        self.records.iter()
    }
}

impl<'a> IntoIterator for &'a SessionList {
    type Item = &'a MemeRecord;
    type IntoIter = slice::Iter<'a, MemeRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
