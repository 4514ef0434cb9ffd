//! 候補絞り込み用バケット
//!
//! 買取表を (型番先頭, 名前先頭) で分類し、総当たり比較を避ける。

use crate::types::Record;
use std::collections::HashMap;

/// 先頭 `n` 文字（文字数が足りなければ全体）
pub fn fragment(s: &str, n: usize) -> String {
    s.chars().take(n).collect()
}

/// バケットキー
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BucketKey {
    pub model: String,
    pub name: String,
}

impl BucketKey {
    pub fn for_record(record: &Record, fragment_len: usize) -> Self {
        Self {
            model: fragment(record.normalized_model(), fragment_len),
            name: fragment(record.normalized_name(), fragment_len),
        }
    }
}

/// 買取表のバケット索引
///
/// 各リストは買取表の並び順を保つ
#[derive(Debug, Clone, Default)]
pub struct BucketIndex {
    fragment_len: usize,
    by_key: HashMap<BucketKey, Vec<usize>>,
    by_model: HashMap<String, Vec<usize>>,
    by_name: HashMap<String, Vec<usize>>,
    all: Vec<usize>,
}

impl BucketIndex {
    pub fn build(source: &[Record], fragment_len: usize) -> Self {
        let mut by_key: HashMap<BucketKey, Vec<usize>> = HashMap::new();
        let mut by_model: HashMap<String, Vec<usize>> = HashMap::new();
        let mut by_name: HashMap<String, Vec<usize>> = HashMap::new();

        for (idx, record) in source.iter().enumerate() {
            let key = BucketKey::for_record(record, fragment_len);
            by_model.entry(key.model.clone()).or_default().push(idx);
            by_name.entry(key.name.clone()).or_default().push(idx);
            by_key.entry(key).or_default().push(idx);
        }

        Self {
            fragment_len,
            by_key,
            by_model,
            by_name,
            all: (0..source.len()).collect(),
        }
    }

    pub fn key_for(&self, record: &Record) -> BucketKey {
        BucketKey::for_record(record, self.fragment_len)
    }

    pub fn lookup_key(&self, key: &BucketKey) -> &[usize] {
        self.by_key.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn lookup_model(&self, model: &str) -> &[usize] {
        self.by_model.get(model).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn lookup_name(&self, name: &str) -> &[usize] {
        self.by_name.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    /// 候補を返す
    ///
    /// 完全キー → 型番先頭 → 名前先頭 → 全件 の順で最初に空でないもの
    pub fn candidates(&self, key: &BucketKey) -> &[usize] {
        [
            self.lookup_key(key),
            self.lookup_model(&key.model),
            self.lookup_name(&key.name),
        ]
        .into_iter()
        .find(|c| !c.is_empty())
        .unwrap_or(self.all.as_slice())
    }
}
