//! 照合対象の型定義
//!
//! - Record: 商品マスタ／買取表の1行（正規化キー付き）
//! - CatalogRecord: 商品マスタの1行（レアリティ付き）
//! - MatchResult: 商品マスタ1行ごとの照合結果

use crate::normalizer::normalize_key;
use serde::{Deserialize, Serialize};

/// セル由来の価格値（未加工）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawPrice {
    #[default]
    Empty,
    Number(f64),
    Text(String),
}

impl RawPrice {
    pub fn is_empty(&self) -> bool {
        match self {
            RawPrice::Empty => true,
            RawPrice::Number(_) => false,
            RawPrice::Text(s) => s.trim().is_empty(),
        }
    }

    /// 数値として解釈する（カンマ除去・前後空白除去）
    ///
    /// 解釈できない、または有限でない場合は `None`
    pub fn parse(&self) -> Option<f64> {
        if self.is_empty() {
            return None;
        }
        let value = match self {
            RawPrice::Empty => return None,
            RawPrice::Number(n) => *n,
            RawPrice::Text(s) => s.replace(',', "").trim().parse::<f64>().ok()?,
        };
        value.is_finite().then_some(value)
    }
}

impl From<i64> for RawPrice {
    fn from(value: i64) -> Self {
        RawPrice::Number(value as f64)
    }
}

impl From<f64> for RawPrice {
    fn from(value: f64) -> Self {
        RawPrice::Number(value)
    }
}

impl From<&str> for RawPrice {
    fn from(value: &str) -> Self {
        RawPrice::Text(value.to_string())
    }
}

impl<T: Into<RawPrice>> From<Option<T>> for RawPrice {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}

impl std::fmt::Display for RawPrice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RawPrice::Empty => Ok(()),
            RawPrice::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            RawPrice::Number(n) => write!(f, "{}", n),
            RawPrice::Text(s) => write!(f, "{}", s),
        }
    }
}

/// 照合用レコード
///
/// 正規化キーは生成時に一度だけ計算する
#[derive(Debug, Clone, Default, Serialize)]
pub struct Record {
    pub name: String,
    pub model: String,
    pub price: RawPrice,
    normalized_name: String,
    normalized_model: String,
}

impl Record {
    pub fn new(name: impl Into<String>, model: impl Into<String>, price: impl Into<RawPrice>) -> Self {
        let name = name.into();
        let model = model.into();
        Self {
            normalized_name: normalize_key(Some(&name)),
            normalized_model: normalize_key(Some(&model)),
            name,
            model,
            price: price.into(),
        }
    }

    pub fn normalized_name(&self) -> &str {
        &self.normalized_name
    }

    pub fn normalized_model(&self) -> &str {
        &self.normalized_model
    }
}

/// 商品マスタ側レコード
#[derive(Debug, Clone, Default, Serialize)]
pub struct CatalogRecord {
    pub record: Record,
    /// レアリティ（AR補正の判定用）
    pub rarity_tag: String,
}

impl CatalogRecord {
    pub fn new(record: Record, rarity_tag: impl Into<String>) -> Self {
        Self {
            record,
            rarity_tag: rarity_tag.into(),
        }
    }
}

/// 商品マスタ1行分の照合結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub catalog_index: usize,
    /// 候補が1件もなかった場合は `None`
    pub source_index: Option<usize>,
    pub name_similarity: f64,
    pub model_similarity: f64,
    pub average_similarity: f64,
    pub above_threshold: bool,
}
