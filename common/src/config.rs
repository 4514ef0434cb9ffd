//! 照合・値付けの設定値

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 照合設定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// 名前＋型番の一致率平均がこれ以上なら同一カードとみなす
    pub threshold: f64,
    /// バケットキーに使う先頭文字数
    pub fragment_len: usize,
    /// 商品名にこれを含む場合、候補も同じ文字列を含むものに絞る
    pub variant_marker: String,
    /// variant_marker に加えてこれを含む場合、さらに絞り込む
    pub legacy_marker: String,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            threshold: 0.90,
            fragment_len: 3,
            variant_marker: "ひかる".into(),
            legacy_marker: "旧".into(),
        }
    }
}

impl MatchConfig {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(Error::InvalidConfig(format!(
                "threshold は 0.0〜1.0 の範囲で指定してください: {}",
                self.threshold
            )));
        }
        if self.fragment_len == 0 {
            return Err(Error::InvalidConfig("fragment_len は1以上".into()));
        }
        Ok(())
    }
}

/// 値付けルール
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceRules {
    /// 個別マッピング（完全一致）
    pub overrides: BTreeMap<i64, i64>,
    /// 10000円以上に掛ける倍率
    pub markup: f64,
    /// 倍率を適用する下限
    pub markup_floor: i64,
    /// 倍率適用後、この金額以上は無条件で1000円単位切り上げ
    pub round_up_from: i64,
    /// 最低価格補正の対象レアリティ
    pub rarity_tag: String,
    /// この金額以下なら補正
    pub rarity_ceiling: i64,
    /// 補正後の価格
    pub rarity_floor: i64,
}

impl Default for PriceRules {
    fn default() -> Self {
        let overrides = [
            (100, 50),
            (150, 50),
            (200, 100),
            (300, 150),
            (400, 200),
            (500, 300),
            (600, 400),
            (700, 500),
            (800, 600),
            (900, 700),
            (1000, 800),
        ]
        .into_iter()
        .collect();

        Self {
            overrides,
            markup: 1.05,
            markup_floor: 10_000,
            round_up_from: 40_000,
            rarity_tag: "AR".into(),
            rarity_ceiling: 299,
            rarity_floor: 300,
        }
    }
}

impl PriceRules {
    pub fn validate(&self) -> Result<()> {
        if !self.markup.is_finite() || self.markup <= 0.0 {
            return Err(Error::InvalidConfig(format!("markup が不正: {}", self.markup)));
        }
        Ok(())
    }
}
