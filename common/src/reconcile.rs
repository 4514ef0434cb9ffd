//! 照合 → 値付け の一括処理

use crate::config::{MatchConfig, PriceRules};
use crate::error::Result;
use crate::matcher::Matcher;
use crate::price::{transform, PriceOutcome};
use crate::types::{CatalogRecord, MatchResult, RawPrice, Record};
use serde::Serialize;
use std::collections::HashSet;

/// 閾値以上で一致した商品マスタ行の値付け結果
#[derive(Debug, Clone, PartialEq)]
pub struct RepricedEntry {
    pub catalog_index: usize,
    pub source_index: usize,
    pub average_similarity: f64,
    /// フォールバック時は商品マスタの元の価格
    pub price: PriceOutcome<RawPrice>,
}

/// 統計情報
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReconcileStats {
    pub catalog_rows: usize,
    pub source_rows: usize,
    /// 閾値以上で一致した行数
    pub matched_rows: usize,
    /// 先行行と同じ買取表行が割り当てられた行数
    pub reused_rows: usize,
    /// 照合価格が使えず元の価格のままにした行数
    pub price_fallbacks: usize,
}

/// 照合結果一式
#[derive(Debug, Clone)]
pub struct Reconciliation {
    /// 商品マスタ1行につき1件（商品マスタ順）
    pub matches: Vec<MatchResult>,
    /// 閾値以上の行のみ（商品マスタ順）
    pub repriced: Vec<RepricedEntry>,
    pub stats: ReconcileStats,
}

impl Reconciliation {
    pub fn has_matches(&self) -> bool {
        !self.repriced.is_empty()
    }

    /// 値付け結果を商品マスタに反映する
    ///
    /// 価格が決まった行だけ上書きし、閾値未満・フォールバックの行は元の価格のまま
    pub fn apply(&self, catalog: &mut [CatalogRecord]) {
        for entry in &self.repriced {
            if let (PriceOutcome::Adjusted(price), Some(target)) =
                (&entry.price, catalog.get_mut(entry.catalog_index))
            {
                target.record.price = RawPrice::Number(*price as f64);
            }
        }
    }
}

/// 商品マスタを買取表と照合し、一致した行の価格を決める
pub fn reconcile(
    catalog: &[CatalogRecord],
    source: &[Record],
    match_config: &MatchConfig,
    price_rules: &PriceRules,
) -> Result<Reconciliation> {
    match_config.validate()?;
    price_rules.validate()?;

    let matcher = Matcher::new(source, match_config.clone());
    let matches = matcher.match_all(catalog);

    let mut stats = ReconcileStats {
        catalog_rows: catalog.len(),
        source_rows: source.len(),
        ..Default::default()
    };

    let mut seen = HashSet::new();
    for result in &matches {
        if let Some(j) = result.source_index {
            if !seen.insert(j) {
                stats.reused_rows += 1;
            }
        }
    }

    let repriced: Vec<RepricedEntry> = matches
        .iter()
        .filter(|m| m.above_threshold)
        .filter_map(|m| {
            let source_index = m.source_index?;
            let entry = &catalog[m.catalog_index];
            let price = transform(
                &source[source_index].price,
                entry.record.price.clone(),
                &entry.rarity_tag,
                price_rules,
            );
            Some(RepricedEntry {
                catalog_index: m.catalog_index,
                source_index,
                average_similarity: m.average_similarity,
                price,
            })
        })
        .collect();

    stats.matched_rows = repriced.len();
    stats.price_fallbacks = repriced.iter().filter(|e| e.price.is_fallback()).count();

    Ok(Reconciliation {
        matches,
        repriced,
        stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn sample() -> (Vec<CatalogRecord>, Vec<Record>) {
        let catalog = vec![
            CatalogRecord::new(Record::new("ピカチュウex", "SV1-001", 900_i64), ""),
            CatalogRecord::new(Record::new("ミュウ ex", "SV2a/151", 2000_i64), "AR"),
            CatalogRecord::new(Record::new("存在しないカード", "ZZZ-000", 100_i64), ""),
            CatalogRecord::new(Record::new("リザードンex", "SV3-100", 5000_i64), ""),
        ];
        let source = vec![
            Record::new("ピカチュウex", "SV1-001", 12345_i64),
            Record::new("ミュウex", "SV2a-151", 200_i64),
            Record::new("リザードンex", "SV3-100", "問い合わせ"),
        ];
        (catalog, source)
    }

    #[test]
    fn test_reconcile_reprices_matched_rows() {
        let (catalog, source) = sample();
        let result = reconcile(&catalog, &source, &MatchConfig::default(), &PriceRules::default()).unwrap();

        assert_eq!(result.matches.len(), 4);
        assert_eq!(result.repriced.len(), 3);
        assert!(result.has_matches());

        assert_eq!(result.repriced[0].catalog_index, 0);
        assert_eq!(result.repriced[0].price, PriceOutcome::Adjusted(13000));

        // 200 → 100 → AR補正で300
        assert_eq!(result.repriced[1].catalog_index, 1);
        assert_eq!(result.repriced[1].price, PriceOutcome::Adjusted(300));

        // 照合価格が数値でない → 元の価格
        assert_eq!(result.repriced[2].catalog_index, 3);
        assert_eq!(result.repriced[2].price, PriceOutcome::Fallback(RawPrice::Number(5000.0)));
    }

    #[test]
    fn test_reconcile_stats() {
        let (catalog, source) = sample();
        let result = reconcile(&catalog, &source, &MatchConfig::default(), &PriceRules::default()).unwrap();

        assert_eq!(
            result.stats,
            ReconcileStats {
                catalog_rows: 4,
                source_rows: 3,
                matched_rows: 3,
                reused_rows: 1,
                price_fallbacks: 1,
            }
        );
    }

    #[test]
    fn test_apply_overwrites_only_adjusted_rows() {
        let (mut catalog, source) = sample();
        let result = reconcile(&catalog, &source, &MatchConfig::default(), &PriceRules::default()).unwrap();
        result.apply(&mut catalog);

        assert_eq!(catalog.len(), 4);
        assert_eq!(catalog[0].record.price, RawPrice::Number(13000.0));
        assert_eq!(catalog[1].record.price, RawPrice::Number(300.0));
        // 閾値未満
        assert_eq!(catalog[2].record.price, RawPrice::Number(100.0));
        // フォールバック
        assert_eq!(catalog[3].record.price, RawPrice::Number(5000.0));
        assert_eq!(catalog[0].record.normalized_name(), "ピカチュウex");
    }

    #[test]
    fn test_reconcile_no_matches() {
        let catalog = vec![CatalogRecord::new(Record::new("フシギダネ", "XY-001", 100_i64), "")];
        let source = vec![Record::new("ミュウツー", "SV9-150", 5000_i64)];
        let result = reconcile(&catalog, &source, &MatchConfig::default(), &PriceRules::default()).unwrap();

        assert_eq!(result.matches.len(), 1);
        assert!(!result.has_matches());
        assert_eq!(result.stats.matched_rows, 0);
    }

    #[test]
    fn test_reconcile_rejects_invalid_config_before_matching() {
        let (catalog, source) = sample();
        let config = MatchConfig {
            threshold: -0.1,
            ..Default::default()
        };
        let result = reconcile(&catalog, &source, &config, &PriceRules::default());
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }
}
