//! 商品マスタ × 買取表 の照合
//!
//! 商品マスタを先頭から1行ずつ処理し、買取表の中から最も近い1行を選ぶ。
//!
//! ## 処理フロー
//! 1. バケットから候補を取得（完全キー → 型番先頭 → 名前先頭 → 全件）
//! 2. 変種マーカー（例: 「ひかる」「旧」）による絞り込み
//! 3. 全候補を採点し、全体ベストと未使用ベストを同時に追跡
//! 4. 未使用ベストが閾値以上ならそれを、そうでなければ全体ベストを採用
//!
//! 一度決めた割り当ては後の行のために見直さない（全体最適ではない）。

use crate::bucket::BucketIndex;
use crate::config::MatchConfig;
use crate::similarity::similarity;
use crate::types::{CatalogRecord, MatchResult, Record};
use std::collections::HashSet;

/// 1回の照合実行の状態
///
/// 既に採用された買取表の行番号を保持する。実行ごとに新しく作る。
#[derive(Debug, Clone, Default)]
pub struct MatchContext {
    used: HashSet<usize>,
}

impl MatchContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_used(&self, source_index: usize) -> bool {
        self.used.contains(&source_index)
    }

    /// 採用済みにする。既に採用済みだった場合は `false`
    pub fn claim(&mut self, source_index: usize) -> bool {
        self.used.insert(source_index)
    }
}

#[derive(Debug, Clone, Copy)]
struct Scored {
    index: usize,
    name_sim: f64,
    model_sim: f64,
    score: f64,
}

/// 全体ベストと未使用ベスト
///
/// どちらも「現在値より真に大きい」ときだけ更新するので、同点は先に見た候補が残る。
#[derive(Debug, Default)]
struct BestPair {
    overall: Option<Scored>,
    unused: Option<Scored>,
}

impl BestPair {
    fn offer(&mut self, candidate: Scored, used: bool) {
        if self.overall.map_or(true, |b| candidate.score > b.score) {
            self.overall = Some(candidate);
        }
        if !used && self.unused.map_or(true, |b| candidate.score > b.score) {
            self.unused = Some(candidate);
        }
    }

    /// 類似度は1.0を超えないので、両方が1.0に達したら以降の候補で更新されることはない
    fn saturated(&self) -> bool {
        matches!(
            (self.overall, self.unused),
            (Some(o), Some(u)) if o.score >= 1.0 && u.score >= 1.0
        )
    }
}

/// 照合器
pub struct Matcher<'a> {
    source: &'a [Record],
    index: BucketIndex,
    config: MatchConfig,
}

impl<'a> Matcher<'a> {
    /// 買取表からバケット索引を作成する
    pub fn new(source: &'a [Record], config: MatchConfig) -> Self {
        let index = BucketIndex::build(source, config.fragment_len);
        Self {
            source,
            index,
            config,
        }
    }

    /// 候補の行番号を買取表の並び順で返す
    pub fn candidates(&self, catalog: &Record) -> Vec<usize> {
        let key = self.index.key_for(catalog);
        let base = self.index.candidates(&key);
        self.filter_by_markers(catalog, base)
    }

    /// 変種マーカーによる絞り込み
    ///
    /// 絞り込んだ結果が空なら元の候補に戻す
    fn filter_by_markers(&self, catalog: &Record, base: &[usize]) -> Vec<usize> {
        let variant = self.config.variant_marker.as_str();
        let legacy = self.config.legacy_marker.as_str();

        if variant.is_empty() || !catalog.name.contains(variant) {
            return base.to_vec();
        }

        let mut filtered: Vec<usize> = base
            .iter()
            .copied()
            .filter(|&j| self.source[j].name.contains(variant))
            .collect();

        if !legacy.is_empty() && catalog.name.contains(legacy) {
            let legacy_only: Vec<usize> = filtered
                .iter()
                .copied()
                .filter(|&j| self.source[j].name.contains(legacy))
                .collect();
            if !legacy_only.is_empty() {
                filtered = legacy_only;
            }
        }

        if filtered.is_empty() {
            base.to_vec()
        } else {
            filtered
        }
    }

    /// 商品マスタ1行を照合する
    ///
    /// 採用した買取表の行は `ctx` に記録される（閾値未満の採用も含む）
    pub fn match_record(
        &self,
        ctx: &mut MatchContext,
        catalog_index: usize,
        catalog: &Record,
    ) -> MatchResult {
        let mut best = BestPair::default();

        for j in self.candidates(catalog) {
            let target = &self.source[j];
            let name_sim = similarity(catalog.normalized_name(), target.normalized_name());
            let model_sim = similarity(catalog.normalized_model(), target.normalized_model());
            let scored = Scored {
                index: j,
                name_sim,
                model_sim,
                score: (name_sim + model_sim) / 2.0,
            };
            best.offer(scored, ctx.is_used(j));

            if best.saturated() {
                break;
            }
        }

        let chosen = match best.unused {
            Some(unused) if unused.score >= self.config.threshold => Some(unused),
            _ => best.overall,
        };

        match chosen {
            Some(c) => {
                ctx.claim(c.index);
                MatchResult {
                    catalog_index,
                    source_index: Some(c.index),
                    name_similarity: c.name_sim,
                    model_similarity: c.model_sim,
                    average_similarity: c.score,
                    above_threshold: c.score >= self.config.threshold,
                }
            }
            None => MatchResult {
                catalog_index,
                source_index: None,
                name_similarity: 0.0,
                model_similarity: 0.0,
                average_similarity: 0.0,
                above_threshold: false,
            },
        }
    }

    /// 商品マスタ全体を順に照合する
    pub fn match_all(&self, catalog: &[CatalogRecord]) -> Vec<MatchResult> {
        let mut ctx = MatchContext::new();
        catalog
            .iter()
            .enumerate()
            .map(|(i, c)| self.match_record(&mut ctx, i, &c.record))
            .collect()
    }
}
