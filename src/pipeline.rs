//! 照合結果から出力用のシートを組み立てる

use crate::config::{Config, OutputConfig};
use crate::error::Result;
use crate::export;
use crate::source::SourceRow;
use crate::workbook::{CatalogSheet, Cell, Sheet};
use cardrush_reprice_common::{MatchResult, PriceOutcome, Reconciliation, RepricedEntry};
use std::path::{Path, PathBuf};

pub const EXTRACT_SHEET: &str = "Sheet1_一致抽出";
pub const REPORT_SHEET: &str = "照合レポート";
pub const SUMMARY_SHEET: &str = "サマリー";

const EXTRACT_EXTRA_HEADERS: [&str; 5] = ["s1_idx", "S2_照合価格", "S2_照合名前", "S2_照合型番", "平均一致率"];

const REPORT_HEADERS: [&str; 10] = [
    "S1_名前",
    "S1_型番",
    "S1_価格",
    "S2_名前",
    "S2_型番",
    "S2_価格",
    "名前一致率",
    "型番一致率",
    "平均一致率",
    "閾値以上",
];

/// 出力先ファイル
#[derive(Debug, Clone, PartialEq)]
pub struct OutputPaths {
    pub match_file: PathBuf,
    pub updated_sheet: PathBuf,
    pub upload_csv: PathBuf,
}

impl OutputPaths {
    /// 出力ディレクトリ未指定時は商品マスタと同じ場所
    pub fn resolve(workbook: &Path, output_dir: Option<&Path>, output: &OutputConfig) -> Self {
        let dir = output_dir
            .map(Path::to_path_buf)
            .or_else(|| workbook.parent().map(Path::to_path_buf))
            .unwrap_or_else(|| PathBuf::from("."));

        let stem = workbook
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("catalog");

        Self {
            match_file: dir.join(&output.match_file),
            updated_sheet: dir.join(format!("{}{}.xlsx", stem, output.updated_suffix)),
            upload_csv: dir.join(&output.upload_csv),
        }
    }
}

fn padded(row: &[Cell], width: usize) -> Vec<Cell> {
    let mut row = row.to_vec();
    if row.len() < width {
        row.resize(width, Cell::Empty);
    }
    row
}

/// 一致行（価格列を値付け後の価格に置き換えたもの）
pub fn repriced_row(catalog: &CatalogSheet, entry: &RepricedEntry) -> Vec<Cell> {
    let price_col = catalog.columns.price;
    let mut row = padded(catalog.row(entry.catalog_index), price_col + 1);

    // フォールバック時は元のセルをそのまま残す
    if let PriceOutcome::Adjusted(price) = entry.price {
        row[price_col] = Cell::Int(price);
    }
    row
}

/// `Sheet1_一致抽出`: 一致行 + 照合先の情報
pub fn extract_sheet(catalog: &CatalogSheet, source: &[SourceRow], recon: &Reconciliation) -> Sheet {
    let width = catalog.sheet.width();

    let mut header = padded(catalog.header(), width);
    header.extend(EXTRACT_EXTRA_HEADERS.iter().map(|&h| Cell::from(h)));

    let mut rows = vec![header];
    for entry in &recon.repriced {
        let mut row = padded(&repriced_row(catalog, entry), width);
        let matched = source.get(entry.source_index);

        row.push(Cell::Int(entry.catalog_index as i64));
        row.push(matched.map(|s| Cell::Int(s.price)).unwrap_or_default());
        row.push(matched.map(|s| Cell::from(s.name.as_str())).unwrap_or_default());
        row.push(matched.map(|s| Cell::from(s.model.as_str())).unwrap_or_default());
        row.push(Cell::Float(entry.average_similarity));
        rows.push(row);
    }

    Sheet {
        name: EXTRACT_SHEET.into(),
        rows,
    }
}

fn report_row(catalog: &CatalogSheet, source: &[SourceRow], result: &MatchResult) -> Vec<Cell> {
    let mut row = Vec::with_capacity(REPORT_HEADERS.len());

    match catalog.records.get(result.catalog_index) {
        Some(c) => {
            row.push(Cell::from(c.record.name.as_str()));
            row.push(Cell::from(c.record.model.as_str()));
            row.push(Cell::from(&c.record.price));
        }
        None => row.extend([Cell::Empty, Cell::Empty, Cell::Empty]),
    }

    match result.source_index.and_then(|j| source.get(j)) {
        Some(s) => {
            row.push(Cell::from(s.name.as_str()));
            row.push(Cell::from(s.model.as_str()));
            row.push(Cell::Int(s.price));
        }
        None => row.extend([Cell::Empty, Cell::Empty, Cell::Empty]),
    }

    row.push(Cell::Float(result.name_similarity));
    row.push(Cell::Float(result.model_similarity));
    row.push(Cell::Float(result.average_similarity));
    row.push(Cell::Bool(result.above_threshold));
    row
}

/// `照合レポート`: 商品マスタ1行につき1行
pub fn report_sheet(catalog: &CatalogSheet, source: &[SourceRow], recon: &Reconciliation) -> Sheet {
    let mut rows = vec![REPORT_HEADERS.iter().map(|&h| Cell::from(h)).collect::<Vec<_>>()];
    rows.extend(recon.matches.iter().map(|m| report_row(catalog, source, m)));

    Sheet {
        name: REPORT_SHEET.into(),
        rows,
    }
}

/// `サマリー`: 件数と実行日時
pub fn summary_sheet(recon: &Reconciliation, config: &Config) -> Sheet {
    let stats = &recon.stats;
    let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();

    let count = |n: usize| Cell::Int(n as i64);
    let rows = vec![
        vec![Cell::from("項目"), Cell::from("値")],
        vec![Cell::from("実行日時"), Cell::Text(now)],
        vec![Cell::from("商品マスタ行数"), count(stats.catalog_rows)],
        vec![Cell::from("買取表行数"), count(stats.source_rows)],
        vec![Cell::from("一致行数"), count(stats.matched_rows)],
        vec![Cell::from("重複割当行数"), count(stats.reused_rows)],
        vec![Cell::from("価格変換不可（元の価格のまま）"), count(stats.price_fallbacks)],
        vec![Cell::from("閾値"), Cell::Float(config.matching.threshold)],
    ];

    Sheet {
        name: SUMMARY_SHEET.into(),
        rows,
    }
}

/// 更新シート: 先頭 `preserved_rows` 行はそのまま、続けて一致行
pub fn updated_sheet(catalog: &CatalogSheet, recon: &Reconciliation, preserved_rows: usize) -> Sheet {
    let mut rows: Vec<Vec<Cell>> = catalog
        .sheet
        .rows
        .iter()
        .take(preserved_rows)
        .cloned()
        .collect();
    rows.resize(preserved_rows, Vec::new());

    rows.extend(recon.repriced.iter().map(|e| repriced_row(catalog, e)));

    Sheet {
        name: catalog.sheet.name.clone(),
        rows,
    }
}

/// 書き出したファイル
#[derive(Debug, Clone, Default)]
pub struct WrittenFiles {
    pub match_file: Option<PathBuf>,
    pub updated_sheet: Option<PathBuf>,
    pub upload_csv: Option<PathBuf>,
}

/// 照合結果を書き出す
///
/// 一致行が無い場合は一致抽出ファイル（レポート）だけを書く
pub fn write_outputs(
    catalog: &CatalogSheet,
    source: &[SourceRow],
    recon: &Reconciliation,
    config: &Config,
    paths: &OutputPaths,
) -> Result<WrittenFiles> {
    let mut written = WrittenFiles::default();

    let sheets = [
        extract_sheet(catalog, source, recon),
        report_sheet(catalog, source, recon),
        summary_sheet(recon, config),
    ];
    export::excel::write_workbook(&sheets, &paths.match_file)?;
    written.match_file = Some(paths.match_file.clone());

    if !recon.has_matches() {
        return Ok(written);
    }

    let updated = updated_sheet(catalog, recon, config.catalog.preserved_rows);
    export::excel::write_grid(&updated, &paths.updated_sheet)?;
    written.updated_sheet = Some(paths.updated_sheet.clone());

    export::csv::write_upload_csv(&updated, &paths.upload_csv)?;
    written.upload_csv = Some(paths.upload_csv.clone());

    Ok(written)
}
