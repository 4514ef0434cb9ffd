//! 商品マスタ（Excel）読み込み
//!
//! calamine でシートをセルの2次元配列として読み込み、
//! 列文字（C, F, O, G）で名前・型番・価格・レアリティを取り出す。

mod cell;

pub use cell::Cell;

use crate::config::CatalogLayout;
use crate::error::{RepriceError, Result};
use calamine::{open_workbook_auto, Reader};
use cardrush_reprice_common::{CatalogRecord, Record};
use std::path::Path;

static EMPTY_CELL: Cell = Cell::Empty;

/// 列文字 → 0始まりの列番号（A=0, Z=25, AA=26）
pub fn column_index(letter: &str) -> Option<usize> {
    let letter = letter.trim();
    if letter.is_empty() {
        return None;
    }

    let mut index = 0usize;
    for c in letter.chars() {
        if !c.is_ascii_alphabetic() {
            return None;
        }
        let digit = (c.to_ascii_uppercase() as u8 - b'A') as usize + 1;
        index = index.checked_mul(26)?.checked_add(digit)?;
    }
    Some(index - 1)
}

/// シート全体（左上 A1 起点）
#[derive(Debug, Clone, Default)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Vec<Cell>>,
}

impl Sheet {
    /// 最長行の列数
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY_CELL)
    }
}

/// Excelファイルから指定シートを読み込む
pub fn read_sheet(path: &Path, sheet_name: &str) -> Result<Sheet> {
    if !path.exists() {
        return Err(RepriceError::FileNotFound(path.display().to_string()));
    }

    let mut workbook = open_workbook_auto(path)?;
    if !workbook.sheet_names().iter().any(|n| n == sheet_name) {
        return Err(RepriceError::SheetNotFound(format!(
            "{} ({})",
            sheet_name,
            path.display()
        )));
    }

    let range = workbook.worksheet_range(sheet_name)?;

    // calamine の Range は使用範囲の左上から始まるので A1 起点に揃える
    let (start_row, start_col) = range
        .start()
        .map(|(r, c)| (r as usize, c as usize))
        .unwrap_or((0, 0));

    let mut rows: Vec<Vec<Cell>> = vec![Vec::new(); start_row];
    for data_row in range.rows() {
        let mut row = vec![Cell::Empty; start_col];
        row.extend(data_row.iter().map(Cell::from));
        while matches!(row.last(), Some(Cell::Empty)) {
            row.pop();
        }
        rows.push(row);
    }

    Ok(Sheet {
        name: sheet_name.to_string(),
        rows,
    })
}

/// 商品マスタで使う列番号
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogColumns {
    pub name: usize,
    pub model: usize,
    pub price: usize,
    pub rarity: usize,
}

impl CatalogColumns {
    /// 列文字を解決し、シート幅を超える列があればエラー
    pub fn resolve(layout: &CatalogLayout, width: usize) -> Result<Self> {
        let resolve_one = |letter: &str| -> Result<usize> {
            let idx = column_index(letter)
                .ok_or_else(|| RepriceError::Config(format!("列指定が不正: {:?}", letter)))?;
            if idx >= width {
                return Err(cardrush_reprice_common::Error::MissingColumn {
                    side: layout.sheet_name.clone(),
                    column: letter.to_string(),
                    width,
                }
                .into());
            }
            Ok(idx)
        };

        Ok(Self {
            name: resolve_one(&layout.name_column)?,
            model: resolve_one(&layout.model_column)?,
            price: resolve_one(&layout.price_column)?,
            rarity: resolve_one(&layout.rarity_column)?,
        })
    }
}

/// 読み込み済みの商品マスタ
#[derive(Debug, Clone)]
pub struct CatalogSheet {
    pub sheet: Sheet,
    pub columns: CatalogColumns,
    pub header_rows: usize,
    /// records[i] に対応するシート上の行番号（0始まり）
    pub row_numbers: Vec<usize>,
    pub records: Vec<CatalogRecord>,
}

impl CatalogSheet {
    /// 列名行（header_rows の最終行）
    pub fn header(&self) -> &[Cell] {
        self.header_rows
            .checked_sub(1)
            .and_then(|i| self.sheet.rows.get(i))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// records[i] の元の行
    pub fn row(&self, catalog_index: usize) -> &[Cell] {
        self.row_numbers
            .get(catalog_index)
            .and_then(|&r| self.sheet.rows.get(r))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// シートから商品マスタを取り出す
///
/// 列の存在確認は照合前に行う。空行は読み飛ばす。
pub fn load_catalog(sheet: Sheet, layout: &CatalogLayout) -> Result<CatalogSheet> {
    let columns = CatalogColumns::resolve(layout, sheet.width())?;

    let mut row_numbers = Vec::new();
    let mut records = Vec::new();

    for (r, row) in sheet.rows.iter().enumerate().skip(layout.header_rows) {
        if row.iter().all(Cell::is_empty) {
            continue;
        }
        let get = |c: usize| row.get(c).unwrap_or(&EMPTY_CELL);

        let record = Record::new(
            get(columns.name).as_text(),
            get(columns.model).as_text(),
            get(columns.price).to_raw_price(),
        );
        records.push(CatalogRecord::new(record, get(columns.rarity).as_text()));
        row_numbers.push(r);
    }

    Ok(CatalogSheet {
        sheet,
        columns,
        header_rows: layout.header_rows,
        row_numbers,
        records,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    fn sample_sheet() -> Sheet {
        // A..O の15列（C=名前, F=型番, G=rarity, O=価格）
        let mut header = vec![Cell::Empty; 15];
        header[2] = text("display_name");
        header[5] = text("cardnumber");
        header[6] = text("rarity");
        header[14] = text("buy_price");

        let mut row1 = vec![Cell::Empty; 15];
        row1[2] = text("ピカチュウex");
        row1[5] = text("SV1-001");
        row1[6] = text("AR");
        row1[14] = Cell::Int(900);

        let mut row2 = vec![Cell::Empty; 7];
        row2[2] = text("ミュウex");
        row2[5] = Cell::Float(151.0);

        Sheet {
            name: "Sheet1".into(),
            rows: vec![header, row1, Vec::new(), row2],
        }
    }

    #[test]
    fn test_column_index() {
        assert_eq!(column_index("A"), Some(0));
        assert_eq!(column_index("c"), Some(2));
        assert_eq!(column_index("O"), Some(14));
        assert_eq!(column_index("Z"), Some(25));
        assert_eq!(column_index("AA"), Some(26));
        assert_eq!(column_index(""), None);
        assert_eq!(column_index("1"), None);
        assert_eq!(column_index("A1"), None);
    }

    #[test]
    fn test_load_catalog() {
        let catalog = load_catalog(sample_sheet(), &CatalogLayout::default()).unwrap();

        assert_eq!(catalog.records.len(), 2);
        assert_eq!(catalog.row_numbers, vec![1, 3]);
        assert_eq!(catalog.records[0].record.name, "ピカチュウex");
        assert_eq!(catalog.records[0].rarity_tag, "AR");
        assert_eq!(catalog.records[0].record.price.parse(), Some(900.0));
        assert_eq!(catalog.records[1].record.model, "151");
        assert!(catalog.records[1].record.price.is_empty());
        assert_eq!(catalog.header()[2], text("display_name"));
        assert_eq!(catalog.row(1)[2], text("ミュウex"));
    }

    #[test]
    fn test_missing_column_is_reported_before_matching() {
        let mut sheet = sample_sheet();
        for row in &mut sheet.rows {
            row.truncate(10);
        }
        let err = load_catalog(sheet, &CatalogLayout::default()).unwrap_err();
        assert!(matches!(
            err,
            RepriceError::Common(cardrush_reprice_common::Error::MissingColumn { .. })
        ));
        assert!(err.to_string().contains("O"));
    }

    #[test]
    fn test_read_sheet_missing_file() {
        let result = read_sheet(Path::new("/nonexistent/pokeca_rush.xlsm"), "Sheet1");
        assert!(matches!(result, Err(RepriceError::FileNotFound(_))));
    }
}
