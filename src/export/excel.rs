//! Excel出力（rust_xlsxwriter）

use crate::error::{RepriceError, Result};
use crate::workbook::{Cell, Sheet};
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::path::Path;

fn position(row: usize, col: usize) -> Result<(u32, u16)> {
    let r = u32::try_from(row)
        .map_err(|_| RepriceError::ExcelGeneration(format!("行番号が大きすぎます: {}", row)))?;
    let c = u16::try_from(col)
        .map_err(|_| RepriceError::ExcelGeneration(format!("列番号が大きすぎます: {}", col)))?;
    Ok((r, c))
}

/// シート書き出し時の書式
struct CellFormats {
    /// 1行目（列名）用。`None` なら書式なし
    header: Option<Format>,
    date: Format,
    datetime: Format,
}

impl CellFormats {
    fn new(bold_header: bool) -> Self {
        Self {
            header: bold_header.then(|| Format::new().set_bold()),
            date: Format::new().set_num_format("yyyy-mm-dd"),
            datetime: Format::new().set_num_format("yyyy-mm-dd hh:mm:ss"),
        }
    }
}

fn write_cell(worksheet: &mut Worksheet, row: u32, col: u16, cell: &Cell, header: Option<&Format>, formats: &CellFormats) -> Result<()> {
    match (cell, header) {
        (Cell::Empty, _) => {}
        (Cell::Text(s), Some(f)) => {
            worksheet.write_string_with_format(row, col, s, f)?;
        }
        (Cell::Text(s), None) => {
            worksheet.write_string(row, col, s)?;
        }
        (Cell::Int(i), _) => {
            worksheet.write_number(row, col, *i as f64)?;
        }
        (Cell::Float(f), _) => {
            worksheet.write_number(row, col, *f)?;
        }
        (Cell::Bool(b), _) => {
            worksheet.write_boolean(row, col, *b)?;
        }
        (Cell::DateTime(serial), _) => {
            let format = if serial.fract() == 0.0 { &formats.date } else { &formats.datetime };
            worksheet.write_number_with_format(row, col, *serial, format)?;
        }
    }
    Ok(())
}

fn write_sheet(workbook: &mut Workbook, sheet: &Sheet, formats: &CellFormats) -> Result<()> {
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(&sheet.name)?;

    for (r, row) in sheet.rows.iter().enumerate() {
        let header = if r == 0 { formats.header.as_ref() } else { None };
        for (c, cell) in row.iter().enumerate() {
            let (xr, xc) = position(r, c)?;
            write_cell(worksheet, xr, xc, cell, header, formats)?;
        }
    }

    if formats.header.is_some() && !sheet.rows.is_empty() {
        worksheet.set_freeze_panes(1, 0)?;
    }
    Ok(())
}

fn prepare_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// 1行目を列名として太字にしたブックを書き出す
pub fn write_workbook(sheets: &[Sheet], path: &Path) -> Result<()> {
    prepare_parent(path)?;

    let formats = CellFormats::new(true);
    let mut workbook = Workbook::new();
    for sheet in sheets {
        write_sheet(&mut workbook, sheet, &formats)?;
    }
    workbook.save(path)?;
    Ok(())
}

/// セルをそのまま書き出す（日付以外は書式なし）
pub fn write_grid(sheet: &Sheet, path: &Path) -> Result<()> {
    prepare_parent(path)?;

    let mut workbook = Workbook::new();
    write_sheet(&mut workbook, sheet, &CellFormats::new(false))?;
    workbook.save(path)?;
    Ok(())
}
