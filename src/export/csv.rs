//! Mycaアップロード用CSV（UTF-8 BOM付き・ヘッダなし）

use crate::error::Result;
use crate::workbook::Sheet;
use std::io::Write;
use std::path::Path;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// シート全体をCSVに書き出す（列数は最長行に揃える）
pub fn write_upload_csv(sheet: &Sheet, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut file = std::fs::File::create(path)?;
    file.write_all(UTF8_BOM)?;

    let width = sheet.width();
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);
    for row in &sheet.rows {
        let record: Vec<String> = (0..width)
            .map(|c| row.get(c).map(|cell| cell.as_text()).unwrap_or_default())
            .collect();
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}
