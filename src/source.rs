//! 買取表（CardRush）の行と CSV キャッシュ

use crate::error::{RepriceError, Result};
use cardrush_reprice_common::Record;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// 買取表の1行（A=名前 / B=型番 / C=価格）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceRow {
    pub name: String,
    #[serde(default)]
    pub model: String,
    pub price: i64,
}

impl SourceRow {
    pub fn to_record(&self) -> Record {
        Record::new(self.name.as_str(), self.model.as_str(), self.price)
    }
}

/// (名前, 型番, 価格) の重複を除く（先に出た行を残す）
pub fn dedupe(rows: Vec<SourceRow>) -> Vec<SourceRow> {
    let mut seen = HashSet::new();
    rows.into_iter().filter(|r| seen.insert(r.clone())).collect()
}

pub fn to_records(rows: &[SourceRow]) -> Vec<Record> {
    rows.iter().map(SourceRow::to_record).collect()
}

pub fn write_csv(rows: &[SourceRow], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut writer = csv::WriterBuilder::new().from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn read_csv(path: &Path) -> Result<Vec<SourceRow>> {
    if !path.exists() {
        return Err(RepriceError::FileNotFound(path.display().to_string()));
    }

    let mut reader = csv::ReaderBuilder::new().from_path(path)?;
    let mut rows = Vec::new();
    for row in reader.deserialize() {
        rows.push(row?);
    }
    Ok(rows)
}
