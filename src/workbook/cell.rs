use calamine::Data;
use cardrush_reprice_common::RawPrice;
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// シートの1セル
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Cell {
    #[default]
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    /// Excelのシリアル値（1900年基準）
    DateTime(f64),
}

/// シリアル値 → 日時（1900年基準、1900-03-01 以降を想定）
pub fn serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let millis = (serial * MILLIS_PER_DAY).round() as i64;
    epoch.checked_add_signed(TimeDelta::try_milliseconds(millis)?)
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// 文字列として取り出す（空セルは空文字列）
    ///
    /// 整数値の Float は小数点なしで表記する
    pub fn as_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.clone(),
            Cell::Int(i) => i.to_string(),
            Cell::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => (*f as i64).to_string(),
            Cell::Float(f) => f.to_string(),
            Cell::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
            Cell::DateTime(serial) => match serial_to_datetime(*serial) {
                Some(dt) if serial.fract() == 0.0 => dt.format("%Y-%m-%d").to_string(),
                Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
                None => serial.to_string(),
            },
        }
    }

    pub fn to_raw_price(&self) -> RawPrice {
        match self {
            Cell::Empty => RawPrice::Empty,
            Cell::Text(s) => RawPrice::Text(s.clone()),
            Cell::Int(i) => RawPrice::Number(*i as f64),
            Cell::Float(f) => RawPrice::Number(*f),
            Cell::Bool(_) | Cell::DateTime(_) => RawPrice::Text(self.as_text()),
        }
    }
}

impl From<&Data> for Cell {
    fn from(data: &Data) -> Self {
        match data {
            Data::Empty => Cell::Empty,
            Data::String(s) => Cell::Text(s.clone()),
            Data::Int(i) => Cell::Int(*i),
            Data::Float(f) => Cell::Float(*f),
            Data::Bool(b) => Cell::Bool(*b),
            Data::DateTime(dt) if dt.is_datetime() => Cell::DateTime(dt.as_f64()),
            Data::DateTime(dt) => Cell::Float(dt.as_f64()),
            Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
            Data::Error(e) => Cell::Text(e.to_string()),
        }
    }
}

impl From<&RawPrice> for Cell {
    fn from(price: &RawPrice) -> Self {
        match price {
            RawPrice::Empty => Cell::Empty,
            RawPrice::Number(n) => Cell::Float(*n),
            RawPrice::Text(s) => Cell::Text(s.clone()),
        }
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Int(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}
