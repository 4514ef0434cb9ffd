//! 買取表ページのHTML解析
//!
//! ページ内の最初の `<table>` だけを対象にする。

use crate::source::SourceRow;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

lazy_static::lazy_static! {
    static ref TABLE_RE: Regex = Regex::new(r"(?is)<table\b[^>]*>(.*?)</table>").unwrap();
    static ref THEAD_RE: Regex = Regex::new(r"(?is)<thead\b[^>]*>(.*?)</thead>").unwrap();
    static ref TR_RE: Regex = Regex::new(r"(?is)<tr\b[^>]*>(.*?)</tr>").unwrap();
    static ref TH_RE: Regex = Regex::new(r"(?is)<th\b[^>]*>(.*?)</th>").unwrap();
    static ref CELL_RE: Regex = Regex::new(r"(?is)<t[dh]\b[^>]*>(.*?)</t[dh]>").unwrap();
    static ref TAG_RE: Regex = Regex::new(r"(?s)<[^>]*>").unwrap();
    static ref ENTITY_RE: Regex = Regex::new(r"&(#[xX][0-9a-fA-F]+|#[0-9]+|[a-zA-Z]+);").unwrap();
    static ref DIGITS_RE: Regex = Regex::new(r"[0-9]+").unwrap();

    // 型番抽出パターン
    static ref MODEL_CANDIDATE_RE: Regex = Regex::new(r"[A-Za-z0-9]+/[A-Za-z0-9]+").unwrap();
    static ref ALT_MODEL_RE: Regex =
        Regex::new(r"[A-Za-z0-9]{1,6}[-/][A-Za-z0-9]{1,10}(?:/[0-9]{1,6})?").unwrap();
}

/// 列位置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    pub name: usize,
    pub model: usize,
    /// 未検出なら最終セル
    pub price: Option<usize>,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self {
            name: 0,
            model: 3,
            price: None,
        }
    }
}

fn decode_entity(entity: &str) -> Option<String> {
    let decoded = match entity {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => ' ',
        "yen" => '¥',
        _ => {
            let code = if let Some(hex) = entity.strip_prefix("#x").or(entity.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok()?
            } else if let Some(dec) = entity.strip_prefix('#') {
                dec.parse::<u32>().ok()?
            } else {
                return None;
            };
            char::from_u32(code)?
        }
    };
    Some(decoded.to_string())
}

/// 要素内のテキスト（タグは空白に置換、空白は1つにまとめる）
pub fn cell_text(inner_html: &str) -> String {
    let without_tags = TAG_RE.replace_all(inner_html, " ");
    let decoded = ENTITY_RE.replace_all(&without_tags, |caps: &regex::Captures| {
        decode_entity(&caps[1]).unwrap_or_else(|| caps[0].to_string())
    });
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// ヘッダ文字列から列位置を推定する（後の列が優先）
pub fn detect_columns(headers: &[String]) -> ColumnLayout {
    let mut layout = ColumnLayout::default();
    let mut name = None;
    let mut model = None;

    for (i, h) in headers.iter().enumerate() {
        let hl = h.to_lowercase();
        if ["カード", "商品", "name"].iter().any(|k| hl.contains(k)) {
            name = Some(i);
        }
        if ["型番", "型", "code", "model", "品番", "番号"].iter().any(|k| hl.contains(k)) {
            model = Some(i);
        }
        if ["買取", "買", "価格", "円", "price"].iter().any(|k| hl.contains(k)) {
            layout.price = Some(i);
        }
    }

    layout.name = name.unwrap_or(layout.name);
    layout.model = model.unwrap_or(layout.model);
    layout
}

fn table_headers(table: &str) -> Vec<String> {
    let header_html = match THEAD_RE.captures(table) {
        Some(caps) => caps.get(1).map(|m| m.as_str()).unwrap_or_default(),
        None => match TR_RE.captures(table) {
            Some(caps) => caps.get(1).map(|m| m.as_str()).unwrap_or_default(),
            None => return Vec::new(),
        },
    };

    TH_RE
        .captures_iter(header_html)
        .map(|caps| cell_text(&caps[1]))
        .collect()
}

/// 価格文字列から数値を取り出す（NFKC正規化、¥・円・カンマ除去後、最初の数字列）
pub fn parse_price(text: &str) -> Option<i64> {
    if text.is_empty() {
        return None;
    }
    let s = text.nfkc().collect::<String>().replace(['¥', '円', ','], "");
    DIGITS_RE.find(s.trim())?.as_str().parse().ok()
}

fn is_header_like(cells: &[String]) -> bool {
    let joined = cells.join(" ");
    (joined.contains("カード") && joined.contains("買取"))
        || (joined.contains("商品") && joined.contains("価格"))
}

fn extract_model(cells: &[String]) -> String {
    if let Some(m) = cells.iter().find_map(|c| MODEL_CANDIDATE_RE.find(c)) {
        return m.as_str().to_string();
    }
    ALT_MODEL_RE
        .find(&cells.join(" "))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// 1ページ分のHTMLからカード情報を取り出す
///
/// `min_price` 以下・価格なしの行は除外する
pub fn parse_page(html: &str, min_price: i64) -> Vec<SourceRow> {
    let Some(table) = TABLE_RE.captures(html).and_then(|c| c.get(1)) else {
        return Vec::new();
    };
    let table = table.as_str();

    let layout = detect_columns(&table_headers(table));
    let mut results = Vec::new();

    for tr in TR_RE.captures_iter(table) {
        let cells: Vec<String> = CELL_RE
            .captures_iter(&tr[1])
            .map(|caps| cell_text(&caps[1]))
            .collect();
        if cells.is_empty() || is_header_like(&cells) {
            continue;
        }

        let name = cells.get(layout.name).cloned().unwrap_or_default();
        let mut model = cells.get(layout.model).cloned().unwrap_or_default();
        if model.is_empty() {
            model = extract_model(&cells);
        }

        let price_cell = match layout.price {
            Some(i) if i < cells.len() => cells[i].as_str(),
            _ => cells.last().map(String::as_str).unwrap_or_default(),
        };
        let Some(price) = parse_price(price_cell) else {
            continue;
        };
        if price <= min_price {
            continue;
        }

        results.push(SourceRow {
            name: name.trim().to_string(),
            model: model.trim().to_string(),
            price,
        });
    }

    results
}
