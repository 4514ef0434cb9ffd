//! 照合キーの正規化
//!
//! NFKC正規化 → 小文字化 → 記号・括弧・空白の除去

use unicode_normalization::UnicodeNormalization;

/// 除去する文字（全角・半角の括弧、星・中黒、スラッシュ、ハイフン等）
const STRIP_CHARS: &[char] = &[
    '（', '）', '[', ']', '(', ')', '「', '」', '『', '』', '【', '】',
    '★', '☆', '・', '/', '\\', '-', '_', '　', ' ', '：', ':',
];

/// 除去で結合文字が隣接した場合の再正規化上限
const MAX_PASSES: usize = 8;

fn normalize_pass(s: &str) -> String {
    s.nfkc()
        .collect::<String>()
        .to_lowercase()
        .chars()
        .filter(|c| !STRIP_CHARS.contains(c))
        .collect()
}

/// 文字列を照合キーに変換する
///
/// `None` は空文字列になる。結果は再度適用しても変化しない。
pub fn normalize_key(s: Option<&str>) -> String {
    let Some(s) = s else {
        return String::new();
    };

    let mut current = normalize_pass(s);
    for _ in 0..MAX_PASSES {
        let next = normalize_pass(&current);
        if next == current {
            break;
        }
        current = next;
    }
    current
}
