//! 類似度計算（正規化レーベンシュタイン距離）

/// 2つの正規化済み文字列の類似度を返す（0.0〜1.0）
///
/// 両方空なら 1.0、片方だけ空なら 0.0。
/// それ以外は `1 - 距離 / 長い方の文字数`。
pub fn similarity(a: &str, b: &str) -> f64 {
    match (a.is_empty(), b.is_empty()) {
        (true, true) => return 1.0,
        (true, false) | (false, true) => return 0.0,
        (false, false) => {}
    }
    if a == b {
        return 1.0;
    }

    strsim::normalized_levenshtein(a, b).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_similarity_empty() {
        assert_eq!(similarity("", ""), 1.0);
        assert_eq!(similarity("x", ""), 0.0);
        assert_eq!(similarity("", "x"), 0.0);
    }

    #[test]
    fn test_similarity_identical() {
        for s in ["a", "ピカチュウex", "sv4a205190"] {
            assert_eq!(similarity(s, s), 1.0);
        }
    }

    #[test]
    fn test_similarity_levenshtein() {
        // kitten → sitting: 距離3、長さ7
        assert!((similarity("kitten", "sitting") - (1.0 - 3.0 / 7.0)).abs() < 1e-12);
        assert!((similarity("abc", "abd") - (2.0 / 3.0)).abs() < 1e-12);
        assert_eq!(similarity("abc", "xyz"), 0.0);
    }

    #[test]
    fn test_similarity_counts_chars_not_bytes() {
        // 1文字違い（全10文字）
        assert!((similarity("あいうえおかきくけこ", "あいうえおかきくけさ") - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_similarity_symmetric() {
        let pairs = [("ミュウex", "ミュウツーex"), ("sv2a165", "sv2a156"), ("a", "ab")];
        for (a, b) in pairs {
            assert_eq!(similarity(a, b), similarity(b, a));
        }
    }
}
