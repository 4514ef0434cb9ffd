//! 値付けルール
//!
//! 買取表の照合価格とレアリティから、商品マスタに書き込む価格を決める。
//!
//! ## ルール
//! 1. 個別マッピング（100→50, 150→50, 200→100 ... 1000→800）
//! 2. 10000円以上は1.05倍し、100の位で1000円単位に丸める（4万以上は常に切り上げ）
//! 3. 6桁は1万の位で四捨五入、7桁以上は10万単位で切り上げ
//! 4. AR は299円以下なら300円

use crate::config::PriceRules;
use crate::types::RawPrice;

/// 値付け結果
#[derive(Debug, Clone, PartialEq)]
pub enum PriceOutcome<T> {
    /// ルール適用後の価格
    Adjusted(i64),
    /// 照合価格が空・数値でない → 元の価格のまま
    Fallback(T),
}

impl<T> PriceOutcome<T> {
    pub fn is_fallback(&self) -> bool {
        matches!(self, PriceOutcome::Fallback(_))
    }

    pub fn adjusted(&self) -> Option<i64> {
        match self {
            PriceOutcome::Adjusted(p) => Some(*p),
            PriceOutcome::Fallback(_) => None,
        }
    }
}

fn round_down(value: i64, unit: i64) -> i64 {
    (value / unit).saturating_mul(unit)
}

fn bump_up(value: i64, unit: i64) -> i64 {
    (value / unit).saturating_add(1).saturating_mul(unit)
}

/// 整数価格にルールを適用する
pub fn adjust(p: i64, rarity_tag: &str, rules: &PriceRules) -> i64 {
    let mut new_p = if let Some(&mapped) = rules.overrides.get(&p) {
        mapped
    } else if p >= rules.markup_floor {
        let tmp = (p as f64 * rules.markup).floor() as i64;
        if tmp >= rules.round_up_from {
            bump_up(tmp, 1000)
        } else {
            match (tmp / 100) % 10 {
                6..=9 => bump_up(tmp, 1000),
                // 1〜5 は切り捨て、0 はそのまま1000円単位
                _ => round_down(tmp, 1000),
            }
        }
    } else {
        p
    };

    // 6桁: 1万の位で四捨五入
    if (100_000..=999_999).contains(&new_p) {
        let q = new_p / 10_000;
        let r = new_p % 10_000;
        new_p = if r >= 5_000 { (q + 1) * 10_000 } else { q * 10_000 };
    }

    // 7桁以上: 10万単位で切り上げ
    if new_p >= 1_000_000 {
        new_p = (new_p.saturating_add(99_999) / 100_000).saturating_mul(100_000);
    }

    if new_p <= rules.rarity_ceiling && rarity_tag == rules.rarity_tag {
        new_p = rules.rarity_floor;
    }

    new_p
}

/// 照合価格を変換する
///
/// 照合価格が空・数値として解釈できない場合は `fallback` をそのまま返す
pub fn transform<T>(
    matched: &RawPrice,
    fallback: T,
    rarity_tag: &str,
    rules: &PriceRules,
) -> PriceOutcome<T> {
    match matched.parse() {
        Some(base) => PriceOutcome::Adjusted(adjust(base.trunc() as i64, rarity_tag, rules)),
        None => PriceOutcome::Fallback(fallback),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(price: i64, tag: &str) -> PriceOutcome<&'static str> {
        run_raw(price, tag)
    }

    fn run_raw(price: impl Into<RawPrice>, tag: &str) -> PriceOutcome<&'static str> {
        transform(&price.into(), "fb", tag, &PriceRules::default())
    }

    #[test]
    fn test_override_table() {
        assert_eq!(run(100, "").adjusted(), Some(50));
        assert_eq!(run(150, "").adjusted(), Some(50));
        assert_eq!(run(200, "").adjusted(), Some(100));
        assert_eq!(run(500, "").adjusted(), Some(300));
        assert_eq!(run(1000, "").adjusted(), Some(800));
    }

    #[test]
    fn test_mid_range_unchanged() {
        assert_eq!(run(250, "").adjusted(), Some(250));
        assert_eq!(run(1001, "").adjusted(), Some(1001));
        assert_eq!(run(5000, "").adjusted(), Some(5000));
        assert_eq!(run(9999, "").adjusted(), Some(9999));
        assert_eq!(run(50, "").adjusted(), Some(50));
    }

    #[test]
    fn test_markup_hundreds_digit() {
        // 12345 * 1.05 = 12962 → 100の位9 → 切り上げ
        assert_eq!(run(12345, "").adjusted(), Some(13000));
        // 15000 * 1.05 = 15750 → 7 → 切り上げ
        assert_eq!(run(15000, "").adjusted(), Some(16000));
        // 11000 * 1.05 = 11550 → 5 → 切り捨て
        assert_eq!(run(11000, "").adjusted(), Some(11000));
        // 20000 * 1.05 = 21000 → 0 → そのまま
        assert_eq!(run(20000, "").adjusted(), Some(21000));
        // 10000 * 1.05 = 10500 → 5 → 切り捨て
        assert_eq!(run(10000, "").adjusted(), Some(10000));
    }

    #[test]
    fn test_markup_round_up_above_40000() {
        // 45000 * 1.05 = 47250
        assert_eq!(run(45000, "").adjusted(), Some(48000));
        // 40000 * 1.05 = 42000 → 常に次の1000円
        assert_eq!(run(40000, "").adjusted(), Some(43000));
    }

    #[test]
    fn test_six_digit_rounding() {
        // 100000 * 1.05 = 105000 → 106000 → 110000
        assert_eq!(run(100000, "").adjusted(), Some(110000));
        // 200000 * 1.05 = 210000 → 211000 → 210000
        assert_eq!(run(200000, "").adjusted(), Some(210000));
    }

    #[test]
    fn test_seven_digit_round_up() {
        // 1000000 * 1.05 = 1050000 → 1051000 → 1100000
        assert_eq!(run(1_000_000, "").adjusted(), Some(1_100_000));
    }

    #[test]
    fn test_six_digit_carry_into_seven() {
        let rules = PriceRules::default();
        assert_eq!(adjust(995_000, "", &PriceRules { markup_floor: i64::MAX, ..rules }), 1_000_000);
    }

    #[test]
    fn test_rarity_correction() {
        assert_eq!(run(250, "AR").adjusted(), Some(300));
        assert_eq!(run(250, "").adjusted(), Some(250));
        assert_eq!(run(250, "SAR").adjusted(), Some(250));
        // 300 → 150 → AR補正
        assert_eq!(run(300, "AR").adjusted(), Some(300));
        assert_eq!(run(1200, "AR").adjusted(), Some(1200));
    }

    #[test]
    fn test_fallback() {
        assert_eq!(transform(&RawPrice::Empty, 777, "AR", &PriceRules::default()), PriceOutcome::Fallback(777));
        assert!(run_raw("", "").is_fallback());
        assert!(run_raw("  ", "").is_fallback());
        assert!(run_raw("価格未定", "").is_fallback());
        assert!(run_raw("NaN", "").is_fallback());
    }

    #[test]
    fn test_text_price_with_commas_and_decimals() {
        assert_eq!(run_raw("12,345", "").adjusted(), Some(13000));
        assert_eq!(run_raw("1000.9", "").adjusted(), Some(800));
    }

    #[test]
    fn test_custom_rules() {
        let mut rules = PriceRules::default();
        rules.overrides.insert(250, 120);
        rules.rarity_tag = "SR".into();
        assert_eq!(transform(&RawPrice::from(250_i64), 0, "SR", &rules).adjusted(), Some(300));
        assert_eq!(transform(&RawPrice::from(250_i64), 0, "AR", &rules).adjusted(), Some(120));
    }

    #[test]
    fn test_huge_price_does_not_panic() {
        assert!(run_raw(1e18, "").adjusted().is_some());
    }
}
