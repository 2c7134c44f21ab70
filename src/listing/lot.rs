//! 랏 번호 정렬 키 인코더
//!
//! 자유 입력 랏 번호("LOT-10A", "#12", "7")를 정수 정렬 키로 변환한다.
//! "2" < "10" < "10A" < "10B" < "11" 순서가 정수 비교만으로 유지된다.
// region:    --- Lot Sort Encoder

/// 숫자부 한 단위당 접미사 공간
const SUFFIX_SPACE: u64 = 10_000;

/// 랏 번호를 정렬 키로 인코딩
///
/// 숫자부가 없으면 `fallback_id % 10000`을 반환해 랏 번호 없는 레코드도 생성 순으로 정렬된다.
pub fn encode(lot_text: &str, fallback_id: i64) -> u64 {
    let fallback = fallback_id.rem_euclid(SUFFIX_SPACE as i64) as u64;

    let rest = strip_separators(strip_lot_prefix(lot_text.trim_start()));

    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return fallback;
    }

    let numeric_part = rest[..digits_len].bytes().fold(0u64, |acc, b| {
        acc.saturating_mul(10).saturating_add(u64::from(b - b'0'))
    });

    // 숫자부 뒤 구분자는 건너뛴다: "10A" 와 "10 A" 는 같은 키, "10-5" 는 숫자 접미사
    let suffix = strip_separators(&rest[digits_len..])
        .chars()
        .next()
        .map(suffix_ordinal)
        .unwrap_or(0);

    numeric_part
        .saturating_mul(SUFFIX_SPACE)
        .saturating_add(suffix)
}

/// 접미사 문자 서수: A..Z → 1..26, 0..9 → 27..36, 그 외 0
fn suffix_ordinal(c: char) -> u64 {
    let c = c.to_ascii_uppercase();
    match c {
        'A'..='Z' => u64::from(c as u8 - b'A') + 1,
        '0'..='9' => u64::from(c as u8 - b'0') + 27,
        _ => 0,
    }
}

fn strip_lot_prefix(text: &str) -> &str {
    match text.get(..3) {
        Some(prefix) if prefix.eq_ignore_ascii_case("lot") => &text[3..],
        _ => text,
    }
}

fn strip_separators(text: &str) -> &str {
    text.trim_start_matches(|c: char| c.is_whitespace() || matches!(c, '-' | '_' | '#' | '.' | ':' | '/'))
}

// endregion: --- Lot Sort Encoder

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn encodes_documented_examples() {
        assert_eq!(encode("LOT-5", 0), 50_000);
        assert_eq!(encode("5A", 0), 50_001);
        assert_eq!(encode("", 42), 42);
    }

    #[test]
    fn natural_order_is_preserved() {
        let ordered = ["2", "10", "10A", "10B", "11"];
        for pair in ordered.windows(2) {
            assert!(
                encode(pair[0], 0) < encode(pair[1], 0),
                "{} should sort before {}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn letter_suffix_sorts_before_larger_number() {
        assert!(encode("10Z", 0) < encode("100", 0));
    }

    #[test]
    fn digit_suffix_sorts_after_letter_suffix() {
        assert_eq!(encode("10-5", 0), 10 * 10_000 + 32);
        assert!(encode("10Z", 0) < encode("10-0", 0));
    }

    #[test]
    fn prefix_is_case_insensitive_and_separators_are_skipped() {
        assert_eq!(encode("lot 12b", 0), 120_002);
        assert_eq!(encode("  Lot #12B", 0), 120_002);
        assert_eq!(encode("#7", 0), 70_000);
    }

    #[test]
    fn missing_numeric_part_uses_fallback() {
        assert_eq!(encode("LOT", 12_345), 2_345);
        assert_eq!(encode("TBD", 7), 7);
        assert_eq!(encode("   ", -3), 9_997);
    }

    #[test]
    fn huge_numbers_saturate() {
        assert_eq!(encode("99999999999999999999999", 0), u64::MAX);
    }

    fn lot_text(prefix: &str, numeric: u64, suffix: &str) -> String {
        format!("{}{}{}", prefix, numeric, suffix)
    }

    fn prefix_strategy() -> impl Strategy<Value = &'static str> {
        prop::sample::select(vec!["", "LOT", "lot-", "Lot #", "  ", "#", "LOT: "])
    }

    fn suffix_strategy() -> impl Strategy<Value = String> {
        prop_oneof![
            Just(String::new()),
            "[A-Za-z]",
            "[0-9]".prop_map(|s| format!("-{}", s)),
            "[ -][A-Za-z]",
        ]
    }

    proptest! {
        #[test]
        fn smaller_numeric_part_sorts_first(
            a in 0u64..1_000_000_000,
            b in 0u64..1_000_000_000,
            prefix_a in prefix_strategy(),
            prefix_b in prefix_strategy(),
            suffix_a in suffix_strategy(),
            suffix_b in suffix_strategy(),
            fallback in any::<i64>(),
        ) {
            prop_assume!(a != b);
            let (lo, hi) = (a.min(b), a.max(b));
            let low = encode(&lot_text(prefix_a, lo, &suffix_a), fallback);
            let high = encode(&lot_text(prefix_b, hi, &suffix_b), fallback);
            prop_assert!(low < high);
        }

        #[test]
        fn letter_suffix_sorts_before_digit_suffix(
            n in 0u64..1_000_000_000,
            letter in "[A-Za-z]",
            digit in "[0-9]",
            prefix in prefix_strategy(),
        ) {
            let bare = encode(&lot_text(prefix, n, ""), 0);
            let lettered = encode(&lot_text(prefix, n, &letter), 0);
            let digited = encode(&lot_text(prefix, n, &format!("-{}", digit)), 0);
            prop_assert!(bare < lettered);
            prop_assert!(lettered < digited);
            prop_assert_eq!(lettered / SUFFIX_SPACE, n);
        }
    }
}
