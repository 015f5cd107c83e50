//! Fuzzy string matching utilities using longest-block alignment
//!
//! Scores how closely a transcript resembles a reference phrase. The ratio
//! rewards long runs of identical characters, which tolerates typos and
//! transliteration drift from the speech recognizer.

use unicode_general_category::{GeneralCategory, get_general_category};
use unicode_normalization::UnicodeNormalization;

/// Clean text for matching: lowercase and keep only word characters.
///
/// Whitespace and punctuation are dropped rather than replaced, so
/// "turn-on" and "turn on" both become "turnon". Composition runs again
/// after filtering, since dropping a separator can bring together two
/// characters that compose.
pub fn normalize(text: &str) -> String {
    let composed: String = text.nfc().collect();
    composed
        .to_lowercase()
        .chars()
        .filter(|c| is_word_char(*c))
        .nfc()
        .collect()
}

/// Letters, numbers and underscore. Combining marks are not word characters.
fn is_word_char(c: char) -> bool {
    c == '_'
        || matches!(
            get_general_category(c),
            GeneralCategory::UppercaseLetter
                | GeneralCategory::LowercaseLetter
                | GeneralCategory::TitlecaseLetter
                | GeneralCategory::ModifierLetter
                | GeneralCategory::OtherLetter
                | GeneralCategory::DecimalNumber
                | GeneralCategory::LetterNumber
                | GeneralCategory::OtherNumber
        )
}

/// Ratcliff/Obershelp similarity between two strings (0.0-1.0)
///
/// `2 * M / T` where `M` is the number of characters covered by the
/// recursive longest matching blocks and `T` the combined length.
#[hotpath::measure]
pub fn similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matched_chars(&a, &b) as f64 / total as f64
}

/// Sum of the lengths of all matching blocks between `a` and `b`
fn matched_chars(a: &[char], b: &[char]) -> usize {
    let mut matched = 0;
    let mut queue = vec![(0, a.len(), 0, b.len())];

    while let Some((alo, ahi, blo, bhi)) = queue.pop() {
        let (i, j, k) = longest_match(a, b, alo, ahi, blo, bhi);
        if k == 0 {
            continue;
        }
        matched += k;
        if alo < i && blo < j {
            queue.push((alo, i, blo, j));
        }
        if i + k < ahi && j + k < bhi {
            queue.push((i + k, ahi, j + k, bhi));
        }
    }
    matched
}

/// Longest common block of `a[alo..ahi]` and `b[blo..bhi]` as `(i, j, len)`.
///
/// Ties go to the block starting earliest in `a`, then earliest in `b`.
fn longest_match(
    a: &[char],
    b: &[char],
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_len) = (alo, blo, 0);
    // run[j + 1] = length of the match ending at a[i - 1], b[j]
    let mut run = vec![0usize; b.len() + 1];
    let mut next = vec![0usize; b.len() + 1];

    for i in alo..ahi {
        for j in blo..bhi {
            next[j + 1] = if a[i] == b[j] { run[j] + 1 } else { 0 };
            let k = next[j + 1];
            if k > best_len {
                best_i = i + 1 - k;
                best_j = j + 1 - k;
                best_len = k;
            }
        }
        std::mem::swap(&mut run, &mut next);
    }
    (best_i, best_j, best_len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("Turn ON the Light!"), "turnonthelight");
        assert_eq!(normalize("turn-on"), normalize("turn on"));
        assert_eq!(normalize("light on"), normalize("lighton"));
        assert_eq!(normalize("Eusebio, italii arvija."), "eusebioitaliiarvija");
        assert_eq!(normalize("pistuardi-urdiña."), "pistuardiurdiña");
        assert_eq!(normalize("snake_case"), "snake_case");
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("  ?!  "), "");
    }

    #[test]
    fn test_normalize_composes_accents() {
        assert_eq!(normalize("MA\u{301}S BRILLO"), "másbrillo");
        assert_eq!(normalize("ma\u{301}s brillo"), normalize("más brillo"));
    }

    #[test]
    fn test_normalize_drops_marks() {
        // vowel sign and ypogegrammeni are marks, not letters
        assert_eq!(normalize("कि"), "क");
        assert_eq!(normalize("α \u{345}"), "α");
        assert_eq!(normalize("ⓐ①"), "①");
    }

    #[test]
    fn test_normalize_composes_after_filtering() {
        let once = normalize("\u{1100}!\u{1161}");
        assert_eq!(once, "가");
        assert_eq!(normalize(&once), once);
    }

    #[test]
    fn test_normalize_final_sigma() {
        assert_eq!(normalize("ΟΔΟΣ"), "οδος");
        assert_eq!(normalize("ΟΔΟΣ ΑΒ"), "οδοςαβ");
    }

    #[test]
    fn test_similarity_edges() {
        assert_eq!(similarity("", ""), 1.0);
        assert_eq!(similarity("", "abc"), 0.0);
        assert_eq!(similarity("abc", ""), 0.0);
        assert_eq!(similarity("lighton", "lighton"), 1.0);
        assert_eq!(similarity("abc", "xyz"), 0.0);
    }

    #[test]
    fn test_similarity_known_values() {
        // "abcd" / "bcde": one block "bcd" of three
        assert!((similarity("abcd", "bcde") - 0.75).abs() < 1e-12);
        // typo swaps the last two letters: "turnonthelig" + "h" matched
        let score = similarity("turnonthelight", "turnontheligth");
        assert!((score - 26.0 / 28.0).abs() < 1e-12);
    }

    #[test]
    fn test_similarity_recurses_both_sides() {
        // blocks "ab" and "de" around a mismatched middle
        assert!((similarity("abxde", "abyde") - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_similarity_counts_chars_not_bytes() {
        assert_eq!(similarity("más", "más"), 1.0);
        assert!((similarity("más", "mas") - 2.0 * 2.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_longest_match_prefers_earliest() {
        let a: Vec<char> = "abab".chars().collect();
        let b: Vec<char> = "ab".chars().collect();
        assert_eq!(longest_match(&a, &b, 0, a.len(), 0, b.len()), (0, 0, 2));
    }

    proptest! {
        #[test]
        fn normalize_is_idempotent(text in "[a-zA-Z0-9áéíóúñÁÉÍÓÚÑ _,.!?'-]{0,40}") {
            let once = normalize(&text);
            prop_assert_eq!(normalize(&once), once);
        }

        #[test]
        fn normalize_is_idempotent_beyond_latin(
            text in "[\u{1100}-\u{1112}\u{1161}-\u{1175}\u{11A8}-\u{11C2}\u{0391}-\u{03A9}\u{03B1}-\u{03C9}\u{0300}-\u{036F}\u{0345}\u{0900}-\u{097F}\u{2460}-\u{24FF}a-zA-Z _!.-]{0,40}",
        ) {
            let once = normalize(&text);
            prop_assert_eq!(normalize(&once), once);
        }

        #[test]
        fn similarity_is_bounded(a in "[a-e]{0,20}", b in "[a-e]{0,20}") {
            let score = similarity(&a, &b);
            prop_assert!((0.0..=1.0).contains(&score));
        }

        #[test]
        fn similarity_is_reflexive(x in "[a-z0-9ñ]{1,30}") {
            prop_assert_eq!(similarity(&x, &x), 1.0);
        }
    }
}
