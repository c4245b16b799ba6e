use std::cmp::Ordering;

use unicode_normalization::UnicodeNormalization;

const SPACE: u32 = 0x100;
const PUNCT: u32 = 0x200;
const DIGIT: u32 = 0x1000;
const LETTER: u32 = 0x2000;
const OTHER: u32 = 0x10000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Weight {
    primary: u32,
    secondary: u8,
    tertiary: u8,
}

/// Compares two strings the way a Romanian reader expects them ordered.
///
/// Base letters decide first, with `ă â î ș ț` as letters of their own right
/// after their base letter. Other accents come second, case third, and code
/// point order breaks the remaining ties. Both inputs are NFC-normalized, so
/// decomposed names (as macOS stores them) compare like precomposed ones.
pub fn compare_ro(a: &str, b: &str) -> Ordering {
    let a: String = a.nfc().collect();
    let b: String = b.nfc().collect();
    let wa: Vec<Weight> = a.chars().map(weight).collect();
    let wb: Vec<Weight> = b.chars().map(weight).collect();

    level(&wa, &wb, |w| w.primary)
        .then_with(|| level(&wa, &wb, |w| u32::from(w.secondary)))
        .then_with(|| level(&wa, &wb, |w| u32::from(w.tertiary)))
        .then_with(|| a.cmp(&b))
}

fn level(a: &[Weight], b: &[Weight], key: impl Fn(&Weight) -> u32) -> Ordering {
    a.iter().map(&key).cmp(b.iter().map(&key))
}

fn weight(c: char) -> Weight {
    let tertiary = u8::from(c.is_uppercase());
    let lower = c.to_lowercase().next().unwrap_or(c);

    if let Some((base, offset, secondary)) = fold(lower) {
        return Weight {
            primary: LETTER + (base as u32 - 'a' as u32) * 4 + offset,
            secondary,
            tertiary,
        };
    }
    if lower.is_ascii_lowercase() {
        return Weight {
            primary: LETTER + (lower as u32 - 'a' as u32) * 4,
            secondary: 0,
            tertiary,
        };
    }
    if let Some(d) = lower.to_digit(10) {
        return Weight { primary: DIGIT + d, secondary: 0, tertiary: 0 };
    }
    let primary = if lower.is_whitespace() {
        SPACE
    } else if lower.is_ascii() {
        PUNCT + lower as u32
    } else {
        OTHER + lower as u32
    };
    Weight { primary, secondary: 0, tertiary }
}

/// Maps an accented lowercase Latin letter to `(base, primary offset, accent)`.
/// A non-zero offset marks a letter of the Romanian alphabet.
fn fold(c: char) -> Option<(char, u32, u8)> {
    let folded = match c {
        'ă' => ('a', 1, 0),
        'â' => ('a', 2, 0),
        'î' => ('i', 1, 0),
        'ș' => ('s', 1, 0),
        'ş' => ('s', 1, 1),
        'ț' => ('t', 1, 0),
        'ţ' => ('t', 1, 1),

        'à' => ('a', 0, 1),
        'á' => ('a', 0, 2),
        'ã' => ('a', 0, 3),
        'ä' => ('a', 0, 4),
        'å' => ('a', 0, 5),
        'ā' => ('a', 0, 6),
        'ą' => ('a', 0, 7),
        'ç' => ('c', 0, 1),
        'ć' => ('c', 0, 2),
        'č' => ('c', 0, 3),
        'ď' => ('d', 0, 1),
        'đ' => ('d', 0, 2),
        'è' => ('e', 0, 1),
        'é' => ('e', 0, 2),
        'ê' => ('e', 0, 3),
        'ë' => ('e', 0, 4),
        'ē' => ('e', 0, 5),
        'ė' => ('e', 0, 6),
        'ę' => ('e', 0, 7),
        'ě' => ('e', 0, 8),
        'ì' => ('i', 0, 1),
        'í' => ('i', 0, 2),
        'ï' => ('i', 0, 3),
        'ī' => ('i', 0, 4),
        'į' => ('i', 0, 5),
        'ł' => ('l', 0, 1),
        'ñ' => ('n', 0, 1),
        'ń' => ('n', 0, 2),
        'ň' => ('n', 0, 3),
        'ò' => ('o', 0, 1),
        'ó' => ('o', 0, 2),
        'ô' => ('o', 0, 3),
        'õ' => ('o', 0, 4),
        'ö' => ('o', 0, 5),
        'ø' => ('o', 0, 6),
        'ō' => ('o', 0, 7),
        'ő' => ('o', 0, 8),
        'ŕ' => ('r', 0, 1),
        'ř' => ('r', 0, 2),
        'ś' => ('s', 0, 2),
        'š' => ('s', 0, 3),
        'ť' => ('t', 0, 2),
        'ù' => ('u', 0, 1),
        'ú' => ('u', 0, 2),
        'û' => ('u', 0, 3),
        'ü' => ('u', 0, 4),
        'ū' => ('u', 0, 5),
        'ů' => ('u', 0, 6),
        'ű' => ('u', 0, 7),
        'ų' => ('u', 0, 8),
        'ý' => ('y', 0, 1),
        'ÿ' => ('y', 0, 2),
        'ź' => ('z', 0, 1),
        'ż' => ('z', 0, 2),
        'ž' => ('z', 0, 3),
        _ => return None,
    };
    Some(folded)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(items: &[&str]) -> Vec<String> {
        let mut v: Vec<String> = items.iter().map(|s| s.to_string()).collect();
        v.sort_by(|a, b| compare_ro(a, b));
        v
    }

    #[test]
    fn romanian_letters_follow_their_base_letter() {
        assert_eq!(
            sorted(&["Zeta", "Ălba", "Alba", "Brașov"]),
            vec!["Alba", "Ălba", "Brașov", "Zeta"]
        );
        assert_eq!(sorted(&["ține", "tunel", "tata"]), vec!["tata", "tunel", "ține"]);
        assert_eq!(sorted(&["șanț", "sud", "tei"]), vec!["sud", "șanț", "tei"]);
        assert_eq!(sorted(&["îngust", "inel", "joc"]), vec!["inel", "îngust", "joc"]);
        assert_eq!(compare_ro("ă", "â"), Ordering::Less);
    }

    #[test]
    fn case_is_a_late_difference() {
        assert_eq!(compare_ro("alba", "Alba"), Ordering::Less);
        assert_eq!(compare_ro("Alba", "alzheimer"), Ordering::Less);
        assert_eq!(sorted(&["b", "A", "a", "B"]), vec!["a", "A", "b", "B"]);
    }

    #[test]
    fn foreign_accents_are_secondary() {
        assert_eq!(compare_ro("cafe", "café"), Ordering::Less);
        assert_eq!(compare_ro("café", "cafea"), Ordering::Less);
    }

    #[test]
    fn comma_and_cedilla_forms_sort_together() {
        assert_eq!(compare_ro("şa", "șb"), Ordering::Less);
        assert_eq!(compare_ro("ța", "ţb"), Ordering::Less);
    }

    #[test]
    fn digits_sort_before_letters_and_after_punctuation() {
        assert_eq!(
            sorted(&["b.jpg", "2.jpg", "10.jpg", "a.jpg"]),
            vec!["10.jpg", "2.jpg", "a.jpg", "b.jpg"]
        );
        assert_eq!(compare_ro("_1", "1"), Ordering::Less);
        assert_eq!(compare_ro("a b", "ab"), Ordering::Less);
    }

    #[test]
    fn decomposed_names_sort_like_precomposed() {
        assert_eq!(compare_ro("a\u{0306}", "a\u{0302}"), Ordering::Less);
        assert_eq!(compare_ro("a\u{0306}", "ă"), Ordering::Equal);
        assert_eq!(compare_ro("cafe\u{0301}", "cafea"), Ordering::Less);
        assert_eq!(
            sorted(&["a\u{0302}F", "a\u{0306}F"]),
            vec!["a\u{0306}F", "a\u{0302}F"]
        );
        assert_eq!(
            sorted(&["s\u{0326}anț", "sud", "tei"]),
            vec!["sud", "s\u{0326}anț", "tei"]
        );
    }

    #[test]
    fn equal_strings_compare_equal() {
        assert_eq!(compare_ro("Timișoara", "Timișoara"), Ordering::Equal);
        assert_eq!(compare_ro("", ""), Ordering::Equal);
        assert_eq!(compare_ro("", "a"), Ordering::Less);
    }
}
