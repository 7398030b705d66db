//! Text normalization shared by the grounded validator.
//!
//! Model output and context are compared in a normalized form: lowercased,
//! every whitespace run collapsed to a single space, surrounding whitespace
//! trimmed.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();
}

/// Lowercase, collapse whitespace runs to single spaces, trim.
pub fn normalize(s: &str) -> String {
    WHITESPACE_RUN
        .replace_all(&s.to_lowercase(), " ")
        .trim()
        .to_string()
}

/// True when any of the phrases (lowercased) occurs as a substring of the
/// normalized text.
pub fn contains_any(text: &str, phrases: &[&str]) -> bool {
    let t = normalize(text);
    phrases.iter().any(|p| t.contains(&p.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_normalize_collapses_whitespace() {
        assert_eq!(normalize("  The\tCapital \n is  Paris. "), "the capital is paris.");
    }

    #[test]
    fn test_normalize_keeps_umlauts() {
        assert_eq!(normalize("Weiß  ich NICHT"), "weiß ich nicht");
    }

    #[test]
    fn test_contains_any_is_case_insensitive() {
        assert!(contains_any("I really don't know.", &["i don't know"]));
        assert!(contains_any("Das steht NICHT IM TEXT.", &["nicht im text"]));
        assert!(!contains_any("The capital is Paris.", &["i don't know"]));
    }

    proptest! {
        #[test]
        fn normalize_is_idempotent(s in ".*") {
            let once = normalize(&s);
            prop_assert_eq!(normalize(&once), once);
        }

        #[test]
        fn normalized_text_has_no_whitespace_runs(s in ".*") {
            prop_assert!(!normalize(&s).contains("  "));
        }
    }
}
