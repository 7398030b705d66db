//! Context-grounded answer validation.
//!
//! Judges whether an answer is supported by keyword evidence or is an
//! honest refusal. This is a heuristic, not an authoritative factual
//! check: substring keyword matching over-accepts, and the fabrication
//! check is token overlap against the context, not semantic entailment.
//! Treat its boundary as tunable best-effort, never as ground truth.

use lazy_static::lazy_static;
use regex::Regex;

use crate::normalize::{contains_any, normalize};
use crate::types::Verdict;

/// Closed list of uncertainty expressions accepted as an honest refusal
/// (English and German, matched against normalized output).
pub const UNCERTAINTY_PHRASES: &[&str] = &[
    "i don't know",
    "i do not know",
    "not provided",
    "not in the text",
    "cannot find",
    "unknown",
    "kann ich nicht sagen",
    "weiß ich nicht",
    "weiss ich nicht",
    "nicht im text",
    "nicht angegeben",
    "nicht verfügbar",
];

lazy_static! {
    // Alphanumeric tokens, German umlauts and hyphens included.
    static ref TOKEN_RE: Regex = Regex::new(r"[a-zA-ZäöüÄÖÜß0-9-]+").unwrap();
}

/// Validate a grounded answer.
///
/// Decision order:
/// 1. With `expected_keywords`: enough case-insensitive hits accept;
///    otherwise an uncertainty phrase accepts when `unknown_ok`; otherwise
///    reject with the shortfall.
/// 2. Without keywords but with `unknown_ok`: an uncertainty phrase
///    accepts; output tokens absent from the context flag a likely
///    fabrication; otherwise the missing refusal is the reason.
/// 3. With neither configured there is nothing to check.
pub fn validate_grounded(
    output_text: &str,
    context: &str,
    expected_keywords: &[String],
    min_keywords: usize,
    unknown_ok: bool,
) -> Verdict {
    let out_norm = normalize(output_text);
    let ctx_norm = normalize(context);

    if !expected_keywords.is_empty() {
        let hits = expected_keywords
            .iter()
            .filter(|k| out_norm.contains(&k.to_lowercase()))
            .count();
        if hits >= min_keywords {
            return Verdict::pass(format!(
                "Contains {hits}/{} expected keywords.",
                expected_keywords.len()
            ));
        }
        if unknown_ok && contains_any(&out_norm, UNCERTAINTY_PHRASES) {
            return Verdict::pass("Admitted uncertainty (unknown_ok).");
        }
        return Verdict::fail(format!("Missing keywords; found {hits} < {min_keywords}."));
    }

    if unknown_ok {
        if contains_any(&out_norm, UNCERTAINTY_PHRASES) {
            return Verdict::pass("Admitted uncertainty.");
        }
        // Light fabrication heuristic: content words in the output that
        // never occur in the context.
        let suspicious = TOKEN_RE
            .find_iter(&out_norm)
            .map(|m| m.as_str())
            .filter(|w| w.chars().count() > 2)
            .any(|w| !ctx_norm.contains(w));
        if suspicious {
            return Verdict::fail("Likely hallucination when unknown expected.");
        }
        return Verdict::fail("Expected an explicit uncertainty statement.");
    }

    // Nothing to check
    Verdict::pass("OK")
}
