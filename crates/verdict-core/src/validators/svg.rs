//! Constrained SVG art validation.
//!
//! Extracts the first `<svg>…</svg>` fragment from raw model output,
//! validates it structurally (parses as XML, root is `<svg>`, carries a
//! title, a description and at least one drawable shape) and for
//! descriptive content (title/desc must mention the required subject),
//! and stamps accepted fragments with provenance metadata.
//!
//! The bounded-region search is regex based and deliberately minimal:
//! the first `<svg…>` through the first `</svg>`. Nested svg documents
//! are out of scope for generated art.

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use crate::types::Verdict;

/// Drawable shape primitives counted during validation.
const SHAPE_TAGS: &[&str] = &[
    "path", "circle", "rect", "ellipse", "polygon", "polyline", "line",
];

/// Required subject keyword in the combined title/desc text.
const SUBJECT_KEYWORD: &str = "pelican";

/// Accepted synonyms for the required secondary keyword.
const SECONDARY_KEYWORDS: &[&str] = &["bicycle", "bike"];

lazy_static! {
    static ref SVG_OPEN_RE: Regex = Regex::new(r"(?is)<svg.*?>").unwrap();
    static ref SVG_BLOCK_RE: Regex = Regex::new(r"(?is)<svg.*?>.*?</svg>").unwrap();
}

/// Strip one leading triple-backtick fence, dropping a purely-alphabetic
/// language tag line ("```xml", "```svg") when present.
fn strip_code_fences(text: &str) -> String {
    let s = text.trim();
    if s.starts_with("```") {
        let mut parts = s.splitn(3, "```");
        parts.next();
        if let (Some(inner), Some(_)) = (parts.next(), parts.next()) {
            if let Some((first_line, rest)) = inner.split_once('\n') {
                let tag = first_line.trim();
                if !tag.is_empty() && tag.chars().all(|c| c.is_ascii_alphabetic()) {
                    return rest.to_string();
                }
            }
            return inner.to_string();
        }
    }
    text.to_string()
}

/// Extract the first `<svg>…</svg>` block, ignoring code fences.
///
/// Embedded line breaks are collapsed before the search so fragments
/// spread across lines still match. Returns `None` when no bounded
/// region exists.
pub fn extract_svg(text: &str) -> Option<String> {
    let flat = strip_code_fences(text).replace(['\n', '\r'], "");
    SVG_BLOCK_RE.find(&flat).map(|m| m.as_str().to_string())
}

/// Validate an extracted SVG fragment.
///
/// Lightweight structural check: parses as XML, requires an `<svg>` root, a
/// non-empty `<title>` and `<desc>`, subject keywords in their combined
/// text, and at least one drawable shape element.
pub fn validate_svg_art(svg_text: &str) -> Verdict {
    let doc = match roxmltree::Document::parse(svg_text) {
        Ok(d) => d,
        Err(e) => return Verdict::fail(format!("XML parse error: {e}")),
    };

    let root = doc.root_element();
    if !root.tag_name().name().eq_ignore_ascii_case("svg") {
        return Verdict::fail("Root element is not <svg>.");
    }

    let mut title: Option<String> = None;
    let mut desc: Option<String> = None;
    let mut shapes = 0usize;

    for node in root.descendants().filter(|n| n.is_element()) {
        let tag = node.tag_name().name().to_ascii_lowercase();
        let text = node.text().map(str::trim).unwrap_or("");
        match tag.as_str() {
            "title" if title.is_none() && !text.is_empty() => title = Some(text.to_string()),
            "desc" if desc.is_none() && !text.is_empty() => desc = Some(text.to_string()),
            t if SHAPE_TAGS.contains(&t) => shapes += 1,
            _ => {}
        }
    }

    let title = match title {
        Some(t) => t,
        None => return Verdict::fail("Missing <title>."),
    };
    let desc = match desc {
        Some(d) => d,
        None => return Verdict::fail("Missing <desc>."),
    };

    let combined = format!("{} {}", title.to_lowercase(), desc.to_lowercase());
    let on_topic = combined.contains(SUBJECT_KEYWORD)
        && SECONDARY_KEYWORDS.iter().any(|k| combined.contains(k));
    if !on_topic {
        return Verdict::fail("Title/desc should mention pelican and bicycle.");
    }

    if shapes == 0 {
        return Verdict::fail("No drawable elements found (path/circle/rect/etc.).");
    }

    Verdict::pass("OK")
}

/// Provenance metadata stamped into accepted SVG artifacts.
#[derive(Debug, Clone)]
pub struct SvgMetadata {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub latency_ms: u64,
    pub run_id: String,
    pub timestamp: String,
    pub task_id: String,
}

impl SvgMetadata {
    fn comment(&self) -> String {
        let mut lines = vec!["<!-- verdict metadata:".to_string()];
        lines.push(format!("  model: {}", self.model));
        lines.push(format!("  temperature: {}", self.temperature));
        lines.push(format!("  max_tokens: {}", self.max_tokens));
        lines.push(format!("  latency_ms: {}", self.latency_ms));
        lines.push(format!("  run_id: {}", self.run_id));
        lines.push(format!("  timestamp: {}", self.timestamp));
        lines.push(format!("  task_id: {}", self.task_id));
        lines.push("-->".to_string());
        lines.join("\n")
    }
}

/// Insert a provenance comment immediately after the first opening
/// `<svg…>` tag. The input is left untouched; only accepted fragments
/// are ever stamped.
pub fn insert_metadata_comment(svg_text: &str, metadata: &SvgMetadata) -> String {
    let comment = metadata.comment();
    SVG_OPEN_RE
        .replacen(svg_text, 1, |caps: &Captures| {
            format!("{}\n{}\n", &caps[0], comment)
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    const GOOD_SVG: &str = "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 100 100\">\
<title>A pelican riding a bicycle</title>\
<desc>Simple line art</desc>\
<path d=\"M10 10 L90 90\"/>\
</svg>";

    fn metadata() -> SvgMetadata {
        SvgMetadata {
            model: "llama3:8b".to_string(),
            temperature: 0.0,
            max_tokens: 4096,
            latency_ms: 1234,
            run_id: "20250101_120000".to_string(),
            timestamp: "2025-01-01T12:00:00".to_string(),
            task_id: "svg_pelican".to_string(),
        }
    }

    #[test]
    fn test_extract_plain_fragment() {
        let text = format!("Sure, here you go:\n{GOOD_SVG}\nEnjoy!");
        let svg = extract_svg(&text).unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(!svg.contains("Enjoy"));
    }

    #[test]
    fn test_extract_from_fenced_block() {
        let text = format!("```xml\n{GOOD_SVG}\n```");
        assert!(extract_svg(&text).is_some());
    }

    #[test]
    fn test_extract_from_bare_fence() {
        let text = format!("```\n{GOOD_SVG}\n```");
        assert!(extract_svg(&text).is_some());
    }

    #[test]
    fn test_extract_none_without_svg() {
        assert!(extract_svg("I cannot draw that, sorry.").is_none());
        assert!(extract_svg("<svg>unterminated").is_none());
    }

    #[test]
    fn test_extract_collapses_newlines() {
        let text = "<svg\nviewBox=\"0 0 10 10\">\n<path d=\"M0 0\"/>\n</svg>";
        let svg = extract_svg(text).unwrap();
        assert!(!svg.contains('\n'));
    }

    #[test]
    fn test_extract_is_minimal() {
        let text = "<svg><path/></svg> trailing <svg><rect/></svg>";
        let svg = extract_svg(text).unwrap();
        assert_eq!(svg, "<svg><path/></svg>");
    }

    #[test]
    fn test_valid_art_accepted() {
        let verdict = validate_svg_art(GOOD_SVG);
        assert!(verdict.passed, "{}", verdict.reason);
        assert_eq!(verdict.reason, "OK");
    }

    #[test]
    fn test_bike_synonym_accepted() {
        let svg = GOOD_SVG.replace("riding a bicycle", "on a bike");
        assert!(validate_svg_art(&svg).passed);
    }

    #[test]
    fn test_malformed_xml_rejected() {
        let verdict = validate_svg_art("<svg><path></svg>");
        assert!(!verdict.passed);
        assert!(verdict.reason.starts_with("XML parse error:"));
    }

    #[test]
    fn test_non_svg_root_rejected() {
        let verdict = validate_svg_art("<div><svg/></div>");
        assert!(!verdict.passed);
        assert_eq!(verdict.reason, "Root element is not <svg>.");
    }

    #[test]
    fn test_missing_title_rejected() {
        let svg = "<svg><desc>Simple line art</desc><path d=\"M0 0\"/></svg>";
        let verdict = validate_svg_art(svg);
        assert!(!verdict.passed);
        assert_eq!(verdict.reason, "Missing <title>.");
    }

    #[test]
    fn test_missing_desc_rejected() {
        let svg = "<svg><title>A pelican riding a bicycle</title><path d=\"M0 0\"/></svg>";
        let verdict = validate_svg_art(svg);
        assert!(!verdict.passed);
        assert_eq!(verdict.reason, "Missing <desc>.");
    }

    #[test]
    fn test_empty_title_counts_as_missing() {
        let svg = "<svg><title>  </title><desc>art</desc><path d=\"M0 0\"/></svg>";
        let verdict = validate_svg_art(svg);
        assert!(!verdict.passed);
        assert_eq!(verdict.reason, "Missing <title>.");
    }

    #[test]
    fn test_off_topic_rejected() {
        let svg = GOOD_SVG.replace("riding a bicycle", "swimming");
        let verdict = validate_svg_art(&svg);
        assert!(!verdict.passed);
        assert_eq!(verdict.reason, "Title/desc should mention pelican and bicycle.");
    }

    #[test]
    fn test_no_shapes_rejected() {
        let svg = "<svg><title>A pelican riding a bicycle</title><desc>art</desc></svg>";
        let verdict = validate_svg_art(svg);
        assert!(!verdict.passed);
        assert_eq!(
            verdict.reason,
            "No drawable elements found (path/circle/rect/etc.)."
        );
    }

    #[test]
    fn test_metadata_stamped_after_opening_tag() {
        let stamped = insert_metadata_comment(GOOD_SVG, &metadata());
        let open_end = stamped.find('>').unwrap();
        let after_open = &stamped[open_end + 1..];
        assert!(after_open.trim_start().starts_with("<!-- verdict metadata:"));
        assert!(stamped.contains("model: llama3:8b"));
        assert!(stamped.contains("run_id: 20250101_120000"));
        assert!(stamped.contains("task_id: svg_pelican"));
        // Stamping must keep the document well-formed.
        assert!(validate_svg_art(&stamped).passed);
    }

    #[test]
    fn test_stamping_leaves_input_untouched() {
        let original = GOOD_SVG.to_string();
        let _ = insert_metadata_comment(&original, &metadata());
        assert_eq!(original, GOOD_SVG);
    }
}
