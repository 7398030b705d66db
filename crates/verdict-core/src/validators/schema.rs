//! Schema-constrained JSON output validation.
//!
//! Accepts only output that is a single bare JSON value conforming to the
//! task's JSON schema. Prose wrappers and code fences are rejected before
//! parsing, so "```json ... ```" fails even when the embedded value is
//! itself valid.

use serde_json::Value as JsonValue;

use crate::types::Verdict;

/// True when the trimmed text starts and ends with a matching bracket
/// pair. Quick gate against prose and fence residue; the parse and
/// schema validation below do the real work.
fn looks_like_bare_json(s: &str) -> bool {
    (s.starts_with('{') && s.ends_with('}')) || (s.starts_with('[') && s.ends_with(']'))
}

/// Validate model output against a JSON schema.
///
/// Never fails hard: a malformed schema, unparsable output, or violated
/// constraint each surface as a rejection reason.
pub fn validate_json_output(text: &str, schema: &JsonValue) -> Verdict {
    let s = text.trim();

    if !looks_like_bare_json(s) {
        return Verdict::fail("Output is not pure JSON (extra text or invalid JSON).");
    }

    let data: JsonValue = match serde_json::from_str(s) {
        Ok(v) => v,
        Err(e) => return Verdict::fail(format!("JSON parse error: {e}")),
    };

    let validator = match jsonschema::options().build(schema) {
        Ok(v) => v,
        Err(e) => return Verdict::fail(format!("Schema error: {e}")),
    };

    if let Some(error) = validator.iter_errors(&data).next() {
        return Verdict::fail(format!("Schema violation: {error}"));
    }

    Verdict::pass("OK")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn invoice_schema() -> JsonValue {
        json!({
            "type": "object",
            "required": ["invoice_id", "total"],
            "properties": {
                "invoice_id": { "type": "string" },
                "total": { "type": "number" },
                "currency": { "type": "string", "enum": ["EUR", "USD"] }
            }
        })
    }

    #[test]
    fn test_valid_object_passes() {
        let out = r#"{"invoice_id": "42", "total": 19.99, "currency": "EUR"}"#;
        let verdict = validate_json_output(out, &invoice_schema());
        assert!(verdict.passed);
        assert_eq!(verdict.reason, "OK");
    }

    #[test]
    fn test_array_output_passes_array_schema() {
        let schema = json!({ "type": "array", "items": { "type": "integer" } });
        assert!(validate_json_output("[1, 2, 3]", &schema).passed);
    }

    #[test]
    fn test_missing_required_field_rejected() {
        let verdict = validate_json_output(r#"{"invoice_id": "42"}"#, &invoice_schema());
        assert!(!verdict.passed);
        assert!(verdict.reason.starts_with("Schema violation:"));
        assert!(verdict.reason.contains("total"));
    }

    #[test]
    fn test_wrong_type_rejected() {
        let out = r#"{"invoice_id": "42", "total": "a lot"}"#;
        let verdict = validate_json_output(out, &invoice_schema());
        assert!(!verdict.passed);
        assert!(verdict.reason.contains("Schema violation"));
    }

    #[test]
    fn test_enum_violation_rejected() {
        let out = r#"{"invoice_id": "42", "total": 1.0, "currency": "GBP"}"#;
        let verdict = validate_json_output(out, &invoice_schema());
        assert!(!verdict.passed);
        assert!(verdict.reason.contains("Schema violation"));
    }

    #[test]
    fn test_fenced_json_rejected() {
        let out = "```json\n{\"invoice_id\": \"42\", \"total\": 1.0}\n```";
        let verdict = validate_json_output(out, &invoice_schema());
        assert!(!verdict.passed);
        assert_eq!(
            verdict.reason,
            "Output is not pure JSON (extra text or invalid JSON)."
        );
    }

    #[test]
    fn test_prose_wrapper_rejected() {
        let out = r#"Here is the JSON you asked for: {"invoice_id": "42", "total": 1.0}"#;
        assert!(!validate_json_output(out, &invoice_schema()).passed);
    }

    #[test]
    fn test_trailing_prose_rejected() {
        let out = r#"{"invoice_id": "42", "total": 1.0} Hope that helps!"#;
        assert!(!validate_json_output(out, &invoice_schema()).passed);
    }

    #[test]
    fn test_broken_json_reports_parse_error() {
        let verdict = validate_json_output(r#"{"invoice_id": }"#, &invoice_schema());
        assert!(!verdict.passed);
        assert!(verdict.reason.starts_with("JSON parse error:"));
    }

    #[test]
    fn test_invalid_schema_degrades_to_rejection() {
        let schema = json!({ "type": "no-such-type" });
        let verdict = validate_json_output(r#"{}"#, &schema);
        assert!(!verdict.passed);
        assert!(verdict.reason.starts_with("Schema error:"));
    }

    #[test]
    fn test_surrounding_whitespace_tolerated() {
        let out = "\n  {\"invoice_id\": \"42\", \"total\": 1.0}  \n";
        assert!(validate_json_output(out, &invoice_schema()).passed);
    }
}
