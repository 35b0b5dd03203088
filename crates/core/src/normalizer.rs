//! Turns raw model reply text into an [`AnalysisRecord`].
//!
//! Normalization never fails. Each reply ends in exactly one tier:
//! 1. [`NormalizationTier::Strict`]: after fence stripping and boundary extraction the text parses
//!    as JSON.
//! 2. [`NormalizationTier::Repaired`]: strict parsing failed but [`repair_json`] produced
//!    parseable JSON.
//! 3. [`NormalizationTier::Fallback`]: neither worked; the static fallback record is used.
//!
//! Parsed values are carried through unchanged even if they do not match the requested schema.
//! Schema drift is logged, not corrected.

use crate::analysis::AnalysisRecord;
use crate::repair::repair_json;
use std::fmt;

/// How the record was obtained.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NormalizationTier {
    Strict,
    Repaired,
    Fallback,
}

impl NormalizationTier {
    pub fn as_str(self) -> &'static str {
        match self {
            NormalizationTier::Strict => "strict",
            NormalizationTier::Repaired => "repaired",
            NormalizationTier::Fallback => "fallback",
        }
    }
}

impl fmt::Display for NormalizationTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of normalizing one reply.
#[derive(Clone, Debug, PartialEq)]
pub struct Normalized {
    pub record: AnalysisRecord,
    pub tier: NormalizationTier,
}

/// Remove Markdown code fences, with or without a language tag, and trim the result.
///
/// A tag is only consumed when it runs up to whitespace or the end of the text, so a fence glued
/// to the payload (```` ```{ ````) keeps the payload intact.
pub fn strip_code_fences(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(idx) = rest.find("```") {
        out.push_str(&rest[..idx]);
        rest = &rest[idx + 3..];

        let tag_len = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
            .unwrap_or(rest.len());
        let after_tag = &rest[tag_len..];
        if tag_len > 0 && (after_tag.is_empty() || after_tag.starts_with(char::is_whitespace)) {
            rest = after_tag;
        }
    }

    out.push_str(rest);
    out.trim().to_string()
}

/// Slice from the first `{` to the last `}` inclusive, when both exist in that order.
pub fn extract_json_span(text: &str) -> &str {
    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => text,
    }
}

/// Normalize a raw model reply.
pub fn normalize_response(raw: &str) -> Normalized {
    let stripped = strip_code_fences(raw);
    let candidate = extract_json_span(&stripped);

    let failure = match serde_json::from_str::<serde_json::Value>(candidate) {
        Ok(value) => return accept(value, NormalizationTier::Strict),
        Err(strict_err) => match repair_json(candidate) {
            Ok(fixed) => match serde_json::from_str::<serde_json::Value>(&fixed) {
                Ok(value) => {
                    tracing::warn!(
                        raw = %candidate,
                        error = %strict_err,
                        "model reply was not valid JSON; using repaired form"
                    );
                    return accept(value, NormalizationTier::Repaired);
                }
                Err(e) => format!("repaired text still invalid: {e}"),
            },
            Err(e) => e.to_string(),
        },
    };

    tracing::error!(
        raw = %candidate,
        reason = %failure,
        "model reply could not be parsed; using fallback analysis"
    );
    Normalized {
        record: AnalysisRecord::fallback(),
        tier: NormalizationTier::Fallback,
    }
}

fn accept(value: serde_json::Value, tier: NormalizationTier) -> Normalized {
    let record = AnalysisRecord::from_value(value);
    match record.check_shape() {
        Ok(()) => tracing::info!(tier = %tier, "model reply normalized"),
        Err(drift) => tracing::warn!(tier = %tier, %drift, "model reply does not match the requested schema"),
    }
    Normalized { record, tier }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn fenced_reply_with_language_tag_is_strict() {
        let raw = "```json\n{\"probableConditions\":[],\"recommendations\":[\"rest\"],\"warningSymptoms\":[],\"nextSteps\":[],\"disclaimer\":\"x\"}\n```";
        let out = normalize_response(raw);
        assert_eq!(out.tier, NormalizationTier::Strict);
        assert_eq!(
            out.record.into_value(),
            json!({
                "probableConditions": [],
                "recommendations": ["rest"],
                "warningSymptoms": [],
                "nextSteps": [],
                "disclaimer": "x"
            })
        );
    }

    #[test]
    fn untagged_fences_and_surrounding_prose_are_removed() {
        let raw = "Here is the analysis you asked for:\n```\n{\"disclaimer\": \"d\"}\n```\nStay well!";
        let out = normalize_response(raw);
        assert_eq!(out.tier, NormalizationTier::Strict);
        assert_eq!(out.record.into_value(), json!({"disclaimer": "d"}));
    }

    #[test]
    fn trailing_comma_is_repaired() {
        let out = normalize_response(r#"{"recommendations":["rest",],"disclaimer":"d"}"#);
        assert_eq!(out.tier, NormalizationTier::Repaired);
        assert_eq!(
            out.record.into_value(),
            json!({"recommendations": ["rest"], "disclaimer": "d"})
        );
    }

    #[test]
    fn truncated_reply_is_repaired() {
        let out = normalize_response(
            "```json\n{\"probableConditions\": [{\"name\": \"Tension headache\", \"likelihood\": \"High\"",
        );
        assert_eq!(out.tier, NormalizationTier::Repaired);
        assert_eq!(
            out.record.as_value()["probableConditions"][0]["name"],
            "Tension headache"
        );
    }

    #[test]
    fn prose_without_braces_falls_back() {
        let out = normalize_response("I cannot help with that.");
        assert_eq!(out.tier, NormalizationTier::Fallback);
        assert_eq!(out.record, AnalysisRecord::fallback());
        assert_eq!(
            out.record.as_value()["probableConditions"][0]["name"],
            "Analysis Error"
        );
    }

    #[test]
    fn bracketed_prose_without_braces_falls_back() {
        for raw in [
            "I cannot help with that [see usage policy].",
            "Please consult [a doctor](https://example.org) instead.",
        ] {
            let out = normalize_response(raw);
            assert_eq!(out.tier, NormalizationTier::Fallback, "{raw}");
            assert_eq!(out.record, AnalysisRecord::fallback());
        }
    }

    #[test]
    fn unrecoverable_braces_fall_back() {
        let out = normalize_response("{this is not json at all}}}");
        assert_eq!(out.tier, NormalizationTier::Fallback);
        assert_eq!(out.record, AnalysisRecord::fallback());
    }

    #[test]
    fn empty_reply_falls_back() {
        assert_eq!(normalize_response("").tier, NormalizationTier::Fallback);
        assert_eq!(normalize_response("```json\n```").tier, NormalizationTier::Fallback);
    }

    #[test]
    fn wrong_shape_passes_through_unchanged() {
        let out = normalize_response(r#"{"conditions": "flu", "score": 3}"#);
        assert_eq!(out.tier, NormalizationTier::Strict);
        assert_eq!(out.record.into_value(), json!({"conditions": "flu", "score": 3}));
    }

    #[test]
    fn fence_stripping_keeps_glued_payload() {
        assert_eq!(strip_code_fences("```{\"a\":1}```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("  ```JSON\n[1]\n```  "), "[1]");
    }

    #[test]
    fn span_extraction_requires_ordered_braces() {
        assert_eq!(extract_json_span("x {\"a\":{}} y"), "{\"a\":{}}");
        assert_eq!(extract_json_span("} backwards {"), "} backwards {");
        assert_eq!(extract_json_span("no braces"), "no braces");
    }
}
