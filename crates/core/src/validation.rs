//! Input validation utilities.
//!
//! Converts a loosely-typed inbound request into a [`PatientInput`]. Checks run in a fixed
//! order and stop at the first failure, so a client always sees one actionable message.

use crate::constants::{
    MSG_AGE_INVALID, MSG_DURATION_REQUIRED, MSG_GENDER_INVALID, MSG_SEVERITY_INVALID,
    MSG_SYMPTOMS_REQUIRED,
};
use crate::error::{AnalysisError, AnalysisResult};
use crate::patient::PatientInput;
use api_shared::AnalyzeSymptomsReq;
use symptom_types::{Age, Gender, NonEmptyText, Severity};

/// Validates an inbound request.
///
/// # Errors
///
/// Returns [`AnalysisError::Validation`] carrying the user-facing message for the first field
/// that is missing or out of domain, checked in this order: symptoms, age, gender, duration,
/// severity.
pub fn validate_request(req: &AnalyzeSymptomsReq) -> AnalysisResult<PatientInput> {
    let symptoms = required_text(req.symptoms.as_deref(), MSG_SYMPTOMS_REQUIRED)?;
    let age = parse_age(req.age.as_ref())?;
    let gender = req
        .gender
        .as_deref()
        .and_then(|g| g.parse::<Gender>().ok())
        .ok_or_else(|| invalid(MSG_GENDER_INVALID))?;
    let duration = required_text(req.duration.as_deref(), MSG_DURATION_REQUIRED)?;
    let severity = req
        .severity
        .as_deref()
        .and_then(|s| s.parse::<Severity>().ok())
        .ok_or_else(|| invalid(MSG_SEVERITY_INVALID))?;

    let name = req
        .name
        .as_deref()
        .and_then(|n| NonEmptyText::new(n).ok());

    let medical_history = req
        .medical_history
        .iter()
        .flatten()
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .map(str::to_owned)
        .collect();

    Ok(PatientInput {
        name,
        age,
        gender,
        symptoms,
        duration,
        severity,
        medical_history,
    })
}

fn invalid(message: &str) -> AnalysisError {
    AnalysisError::Validation(message.to_string())
}

fn required_text(value: Option<&str>, message: &str) -> AnalysisResult<NonEmptyText> {
    value
        .and_then(|v| NonEmptyText::new(v).ok())
        .ok_or_else(|| invalid(message))
}

/// Accepts integer JSON numbers (including integral floats such as `34.0`) and numeric strings.
fn parse_age(value: Option<&serde_json::Value>) -> AnalysisResult<Age> {
    let years = match value {
        Some(serde_json::Value::Number(n)) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.is_finite())
                .map(|f| f as i64)
        }),
        Some(serde_json::Value::String(s)) => s.trim().parse::<i64>().ok(),
        _ => None,
    };

    years
        .and_then(|y| Age::new(y).ok())
        .ok_or_else(|| invalid(MSG_AGE_INVALID))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_request() -> AnalyzeSymptomsReq {
        AnalyzeSymptomsReq {
            name: Some("  Sam  ".into()),
            age: Some(json!(29)),
            gender: Some("Male".into()),
            symptoms: Some("Headache behind the eyes".into()),
            duration: Some("2 days".into()),
            severity: Some("MILD".into()),
            medical_history: Some(vec!["Migraine".into(), "  ".into()]),
        }
    }

    fn message_for(req: &AnalyzeSymptomsReq) -> String {
        match validate_request(req) {
            Err(AnalysisError::Validation(msg)) => msg,
            other => panic!("expected validation failure, got {other:?}"),
        }
    }

    #[test]
    fn accepts_valid_request_and_normalises_fields() {
        let input = validate_request(&valid_request()).expect("valid request");
        assert_eq!(input.name.as_ref().map(|n| n.as_str()), Some("Sam"));
        assert_eq!(input.age.years(), 29);
        assert_eq!(input.gender, Gender::Male);
        assert_eq!(input.severity, Severity::Mild);
        assert_eq!(input.medical_history, vec!["Migraine".to_string()]);
    }

    #[test]
    fn blank_name_and_missing_history_are_allowed() {
        let req = AnalyzeSymptomsReq {
            name: Some("   ".into()),
            medical_history: None,
            ..valid_request()
        };
        let input = validate_request(&req).expect("valid request");
        assert!(input.name.is_none());
        assert!(input.medical_history.is_empty());
    }

    #[test]
    fn symptoms_are_checked_first() {
        let req = AnalyzeSymptomsReq {
            symptoms: Some(" ".into()),
            age: None,
            ..valid_request()
        };
        assert_eq!(message_for(&req), MSG_SYMPTOMS_REQUIRED);
    }

    #[test]
    fn age_must_be_an_integer_in_range() {
        for bad in [json!(0), json!(121), json!(33.5), json!("abc"), json!(true)] {
            let req = AnalyzeSymptomsReq {
                age: Some(bad.clone()),
                ..valid_request()
            };
            assert_eq!(message_for(&req), MSG_AGE_INVALID, "age {bad} should fail");
        }
    }

    #[test]
    fn age_accepts_numeric_strings_and_integral_floats() {
        for good in [json!("45"), json!(45.0), json!(" 45 ")] {
            let req = AnalyzeSymptomsReq {
                age: Some(good),
                ..valid_request()
            };
            assert_eq!(validate_request(&req).unwrap().age.years(), 45);
        }
    }

    #[test]
    fn gender_duration_and_severity_messages() {
        let req = AnalyzeSymptomsReq {
            gender: Some("robot".into()),
            ..valid_request()
        };
        assert_eq!(message_for(&req), MSG_GENDER_INVALID);

        let req = AnalyzeSymptomsReq {
            duration: None,
            ..valid_request()
        };
        assert_eq!(message_for(&req), MSG_DURATION_REQUIRED);

        let req = AnalyzeSymptomsReq {
            severity: Some("extreme".into()),
            ..valid_request()
        };
        assert_eq!(message_for(&req), MSG_SEVERITY_INVALID);
    }
}
