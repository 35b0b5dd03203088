//! The analysis record produced by the normalizer.
//!
//! [`AnalysisRecord`] holds the model's JSON exactly as parsed. No field-level schema is
//! enforced on it: a reply that is valid JSON but the wrong shape is carried through unchanged.
//! [`AnalysisReport`] is a typed, lenient view for display and for schema-drift checks; building
//! the view never alters the record.

use serde::{Deserialize, Serialize};

/// Top-level keys the prompt asks the model to produce.
pub const EXPECTED_FIELDS: [&str; 5] = [
    "probableConditions",
    "recommendations",
    "warningSymptoms",
    "nextSteps",
    "disclaimer",
];

/// One candidate condition in a report.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbableCondition {
    #[serde(default)]
    pub name: String,
    /// Free text; the prompt asks for High/Medium/Low.
    #[serde(default)]
    pub likelihood: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub reasoning: String,
}

/// Likelihood bucket for display purposes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Likelihood {
    High,
    Medium,
    Low,
    Unknown,
}

impl ProbableCondition {
    pub fn likelihood_level(&self) -> Likelihood {
        match self.likelihood.trim().to_ascii_lowercase().as_str() {
            "high" => Likelihood::High,
            "medium" => Likelihood::Medium,
            "low" => Likelihood::Low,
            _ => Likelihood::Unknown,
        }
    }
}

/// Typed view of an analysis in the shape requested by the prompt.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    #[serde(default)]
    pub probable_conditions: Vec<ProbableCondition>,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub warning_symptoms: Vec<String>,
    #[serde(default)]
    pub next_steps: Vec<String>,
    #[serde(default)]
    pub disclaimer: String,
}

/// Why a record does not fit the [`AnalysisReport`] shape.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ShapeMismatch {
    #[error("analysis is not a JSON object")]
    NotAnObject,
    #[error("analysis is missing fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
    #[error("analysis schema mismatch at {path}: {reason}")]
    WrongType { path: String, reason: String },
}

/// A structured analysis: either the model's own JSON or the static fallback.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnalysisRecord(serde_json::Value);

impl AnalysisRecord {
    pub fn from_value(value: serde_json::Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }

    pub fn into_value(self) -> serde_json::Value {
        self.0
    }

    /// The fixed record returned when the model reply could not be interpreted.
    pub fn fallback() -> Self {
        let report = AnalysisReport {
            probable_conditions: vec![ProbableCondition {
                name: "Analysis Error".into(),
                likelihood: "Unknown".into(),
                description: "Unable to parse AI response".into(),
                reasoning: "Response was not valid JSON".into(),
            }],
            recommendations: vec![
                "Retry with clearer symptom description".into(),
                "Consult a healthcare professional".into(),
            ],
            warning_symptoms: vec![
                "Severe pain".into(),
                "Difficulty breathing".into(),
                "Chest pain".into(),
            ],
            next_steps: vec![
                "Seek immediate care if symptoms worsen".into(),
                "Book an appointment with a doctor".into(),
            ],
            disclaimer: "This analysis is for educational purposes only and not a substitute for professional medical advice.".into(),
        };
        Self::from(report)
    }

    /// Lenient typed view. Missing fields default to empty.
    ///
    /// # Errors
    /// Returns [`ShapeMismatch::NotAnObject`] for non-object records, or
    /// [`ShapeMismatch::WrongType`] with the offending path (e.g. `probableConditions[0].name`)
    /// when a present field has an unexpected type.
    pub fn report(&self) -> Result<AnalysisReport, ShapeMismatch> {
        if !self.0.is_object() {
            return Err(ShapeMismatch::NotAnObject);
        }

        serde_path_to_error::deserialize::<_, AnalysisReport>(&self.0).map_err(|err| {
            let path = err.path().to_string();
            ShapeMismatch::WrongType {
                path: if path.is_empty() || path == "." {
                    "<root>".into()
                } else {
                    path
                },
                reason: err.into_inner().to_string(),
            }
        })
    }

    /// Check the record against the requested shape without altering it.
    ///
    /// # Errors
    /// Returns the first [`ShapeMismatch`] found: non-object, wrong field type, then missing
    /// top-level fields.
    pub fn check_shape(&self) -> Result<(), ShapeMismatch> {
        self.report()?;

        let missing: Vec<&'static str> = EXPECTED_FIELDS
            .iter()
            .copied()
            .filter(|key| self.0.get(key).is_none())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ShapeMismatch::MissingFields(missing))
        }
    }
}

impl From<AnalysisReport> for AnalysisRecord {
    fn from(report: AnalysisReport) -> Self {
        // A struct of strings and vectors always serialises to a JSON object.
        Self(serde_json::to_value(report).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn fallback_has_fixed_content() {
        let record = AnalysisRecord::fallback();
        let value = record.as_value();
        assert_eq!(value["probableConditions"][0]["name"], "Analysis Error");
        assert_eq!(value["probableConditions"][0]["likelihood"], "Unknown");
        assert_eq!(
            value["warningSymptoms"],
            json!(["Severe pain", "Difficulty breathing", "Chest pain"])
        );
        assert!(value["recommendations"][1]
            .as_str()
            .unwrap()
            .contains("healthcare professional"));
        assert!(record.check_shape().is_ok());
    }

    #[test]
    fn report_view_tolerates_missing_fields() {
        let record = AnalysisRecord::from_value(json!({"disclaimer": "d"}));
        let report = record.report().expect("lenient view");
        assert_eq!(report.disclaimer, "d");
        assert!(report.recommendations.is_empty());
        assert_eq!(
            record.check_shape(),
            Err(ShapeMismatch::MissingFields(vec![
                "probableConditions",
                "recommendations",
                "warningSymptoms",
                "nextSteps",
            ]))
        );
    }

    #[test]
    fn report_view_reports_path_of_wrong_type() {
        let record = AnalysisRecord::from_value(json!({
            "probableConditions": [{"name": 7}],
        }));
        match record.report() {
            Err(ShapeMismatch::WrongType { path, .. }) => {
                assert_eq!(path, "probableConditions[0].name");
            }
            other => panic!("expected WrongType, got {other:?}"),
        }
    }

    #[test]
    fn arrays_are_not_reports_but_survive_unchanged() {
        let value = json!(["not", "a", "report"]);
        let record = AnalysisRecord::from_value(value.clone());
        assert_eq!(record.check_shape(), Err(ShapeMismatch::NotAnObject));
        assert_eq!(record.into_value(), value);
    }

    #[test]
    fn likelihood_levels_are_case_insensitive() {
        let condition = ProbableCondition {
            likelihood: "HIGH".into(),
            ..Default::default()
        };
        assert_eq!(condition.likelihood_level(), Likelihood::High);
        let condition = ProbableCondition {
            likelihood: "High/Medium".into(),
            ..Default::default()
        };
        assert_eq!(condition.likelihood_level(), Likelihood::Unknown);
    }
}
