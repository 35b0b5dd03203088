//! Validated patient intake.

use crate::constants::ANONYMOUS_PATIENT_NAME;
use api_shared::PatientDataRes;
use symptom_types::{Age, Gender, NonEmptyText, Severity};

/// Patient-reported intake that has passed validation.
///
/// Built by [`crate::validation::validate_request`] or directly from already-typed values
/// (the CLI). Lives for a single pipeline run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatientInput {
    pub name: Option<NonEmptyText>,
    pub age: Age,
    pub gender: Gender,
    pub symptoms: NonEmptyText,
    pub duration: NonEmptyText,
    pub severity: Severity,
    pub medical_history: Vec<String>,
}

impl PatientInput {
    /// Name to echo back to the caller, defaulting to "Anonymous".
    pub fn display_name(&self) -> &str {
        self.name
            .as_ref()
            .map(NonEmptyText::as_str)
            .unwrap_or(ANONYMOUS_PATIENT_NAME)
    }

    /// Translate to the wire echo used in results and history entries.
    pub fn to_wire(&self) -> PatientDataRes {
        PatientDataRes {
            name: self.display_name().to_string(),
            age: self.age.years(),
            gender: self.gender.to_string(),
            symptoms: self.symptoms.to_string(),
            duration: self.duration.to_string(),
            severity: self.severity.to_string(),
            medical_history: self.medical_history.clone(),
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn patient() -> PatientInput {
        PatientInput {
            name: Some(NonEmptyText::new("Sarah Williams").unwrap()),
            age: Age::new(34).unwrap(),
            gender: Gender::Female,
            symptoms: NonEmptyText::new("Sore throat and mild fever").unwrap(),
            duration: NonEmptyText::new("3 days").unwrap(),
            severity: Severity::Moderate,
            medical_history: vec!["Asthma".into(), "Penicillin allergy".into()],
        }
    }

    pub fn anonymous_patient() -> PatientInput {
        PatientInput {
            name: None,
            medical_history: Vec::new(),
            ..patient()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;

    #[test]
    fn wire_echo_defaults_missing_name() {
        let wire = anonymous_patient().to_wire();
        assert_eq!(wire.name, "Anonymous");
        assert!(wire.medical_history.is_empty());
    }

    #[test]
    fn wire_echo_renders_vocabulary_lowercase() {
        let wire = patient().to_wire();
        assert_eq!(wire.name, "Sarah Williams");
        assert_eq!(wire.age, 34);
        assert_eq!(wire.gender, "female");
        assert_eq!(wire.severity, "moderate");
    }
}
