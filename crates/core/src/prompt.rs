//! Prompt construction for the analysis request.
//!
//! The prompt is a pure function of the patient input: the same input always produces the same
//! text. It dictates the exact JSON schema the normalizer expects back.

use crate::constants::{NAME_NOT_PROVIDED, NO_MEDICAL_HISTORY};
use crate::patient::PatientInput;

const PREAMBLE: &str = "You are an AI medical assistant for educational purposes only.";

const TASK: &str = r#"TASK:
Provide an analysis strictly in this JSON format:
{
  "probableConditions": [
    { "name": "Condition Name", "likelihood": "High/Medium/Low", "description": "Brief explanation", "reasoning": "Why this fits" }
  ],
  "recommendations": ["Specific recommendation 1","Specific recommendation 2"],
  "warningSymptoms": ["Red flag 1","Red flag 2"],
  "nextSteps": ["Action 1","Action 2"],
  "disclaimer": "This analysis is for educational purposes only and not medical advice."
}

Rules:
- Give 3–5 probable conditions.
- Plain, non-technical wording.
- Always return valid JSON only.
"#;

/// Build the analysis prompt for `input`.
pub fn build_prompt(input: &PatientInput) -> String {
    let name = input
        .name
        .as_ref()
        .map(|n| n.as_str())
        .unwrap_or(NAME_NOT_PROVIDED);
    let history = if input.medical_history.is_empty() {
        NO_MEDICAL_HISTORY.to_string()
    } else {
        input.medical_history.join(", ")
    };

    let mut prompt = String::with_capacity(PREAMBLE.len() + TASK.len() + 512);
    prompt.push('\n');
    prompt.push_str(PREAMBLE);
    prompt.push_str("\n\nPATIENT INFORMATION:\n");
    let fields = [
        ("Name", name.to_string()),
        ("Age", input.age.to_string()),
        ("Gender", input.gender.to_string()),
        ("Symptoms", input.symptoms.to_string()),
        ("Duration", input.duration.to_string()),
        ("Severity", input.severity.to_string()),
        ("Medical History", history),
    ];
    for (label, value) in fields {
        prompt.push_str(&format!("- {label}: {value}\n"));
    }
    prompt.push('\n');
    prompt.push_str(TASK);
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patient::fixtures::{anonymous_patient, patient};

    #[test]
    fn prompt_is_deterministic() {
        assert_eq!(build_prompt(&patient()), build_prompt(&patient()));
    }

    #[test]
    fn prompt_interpolates_patient_fields() {
        let prompt = build_prompt(&patient());
        assert!(prompt.contains(PREAMBLE));
        assert!(prompt.contains("- Name: Sarah Williams\n"));
        assert!(prompt.contains("- Age: 34\n"));
        assert!(prompt.contains("- Gender: female\n"));
        assert!(prompt.contains("- Symptoms: Sore throat and mild fever\n"));
        assert!(prompt.contains("- Duration: 3 days\n"));
        assert!(prompt.contains("- Severity: moderate\n"));
        assert!(prompt.contains("- Medical History: Asthma, Penicillin allergy\n"));
        assert!(!prompt.contains(NAME_NOT_PROVIDED));
        assert!(!prompt.contains(NO_MEDICAL_HISTORY));
    }

    #[test]
    fn patient_fields_are_listed_in_fixed_order() {
        let prompt = build_prompt(&patient());
        let block = prompt
            .split("PATIENT INFORMATION:\n")
            .nth(1)
            .and_then(|rest| rest.split("\n\n").next())
            .unwrap();
        let labels: Vec<&str> = block
            .lines()
            .filter_map(|line| line.strip_prefix("- ")?.split(':').next())
            .collect();
        assert_eq!(
            labels,
            ["Name", "Age", "Gender", "Symptoms", "Duration", "Severity", "Medical History"]
        );
    }

    #[test]
    fn prompt_substitutes_labels_for_absent_fields() {
        let prompt = build_prompt(&anonymous_patient());
        assert!(prompt.contains("- Name: Not provided\n"));
        assert!(prompt.contains("- Medical History: None reported\n"));
    }

    #[test]
    fn prompt_carries_schema_and_rules() {
        let prompt = build_prompt(&patient());
        for needle in [
            "\"probableConditions\"",
            "\"recommendations\"",
            "\"warningSymptoms\"",
            "\"nextSteps\"",
            "\"disclaimer\"",
            "Give 3–5 probable conditions.",
            "Plain, non-technical wording.",
            "Always return valid JSON only.",
        ] {
            assert!(prompt.contains(needle), "prompt is missing {needle}");
        }
    }
}
