//! Result envelope assembly.

use crate::analysis::AnalysisRecord;
use crate::constants::ANALYSIS_COMPLETED_MESSAGE;
use crate::normalizer::{Normalized, NormalizationTier};
use crate::patient::PatientInput;
use api_shared::{format_timestamp, AnalyzeSymptomsRes};
use chrono::{DateTime, Utc};

/// A completed analysis: the patient echo, the record and when it was produced.
///
/// The tier is kept for logging and the CLI. It is not part of the wire response.
#[derive(Clone, Debug, PartialEq)]
pub struct ResultEnvelope {
    pub patient: PatientInput,
    pub analysis: AnalysisRecord,
    pub tier: NormalizationTier,
    pub timestamp: DateTime<Utc>,
}

impl ResultEnvelope {
    /// Assemble an envelope with an explicit timestamp.
    pub fn new_at(patient: PatientInput, normalized: Normalized, timestamp: DateTime<Utc>) -> Self {
        Self {
            patient,
            analysis: normalized.record,
            tier: normalized.tier,
            timestamp,
        }
    }

    /// Assemble an envelope stamped with the current time.
    pub fn new(patient: PatientInput, normalized: Normalized) -> Self {
        Self::new_at(patient, normalized, Utc::now())
    }

    pub fn to_wire(&self) -> AnalyzeSymptomsRes {
        AnalyzeSymptomsRes {
            success: true,
            timestamp: format_timestamp(self.timestamp),
            patient_data: self.patient.to_wire(),
            analysis: self.analysis.as_value().clone(),
            message: ANALYSIS_COMPLETED_MESSAGE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patient::fixtures::patient;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn wire_form_carries_echo_record_and_timestamp() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        let normalized = Normalized {
            record: AnalysisRecord::from_value(json!({"disclaimer": "d"})),
            tier: NormalizationTier::Strict,
        };
        let wire = ResultEnvelope::new_at(patient(), normalized, at).to_wire();

        assert!(wire.success);
        assert_eq!(wire.timestamp, "2024-03-01T09:30:00.000Z");
        assert_eq!(wire.patient_data.name, "Sarah Williams");
        assert_eq!(wire.analysis, json!({"disclaimer": "d"}));
        assert_eq!(wire.message, "Symptom analysis completed successfully");

        let body = serde_json::to_value(&wire).unwrap();
        assert!(body.get("tier").is_none());
        assert!(body.get("patientData").is_some());
    }
}
