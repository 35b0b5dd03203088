//! Wire models shared by the REST API and the CLI.
//!
//! These are the JSON shapes seen by clients. Field names are camelCase to match the browser
//! front end. Domain types live in `symptom-core`; translation happens there.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Render a timestamp the way browsers do (`Date.prototype.toISOString`).
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Inbound symptom analysis request.
///
/// Every field is optional on the wire so that validation can answer with a specific message
/// rather than a generic deserialisation failure.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeSymptomsReq {
    #[serde(default)]
    pub name: Option<String>,
    /// Integer 1-120. Numeric strings are accepted.
    #[serde(default)]
    #[schema(value_type = Option<i64>, example = 34)]
    pub age: Option<serde_json::Value>,
    /// One of male/female/other, case-insensitive.
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub symptoms: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
    /// One of mild/moderate/severe, case-insensitive.
    #[serde(default)]
    pub severity: Option<String>,
    #[serde(default)]
    pub medical_history: Option<Vec<String>>,
}

/// Patient fields echoed back in a result.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PatientDataRes {
    pub name: String,
    pub age: u8,
    pub gender: String,
    pub symptoms: String,
    pub duration: String,
    pub severity: String,
    pub medical_history: Vec<String>,
}

/// Successful analysis result.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeSymptomsRes {
    pub success: bool,
    pub timestamp: String,
    pub patient_data: PatientDataRes,
    /// The model's analysis. Usually follows the report shape but is not guaranteed to.
    #[schema(value_type = Object)]
    pub analysis: serde_json::Value,
    pub message: String,
}

/// Error body returned for every non-success response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorRes {
    pub success: bool,
    pub message: String,
    /// Underlying cause, only populated in development mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ErrorRes {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            error: None,
        }
    }

    pub fn with_detail(mut self, detail: Option<String>) -> Self {
        self.error = detail;
        self
    }
}

/// Status of the collaborating services.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ServicesStatus {
    pub api: String,
    #[serde(rename = "geminiAI")]
    pub model: String,
}

/// Health check response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub success: bool,
    pub message: String,
    pub timestamp: String,
    pub status: String,
    pub services: ServicesStatus,
}

/// Endpoint directory returned from the service root.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EndpointsRes {
    pub health: String,
    pub analyze_symptoms: String,
    pub history: String,
}

/// Service root response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ServiceInfoRes {
    pub success: bool,
    pub message: String,
    pub version: String,
    pub endpoints: EndpointsRes,
}

/// One stored analysis.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntryRes {
    pub id: String,
    pub timestamp: String,
    pub patient_data: PatientDataRes,
    #[schema(value_type = Object)]
    pub analysis: serde_json::Value,
}

/// Stored analyses, newest first.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ListHistoryRes {
    pub entries: Vec<HistoryEntryRes>,
}

/// Outcome of a history mutation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HistoryMutationRes {
    pub success: bool,
    pub message: String,
}
