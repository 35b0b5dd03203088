//! Constants used throughout the symptom checker core crate.
//!
//! User-facing strings live here so the REST layer, the CLI and the tests agree on them.

/// Default bind address for the REST server.
pub const DEFAULT_REST_ADDR: &str = "0.0.0.0:5000";

/// Default number of analyses kept in the history store.
pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

/// Name echoed in results when the patient left the name blank.
pub const ANONYMOUS_PATIENT_NAME: &str = "Anonymous";

/// Prompt label used when the patient left the name blank.
pub const NAME_NOT_PROVIDED: &str = "Not provided";

/// Prompt label used when no medical history was given.
pub const NO_MEDICAL_HISTORY: &str = "None reported";

/// Message attached to every successful result.
pub const ANALYSIS_COMPLETED_MESSAGE: &str = "Symptom analysis completed successfully";

pub const MSG_SYMPTOMS_REQUIRED: &str = "Symptoms description is required";
pub const MSG_AGE_INVALID: &str = "Valid age is required (1-120)";
pub const MSG_GENDER_INVALID: &str = "Valid gender is required (male/female/other)";
pub const MSG_DURATION_REQUIRED: &str = "Symptom duration is required";
pub const MSG_SEVERITY_INVALID: &str = "Valid severity level is required (mild/moderate/severe)";

pub const MSG_API_KEY_INVALID: &str = "API key invalid or missing";
pub const MSG_QUOTA_EXCEEDED: &str = "Quota exceeded, try later";
pub const MSG_ANALYSIS_FAILED: &str = "An error occurred while analyzing symptoms";
