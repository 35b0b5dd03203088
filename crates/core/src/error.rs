use crate::model::ModelError;

/// Errors that abort an analysis request.
///
/// Only failures that happen before a reply text exists are represented here: once the model
/// has answered, normalization always yields a record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnalysisError {
    /// A required input field is absent or out of domain. Carries the user-facing message.
    #[error("{0}")]
    Validation(String),
    #[error("model authentication failed: {0}")]
    Authentication(String),
    #[error("model quota exceeded: {0}")]
    QuotaExceeded(String),
    #[error("model invocation failed: {0}")]
    Transient(String),
}

impl From<ModelError> for AnalysisError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::Authentication(msg) => AnalysisError::Authentication(msg),
            ModelError::QuotaExceeded(msg) => AnalysisError::QuotaExceeded(msg),
            ModelError::Transient(msg) => AnalysisError::Transient(msg),
        }
    }
}

pub type AnalysisResult<T> = std::result::Result<T, AnalysisError>;

/// Errors raised while resolving configuration at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {reason}")]
    InvalidValue { key: &'static str, reason: String },
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_failures_keep_their_kind() {
        assert_eq!(
            AnalysisError::from(ModelError::QuotaExceeded("daily limit".into())),
            AnalysisError::QuotaExceeded("daily limit".into())
        );
        assert_eq!(
            AnalysisError::from(ModelError::Authentication("bad key".into())),
            AnalysisError::Authentication("bad key".into())
        );
        assert_eq!(
            AnalysisError::from(ModelError::Transient("timeout".into())),
            AnalysisError::Transient("timeout".into())
        );
    }

    #[test]
    fn validation_displays_bare_message() {
        let err = AnalysisError::Validation("Symptom duration is required".into());
        assert_eq!(err.to_string(), "Symptom duration is required");
    }
}
