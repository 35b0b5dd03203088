//! The analysis pipeline: validate, prompt, invoke, normalize, envelope.

use crate::envelope::ResultEnvelope;
use crate::error::AnalysisResult;
use crate::model::ModelInvoker;
use crate::normalizer::normalize_response;
use crate::patient::PatientInput;
use crate::prompt::build_prompt;
use crate::validation::validate_request;
use api_shared::AnalyzeSymptomsReq;
use std::sync::Arc;

/// Runs one analysis per call. Holds no state beyond the model client.
#[derive(Clone)]
pub struct SymptomAnalysisService {
    invoker: Arc<dyn ModelInvoker>,
}

impl SymptomAnalysisService {
    pub fn new(invoker: Arc<dyn ModelInvoker>) -> Self {
        Self { invoker }
    }

    /// Whether the underlying model client is configured.
    pub fn model_configured(&self) -> bool {
        self.invoker.is_configured()
    }

    /// Validate `req` and analyze it.
    ///
    /// # Errors
    /// See [`Self::analyze`]; additionally returns `AnalysisError::Validation` for bad input
    /// without contacting the model.
    pub async fn analyze_request(&self, req: &AnalyzeSymptomsReq) -> AnalysisResult<ResultEnvelope> {
        let input = validate_request(req)?;
        self.analyze(input).await
    }

    /// Analyze already-validated input.
    ///
    /// # Errors
    /// Returns the model failure (authentication, quota or transient) when no reply text was
    /// obtained. A reply that cannot be parsed is not an error: it yields the fallback record.
    pub async fn analyze(&self, input: PatientInput) -> AnalysisResult<ResultEnvelope> {
        let prompt = build_prompt(&input);
        tracing::debug!(model = %self.invoker.model_name(), "invoking model");

        let raw = self.invoker.generate(&prompt).await.map_err(|e| {
            tracing::error!(model = %self.invoker.model_name(), error = %e, "model invocation failed");
            e
        })?;

        let normalized = normalize_response(&raw);
        Ok(ResultEnvelope::new(input, normalized))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalysisError;
    use crate::model::ModelError;
    use crate::normalizer::NormalizationTier;
    use crate::patient::fixtures::patient;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    /// Returns a canned reply and remembers the prompt it was given.
    struct CannedInvoker {
        reply: Result<String, ModelError>,
        seen: Mutex<Vec<String>>,
    }

    impl CannedInvoker {
        fn new(reply: Result<String, ModelError>) -> Arc<Self> {
            Arc::new(Self {
                reply,
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl ModelInvoker for CannedInvoker {
        async fn generate(&self, prompt: &str) -> Result<String, ModelError> {
            self.seen.lock().unwrap().push(prompt.to_string());
            self.reply.clone()
        }
    }

    #[tokio::test]
    async fn fenced_reply_becomes_envelope() {
        let reply = "```json\n{\"probableConditions\":[{\"name\":\"Pharyngitis\",\"likelihood\":\"High\",\"description\":\"d\",\"reasoning\":\"r\"}],\"recommendations\":[\"Rest\"],\"warningSymptoms\":[],\"nextSteps\":[],\"disclaimer\":\"x\"}\n```";
        let invoker = CannedInvoker::new(Ok(reply.into()));
        let service = SymptomAnalysisService::new(invoker.clone());

        let envelope = service.analyze(patient()).await.expect("analysis");

        assert_eq!(envelope.tier, NormalizationTier::Strict);
        assert_eq!(envelope.patient, patient());
        assert_eq!(
            envelope.analysis.as_value()["probableConditions"][0]["name"],
            json!("Pharyngitis")
        );
        let seen = invoker.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].contains("- Name: Sarah Williams"));
    }

    #[tokio::test]
    async fn prose_reply_falls_back_without_error() {
        let service = SymptomAnalysisService::new(CannedInvoker::new(Ok(
            "I cannot help with that.".into(),
        )));
        let envelope = service.analyze(patient()).await.expect("analysis");
        assert_eq!(envelope.tier, NormalizationTier::Fallback);
        assert_eq!(
            envelope.analysis.as_value()["probableConditions"][0]["name"],
            "Analysis Error"
        );
    }

    #[tokio::test]
    async fn quota_failure_is_distinct() {
        let service = SymptomAnalysisService::new(CannedInvoker::new(Err(
            ModelError::QuotaExceeded("RESOURCE_EXHAUSTED".into()),
        )));
        assert_eq!(
            service.analyze(patient()).await,
            Err(AnalysisError::QuotaExceeded("RESOURCE_EXHAUSTED".into()))
        );
    }

    #[tokio::test]
    async fn invalid_request_never_reaches_model() {
        let invoker = CannedInvoker::new(Ok("{}".into()));
        let service = SymptomAnalysisService::new(invoker.clone());
        let req = AnalyzeSymptomsReq {
            symptoms: Some("cough".into()),
            ..Default::default()
        };

        let err = service.analyze_request(&req).await.unwrap_err();
        assert_eq!(err, AnalysisError::Validation("Valid age is required (1-120)".into()));
        assert!(invoker.seen.lock().unwrap().is_empty());
    }
}
