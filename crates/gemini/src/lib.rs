//! # Gemini Client
//!
//! REST client for Google's Gemini `generateContent` endpoint, exposed to the pipeline as a
//! [`ModelInvoker`].
//!
//! The client sends one prompt per call with a fixed generation configuration and returns the
//! concatenated candidate text. HTTP failures are classified into [`ModelError`] kinds so the
//! REST layer can answer with the right status.

pub mod config;
mod wire;

pub use config::GeminiConfig;

use async_trait::async_trait;
use symptom_core::{ModelError, ModelInvoker};
use wire::{ErrorEnvelope, GenerateContentRequest, GenerateContentResponse};

/// Errors raised while constructing the client.
#[derive(Debug, thiserror::Error)]
pub enum GeminiError {
    #[error("invalid value for {key}: {reason}")]
    InvalidConfig { key: &'static str, reason: String },
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[from] reqwest::Error),
}

pub type GeminiResult<T> = std::result::Result<T, GeminiError>;

/// Async Gemini client. Cheap to clone; the connection pool is shared.
#[derive(Clone, Debug)]
pub struct GeminiClient {
    config: GeminiConfig,
    http: reqwest::Client,
}

impl GeminiClient {
    /// Build a client from resolved configuration.
    ///
    /// A missing API key is not an error here: the client reports itself as unconfigured and
    /// every call fails with [`ModelError::Authentication`].
    ///
    /// # Errors
    /// Returns [`GeminiError::ClientBuild`] if the HTTP client cannot be created.
    pub fn new(config: GeminiConfig) -> GeminiResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url(),
            self.config.model()
        )
    }
}

#[async_trait]
impl ModelInvoker for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, ModelError> {
        let Some(api_key) = self.config.api_key() else {
            return Err(ModelError::Authentication("GEMINI_API_KEY is not set".into()));
        };

        let body = GenerateContentRequest::new(prompt);
        let resp = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ModelError::Transient(format!("request timed out: {e}"))
                } else {
                    ModelError::Transient(format!("request failed: {e}"))
                }
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body_text = resp
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read response body".to_string());
            return Err(classify_failure(status.as_u16(), &body_text));
        }

        let parsed: GenerateContentResponse = resp
            .json()
            .await
            .map_err(|e| ModelError::Transient(format!("unreadable response: {e}")))?;

        if let Some(reason) = parsed.block_reason() {
            return Err(ModelError::Transient(format!("reply blocked: {reason}")));
        }

        // An empty reply (e.g. the token budget ran out) is handed on and ends in the fallback.
        let text = parsed.text();
        if text.trim().is_empty() {
            tracing::warn!(model = %self.config.model(), "model returned no text");
        }

        tracing::debug!(model = %self.config.model(), chars = text.len(), "model replied");
        Ok(text)
    }

    fn is_configured(&self) -> bool {
        self.config.api_key().is_some()
    }

    fn model_name(&self) -> &str {
        self.config.model()
    }
}

/// Map a non-success HTTP response to a failure kind.
///
/// Gemini reports a bad key as 400 `API_KEY_INVALID` as well as 401/403, and quota exhaustion as
/// 429 `RESOURCE_EXHAUSTED`; any message mentioning a quota is also treated as quota.
pub fn classify_failure(status: u16, body: &str) -> ModelError {
    let detail = serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .map(|envelope| envelope.error);
    let message = detail
        .as_ref()
        .map(|d| d.message.clone())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| body.trim().to_string());
    let api_status = detail.as_ref().map(|d| d.status.as_str()).unwrap_or("");
    let lowered = message.to_ascii_lowercase();

    if matches!(status, 401 | 403)
        || body.contains("API_KEY_INVALID")
        || lowered.contains("api key not valid")
    {
        ModelError::Authentication(message)
    } else if status == 429 || api_status == "RESOURCE_EXHAUSTED" || lowered.contains("quota") {
        ModelError::QuotaExceeded(message)
    } else {
        ModelError::Transient(format!("HTTP {status}: {message}"))
    }
}
