//! Seam between the pipeline and the text-generation service.
//!
//! The core only needs "prompt in, text out". Concrete clients (the Gemini REST client, test
//! stubs) implement [`ModelInvoker`] and classify their own failures into [`ModelError`].

use async_trait::async_trait;

/// Failure kinds a model service may report.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// The credential is invalid or missing.
    #[error("model authentication failed: {0}")]
    Authentication(String),
    /// The service usage limit has been reached.
    #[error("model quota exceeded: {0}")]
    QuotaExceeded(String),
    /// Anything else: network, timeout, malformed request, empty reply.
    #[error("model invocation failed: {0}")]
    Transient(String),
}

/// A text-generation service invoked once per analysis.
#[async_trait]
pub trait ModelInvoker: Send + Sync {
    /// Send `prompt` and return the raw reply text.
    ///
    /// The reply is not guaranteed to be JSON; it may be fenced or wrapped in prose.
    async fn generate(&self, prompt: &str) -> Result<String, ModelError>;

    /// Whether the client holds what it needs to attempt a call (for health reporting).
    fn is_configured(&self) -> bool {
        true
    }

    /// Human-readable model identifier for logs.
    fn model_name(&self) -> &str {
        "unknown"
    }
}
