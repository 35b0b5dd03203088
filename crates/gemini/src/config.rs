//! Gemini client configuration.
//!
//! Resolved once at startup. The `*_from_env_value` helpers take the raw variable values so they
//! can be tested without touching the process environment.

use crate::{GeminiError, GeminiResult};
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Clone, PartialEq, Eq)]
pub struct GeminiConfig {
    api_key: Option<String>,
    model: String,
    base_url: String,
    timeout: Duration,
}

// The API key never appears in logs.
impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl GeminiConfig {
    pub fn new(api_key: Option<String>, model: String, base_url: String, timeout: Duration) -> Self {
        Self {
            api_key: api_key
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty()),
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    /// Resolve configuration from the process environment.
    ///
    /// # Environment Variables
    /// - `GEMINI_API_KEY`: API key; when unset the client reports itself as disconnected
    /// - `GEMINI_MODEL`: model name (default `gemini-2.5-flash`)
    /// - `GEMINI_BASE_URL`: API origin (default Google's public endpoint)
    /// - `GEMINI_TIMEOUT_SECS`: request timeout in seconds (default 60)
    ///
    /// # Errors
    /// Returns [`GeminiError::InvalidConfig`] if the timeout is not a positive integer.
    pub fn from_env() -> GeminiResult<Self> {
        Ok(Self::new(
            std::env::var("GEMINI_API_KEY").ok(),
            model_from_env_value(std::env::var("GEMINI_MODEL").ok()),
            base_url_from_env_value(std::env::var("GEMINI_BASE_URL").ok()),
            timeout_from_env_value(std::env::var("GEMINI_TIMEOUT_SECS").ok())?,
        ))
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn model_from_env_value(value: Option<String>) -> String {
    non_blank(value).unwrap_or_else(|| DEFAULT_MODEL.to_string())
}

pub fn base_url_from_env_value(value: Option<String>) -> String {
    non_blank(value).unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
}

pub fn timeout_from_env_value(value: Option<String>) -> GeminiResult<Duration> {
    let Some(raw) = non_blank(value) else {
        return Ok(Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    };
    match raw.parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(GeminiError::InvalidConfig {
            key: "GEMINI_TIMEOUT_SECS",
            reason: format!("{raw:?} is not a positive number of seconds"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_to_blank_values() {
        assert_eq!(model_from_env_value(Some(" ".into())), DEFAULT_MODEL);
        assert_eq!(base_url_from_env_value(None), DEFAULT_BASE_URL);
        assert_eq!(timeout_from_env_value(None).unwrap(), Duration::from_secs(60));
    }

    #[test]
    fn timeout_must_be_positive() {
        assert_eq!(
            timeout_from_env_value(Some("15".into())).unwrap(),
            Duration::from_secs(15)
        );
        assert!(timeout_from_env_value(Some("0".into())).is_err());
        assert!(timeout_from_env_value(Some("soon".into())).is_err());
    }

    #[test]
    fn blank_key_counts_as_missing_and_is_redacted() {
        let config = GeminiConfig::new(
            Some("  ".into()),
            DEFAULT_MODEL.into(),
            "http://localhost:8080/".into(),
            Duration::from_secs(1),
        );
        assert!(config.api_key().is_none());
        assert_eq!(config.base_url(), "http://localhost:8080");

        let config = GeminiConfig::new(
            Some("secret-key".into()),
            DEFAULT_MODEL.into(),
            DEFAULT_BASE_URL.into(),
            Duration::from_secs(1),
        );
        assert!(!format!("{config:?}").contains("secret-key"));
    }
}
