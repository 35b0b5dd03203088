use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::AppState;
use gemini_client::{GeminiClient, GeminiConfig};
use symptom_core::{ServiceConfig, SymptomAnalysisService};

/// Main entry point for the symptom checker
///
/// Resolves configuration once, builds the Gemini client and serves the REST API.
///
/// # Environment Variables
/// - `SYMPTOM_REST_ADDR` / `PORT`: REST bind address (default: "0.0.0.0:5000")
/// - `NODE_ENV`: `development` includes error details in responses
/// - `SYMPTOM_HISTORY_CAPACITY`: analyses kept in history (default: 50)
/// - `GEMINI_API_KEY`, `GEMINI_MODEL`, `GEMINI_BASE_URL`, `GEMINI_TIMEOUT_SECS`: model client
///
/// # Errors
/// Returns an error if configuration is invalid or the server fails to bind or run.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("symptom_run=info".parse()?)
                .add_directive("api_rest=info".parse()?)
                .add_directive("symptom_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServiceConfig::from_env()?;
    let gemini = GeminiClient::new(GeminiConfig::from_env()?)?;

    if gemini.config().api_key().is_none() {
        tracing::warn!("GEMINI_API_KEY is not set; analysis requests will fail until it is");
    }
    tracing::info!(
        model = %gemini.config().model(),
        history_capacity = config.history_capacity(),
        development = config.expose_error_details(),
        "++ Symptom checker configured"
    );

    let service = SymptomAnalysisService::new(Arc::new(gemini));
    api_rest::serve(AppState::new(config, service)).await
}
