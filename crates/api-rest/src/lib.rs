//! # API REST
//!
//! REST API implementation for the symptom checker.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON bodies, status codes, CORS)
//!
//! Uses `api-shared` for wire types and `symptom-core` for the pipeline and history.

#![warn(rust_2018_idioms)]

use api_shared::{
    AnalyzeSymptomsReq, AnalyzeSymptomsRes, EndpointsRes, ErrorRes, HealthRes, HealthService,
    HistoryEntryRes, HistoryMutationRes, ListHistoryRes, PatientDataRes, ServiceInfoRes,
    ServicesStatus,
};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use symptom_core::constants::{MSG_ANALYSIS_FAILED, MSG_API_KEY_INVALID, MSG_QUOTA_EXCEEDED};
use symptom_core::{AnalysisError, HistoryStore, ServiceConfig, SymptomAnalysisService};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub const MSG_ROUTE_NOT_FOUND: &str = "Route not found";
pub const MSG_INVALID_JSON: &str = "Invalid JSON body";
pub const MSG_HISTORY_NOT_FOUND: &str = "History entry not found";

/// Application state for the REST API server
///
/// Shared by all request handlers. Configuration is immutable; the history store is the only
/// mutable state and guards itself.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServiceConfig>,
    pub service: SymptomAnalysisService,
    pub history: HistoryStore,
}

impl AppState {
    pub fn new(config: ServiceConfig, service: SymptomAnalysisService) -> Self {
        let history = HistoryStore::new(config.history_capacity());
        Self {
            config: Arc::new(config),
            service,
            history,
        }
    }
}

/// Error response produced by handlers.
pub type ApiError = (StatusCode, Json<ErrorRes>);

fn api_error(status: StatusCode, message: &str) -> ApiError {
    (status, Json(ErrorRes::new(message)))
}

/// Map a pipeline failure to a status code and body.
///
/// The underlying detail is included only when `expose_details` is set (development mode).
pub fn analysis_error_response(err: &AnalysisError, expose_details: bool) -> ApiError {
    let detail = expose_details.then(|| err.to_string());
    let (status, message) = match err {
        AnalysisError::Validation(message) => return api_error(StatusCode::BAD_REQUEST, message),
        AnalysisError::Authentication(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, MSG_API_KEY_INVALID)
        }
        AnalysisError::QuotaExceeded(_) => (StatusCode::TOO_MANY_REQUESTS, MSG_QUOTA_EXCEEDED),
        AnalysisError::Transient(_) => (StatusCode::INTERNAL_SERVER_ERROR, MSG_ANALYSIS_FAILED),
    };
    (status, Json(ErrorRes::new(message).with_detail(detail)))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        service_info,
        health,
        analyze_symptoms,
        list_history,
        get_history_entry,
        delete_history_entry,
        clear_history,
    ),
    components(schemas(
        AnalyzeSymptomsReq,
        AnalyzeSymptomsRes,
        PatientDataRes,
        ErrorRes,
        HealthRes,
        ServicesStatus,
        ServiceInfoRes,
        EndpointsRes,
        HistoryEntryRes,
        ListHistoryRes,
        HistoryMutationRes,
    ))
)]
pub struct ApiDoc;

/// Build the application router with docs, CORS and the not-found fallback.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(service_info))
        .route("/api/health", get(health))
        .route("/api/analyze-symptoms", post(analyze_symptoms))
        .route("/api/history", get(list_history).delete(clear_history))
        .route(
            "/api/history/:id",
            get(get_history_entry).delete(delete_history_entry),
        )
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .fallback(not_found)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind the configured address and serve until the process exits.
///
/// # Errors
/// Returns an error if the address cannot be bound or the server fails while running.
pub async fn serve(state: AppState) -> anyhow::Result<()> {
    let addr = state.config.rest_addr();
    tracing::info!("-- Starting Symptom Checker REST API on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(state)).await?;
    Ok(())
}

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service information", body = ServiceInfoRes)
    )
)]
#[axum::debug_handler]
async fn service_info() -> Json<ServiceInfoRes> {
    Json(ServiceInfoRes {
        success: true,
        message: "Healthcare Symptom Checker API".into(),
        version: env!("CARGO_PKG_VERSION").into(),
        endpoints: EndpointsRes {
            health: "/api/health".into(),
            analyze_symptoms: "/api/analyze-symptoms".into(),
            history: "/api/history".into(),
        },
    })
}

#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint
///
/// Reports the API as operational and the model as connected when a credential is configured.
#[axum::debug_handler]
async fn health(State(state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health(state.service.model_configured()))
}

#[utoipa::path(
    post,
    path = "/api/analyze-symptoms",
    request_body = AnalyzeSymptomsReq,
    responses(
        (status = 200, description = "Analysis completed", body = AnalyzeSymptomsRes),
        (status = 400, description = "Invalid input or malformed JSON", body = ErrorRes),
        (status = 429, description = "Model quota exceeded", body = ErrorRes),
        (status = 500, description = "Model unavailable or misconfigured", body = ErrorRes)
    )
)]
/// Analyze patient-reported symptoms
///
/// Validates the request, runs the analysis pipeline and records the result in history. A model
/// reply that cannot be parsed still succeeds, carrying the fallback analysis.
///
/// # Errors
/// - `400` for validation failures and malformed JSON bodies
/// - `429` when the model quota is exhausted
/// - `500` for authentication and other model failures
#[axum::debug_handler]
async fn analyze_symptoms(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeSymptomsReq>, JsonRejection>,
) -> Result<Json<AnalyzeSymptomsRes>, ApiError> {
    let Json(req) = payload.map_err(|rejection| {
        tracing::warn!("Rejected request body: {}", rejection.body_text());
        let detail = state
            .config
            .expose_error_details()
            .then(|| rejection.body_text());
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorRes::new(MSG_INVALID_JSON).with_detail(detail)),
        )
    })?;

    match state.service.analyze_request(&req).await {
        Ok(envelope) => {
            let entry = state.history.record(envelope);
            tracing::info!(id = %entry.id, tier = %entry.envelope.tier, "Symptom analysis completed");
            Ok(Json(entry.envelope.to_wire()))
        }
        Err(e) => {
            match &e {
                AnalysisError::Validation(msg) => tracing::info!("Validation failed: {}", msg),
                other => tracing::error!("Analyze symptoms error: {:?}", other),
            }
            Err(analysis_error_response(
                &e,
                state.config.expose_error_details(),
            ))
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/history",
    responses(
        (status = 200, description = "Stored analyses, newest first", body = ListHistoryRes)
    )
)]
#[axum::debug_handler]
async fn list_history(State(state): State<AppState>) -> Json<ListHistoryRes> {
    Json(ListHistoryRes {
        entries: state.history.list().iter().map(|e| e.to_wire()).collect(),
    })
}

#[utoipa::path(
    get,
    path = "/api/history/{id}",
    params(("id" = String, Path, description = "History entry identifier")),
    responses(
        (status = 200, description = "Stored analysis", body = HistoryEntryRes),
        (status = 404, description = "No such entry", body = ErrorRes)
    )
)]
#[axum::debug_handler]
async fn get_history_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<HistoryEntryRes>, ApiError> {
    state
        .history
        .get(&id)
        .map(|entry| Json(entry.to_wire()))
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, MSG_HISTORY_NOT_FOUND))
}

#[utoipa::path(
    delete,
    path = "/api/history/{id}",
    params(("id" = String, Path, description = "History entry identifier")),
    responses(
        (status = 200, description = "Entry deleted", body = HistoryMutationRes),
        (status = 404, description = "No such entry", body = ErrorRes)
    )
)]
#[axum::debug_handler]
async fn delete_history_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<HistoryMutationRes>, ApiError> {
    if state.history.delete(&id) {
        Ok(Json(HistoryMutationRes {
            success: true,
            message: "History entry deleted".into(),
        }))
    } else {
        Err(api_error(StatusCode::NOT_FOUND, MSG_HISTORY_NOT_FOUND))
    }
}

#[utoipa::path(
    delete,
    path = "/api/history",
    responses(
        (status = 200, description = "History cleared", body = HistoryMutationRes)
    )
)]
#[axum::debug_handler]
async fn clear_history(State(state): State<AppState>) -> Json<HistoryMutationRes> {
    state.history.clear();
    Json(HistoryMutationRes {
        success: true,
        message: "History cleared".into(),
    })
}

async fn not_found() -> ApiError {
    api_error(StatusCode::NOT_FOUND, MSG_ROUTE_NOT_FOUND)
}
