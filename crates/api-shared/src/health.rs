use crate::wire::{format_timestamp, HealthRes, ServicesStatus};
use chrono::{DateTime, Utc};

/// Health report served by the REST API.
///
/// The API process is healthy whenever it can answer; the model service is reported as
/// "connected" when a credential has been configured for it.
#[derive(Clone, Debug, Default)]
pub struct HealthService;

impl HealthService {
    /// Build a health report for the current instant.
    ///
    /// # Arguments
    /// * `model_configured` - whether the model client holds a credential.
    pub fn check_health(model_configured: bool) -> HealthRes {
        Self::check_health_at(model_configured, Utc::now())
    }

    /// Build a health report with an explicit timestamp.
    pub fn check_health_at(model_configured: bool, at: DateTime<Utc>) -> HealthRes {
        HealthRes {
            success: true,
            message: "Healthcare Symptom Checker API running".into(),
            timestamp: format_timestamp(at),
            status: "healthy".into(),
            services: ServicesStatus {
                api: "operational".into(),
                model: if model_configured {
                    "connected".into()
                } else {
                    "disconnected".into()
                },
            },
        }
    }
}
