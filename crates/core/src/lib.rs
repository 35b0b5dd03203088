//! # Symptom Checker Core
//!
//! Core business logic for the healthcare symptom checker.
//!
//! This crate owns the analysis pipeline and everything it needs:
//! - Request validation into a typed [`PatientInput`]
//! - Deterministic prompt construction
//! - The [`ModelInvoker`] seam to the text-generation service
//! - Tiered normalization of model replies (strict, repaired, fallback)
//! - Result envelopes and the bounded in-memory history
//! - Startup configuration and error types
//!
//! **No API concerns**: HTTP servers, routing and model-client transports belong in `api-rest`,
//! `gemini` or the binaries.

pub mod analysis;
pub mod config;
pub mod constants;
pub mod envelope;
pub mod error;
pub mod history;
pub mod model;
pub mod normalizer;
pub mod patient;
pub mod prompt;
pub mod repair;
pub mod service;
pub mod validation;

pub use analysis::{AnalysisRecord, AnalysisReport, Likelihood, ProbableCondition, ShapeMismatch};
pub use config::ServiceConfig;
pub use envelope::ResultEnvelope;
pub use error::{AnalysisError, AnalysisResult, ConfigError, ConfigResult};
pub use history::{HistoryEntry, HistoryStore};
pub use model::{ModelError, ModelInvoker};
pub use normalizer::{normalize_response, NormalizationTier, Normalized};
pub use patient::PatientInput;
pub use prompt::build_prompt;
pub use repair::{repair_json, RepairError};
pub use service::SymptomAnalysisService;
pub use validation::validate_request;
