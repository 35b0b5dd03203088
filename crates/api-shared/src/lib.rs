//! # API Shared
//!
//! Shared definitions for the symptom checker front ends.
//!
//! Contains:
//! - Wire models (`wire` module) with OpenAPI schemas
//! - Shared services like `HealthService`
//!
//! Used by `symptom-core`, `api-rest` and the CLI.

pub mod health;
pub mod wire;

pub use health::HealthService;
pub use wire::*;
