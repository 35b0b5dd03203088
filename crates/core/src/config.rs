//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into services and
//! handlers. Request handling never reads process-wide environment variables.
//!
//! The parsing helpers take `Option<String>` values rather than reading the environment
//! themselves so they can be tested without mutating process state.

use crate::constants::{DEFAULT_HISTORY_CAPACITY, DEFAULT_REST_ADDR};
use crate::error::{ConfigError, ConfigResult};
use std::net::SocketAddr;

/// Service configuration resolved at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceConfig {
    rest_addr: SocketAddr,
    expose_error_details: bool,
    history_capacity: usize,
}

impl ServiceConfig {
    /// Create a new `ServiceConfig`.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidValue`] if `history_capacity` is zero.
    pub fn new(
        rest_addr: SocketAddr,
        expose_error_details: bool,
        history_capacity: usize,
    ) -> ConfigResult<Self> {
        if history_capacity == 0 {
            return Err(ConfigError::InvalidValue {
                key: "SYMPTOM_HISTORY_CAPACITY",
                reason: "must be at least 1".into(),
            });
        }

        Ok(Self {
            rest_addr,
            expose_error_details,
            history_capacity,
        })
    }

    /// Resolve configuration from the process environment.
    ///
    /// Intended to be called once from a binary's `main`, after `.env` has been loaded.
    ///
    /// # Environment Variables
    /// - `SYMPTOM_REST_ADDR`: full bind address (takes precedence)
    /// - `PORT`: port to bind on all interfaces when `SYMPTOM_REST_ADDR` is unset
    /// - `NODE_ENV`: `development` exposes error details in responses
    /// - `SYMPTOM_HISTORY_CAPACITY`: analyses kept in history (default 50)
    pub fn from_env() -> ConfigResult<Self> {
        let rest_addr = rest_addr_from_env_values(
            std::env::var("SYMPTOM_REST_ADDR").ok(),
            std::env::var("PORT").ok(),
        )?;
        let history_capacity =
            history_capacity_from_env_value(std::env::var("SYMPTOM_HISTORY_CAPACITY").ok())?;
        let expose_error_details = is_development(std::env::var(ENVIRONMENT_KEY).ok().as_deref());

        Self::new(rest_addr, expose_error_details, history_capacity)
    }

    pub fn rest_addr(&self) -> SocketAddr {
        self.rest_addr
    }

    pub fn expose_error_details(&self) -> bool {
        self.expose_error_details
    }

    pub fn history_capacity(&self) -> usize {
        self.history_capacity
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            rest_addr: SocketAddr::from(([0, 0, 0, 0], 5000)),
            expose_error_details: false,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Resolve the REST bind address from an explicit address or a bare port.
///
/// If both are absent or blank, returns [`DEFAULT_REST_ADDR`].
pub fn rest_addr_from_env_values(
    addr: Option<String>,
    port: Option<String>,
) -> ConfigResult<SocketAddr> {
    if let Some(addr) = non_blank(addr) {
        return addr.parse().map_err(|e| ConfigError::InvalidValue {
            key: "SYMPTOM_REST_ADDR",
            reason: format!("{addr:?} is not a socket address: {e}"),
        });
    }

    if let Some(port) = non_blank(port) {
        let port: u16 = port.parse().map_err(|e| ConfigError::InvalidValue {
            key: "PORT",
            reason: format!("{port:?} is not a port number: {e}"),
        })?;
        return Ok(SocketAddr::from(([0, 0, 0, 0], port)));
    }

    DEFAULT_REST_ADDR
        .parse()
        .map_err(|e| ConfigError::InvalidValue {
            key: "SYMPTOM_REST_ADDR",
            reason: format!("default address is invalid: {e}"),
        })
}

/// Parse the history capacity, defaulting to [`DEFAULT_HISTORY_CAPACITY`].
pub fn history_capacity_from_env_value(value: Option<String>) -> ConfigResult<usize> {
    match non_blank(value) {
        None => Ok(DEFAULT_HISTORY_CAPACITY),
        Some(v) => v.parse().map_err(|e| ConfigError::InvalidValue {
            key: "SYMPTOM_HISTORY_CAPACITY",
            reason: format!("{v:?} is not a positive integer: {e}"),
        }),
    }
}

/// Variable naming the deployment environment.
pub const ENVIRONMENT_KEY: &str = "NODE_ENV";

/// Whether the deployment environment name denotes development.
pub fn is_development(app_env: Option<&str>) -> bool {
    app_env
        .map(|v| v.trim().eq_ignore_ascii_case("development"))
        .unwrap_or(false)
}
