//! Runtime configuration read from the environment

use readmission_guide_domain::services::{PerturbationPolicy, PolicyParseError};
use thiserror::Error;

/// Errors raised while reading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("PORT must be a number between 0 and 65535, got '{0}'")]
    InvalidPort(String),

    #[error("READMISSION_PERTURBATION is invalid: {0}")]
    InvalidPerturbation(#[from] PolicyParseError),
}

/// Application configuration
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Port to listen on (PORT, default 3000)
    pub port: u16,

    /// Deployment environment reported by the health check (APP_ENV)
    pub app_env: String,

    /// Perturbation applied to every assessment (READMISSION_PERTURBATION)
    pub perturbation: PerturbationPolicy,

    /// Whether to add a permissive CORS layer (ENABLE_CORS)
    pub enable_cors: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            app_env: "development".to_string(),
            perturbation: PerturbationPolicy::default(),
            enable_cors: true,
        }
    }
}

impl AppConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through a key lookup, falling back to defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = match lookup("PORT") {
            Some(value) => value
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(value))?,
            None => defaults.port,
        };

        let perturbation = match lookup("READMISSION_PERTURBATION") {
            Some(value) => value.parse::<PerturbationPolicy>()?,
            None => defaults.perturbation,
        };

        let enable_cors = lookup("ENABLE_CORS")
            .map(|v| v.to_lowercase() == "true" || v == "1")
            .unwrap_or(defaults.enable_cors);

        Ok(Self {
            port,
            app_env: lookup("APP_ENV").unwrap_or(defaults.app_env),
            perturbation,
            enable_cors,
        })
    }
}
