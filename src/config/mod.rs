// src/config/mod.rs
//! Run configuration. Everything environment-derived is collected here once and
//! passed into the components explicitly.

pub mod app;
pub mod email;

pub use app::{load_app_config, AppConfig};
pub use email::{load_email_config, EmailConfig};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required env var: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Lookup over `std::env::var`, used by the `load_*` entry points.
pub(crate) fn process_env(key: &str) -> Result<String, std::env::VarError> {
    std::env::var(key)
}
