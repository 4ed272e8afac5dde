// src/config/app.rs
use std::path::PathBuf;
use std::time::Duration;

use super::{process_env, ConfigError};

pub const ENV_RECENCY_DAYS: &str = "RECENCIA_DIAS";
pub const ENV_HTTP_TIMEOUT_SECS: &str = "HTTP_TIMEOUT_SECS";
pub const ENV_HTTP_USER_AGENT: &str = "HTTP_USER_AGENT";
pub const ENV_SMTP_HOST: &str = "SMTP_HOST";
pub const ENV_SMTP_PORT: &str = "SMTP_PORT";
pub const ENV_SOURCES_PATH: &str = "SOURCES_PATH";
pub const ENV_KEYWORDS_PATH: &str = "KEYWORDS_PATH";
pub const ENV_CSV_LOG_PATH: &str = "CSV_LOG_PATH";

pub const DEFAULT_RECENCY_DAYS: u32 = 14;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 20;
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 EditaisBot";
pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
pub const DEFAULT_SMTP_PORT: u16 = 587;
pub const DEFAULT_SOURCES_PATH: &str = "sources_editais.yaml";
pub const DEFAULT_CSV_LOG_PATH: &str = "editais_log.csv";

/// Non-secret settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Trailing window (days) an RSS entry's publish date must fall into.
    pub recency_days: u32,
    pub http_timeout: Duration,
    pub user_agent: String,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub sources_path: PathBuf,
    pub keywords_path: Option<PathBuf>,
    pub csv_path: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            recency_days: DEFAULT_RECENCY_DAYS,
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            smtp_host: DEFAULT_SMTP_HOST.to_string(),
            smtp_port: DEFAULT_SMTP_PORT,
            sources_path: PathBuf::from(DEFAULT_SOURCES_PATH),
            keywords_path: None,
            csv_path: PathBuf::from(DEFAULT_CSV_LOG_PATH),
        }
    }
}

/// Load the run configuration from the process environment.
///
/// `.env` handling is left to the binary.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` when a numeric variable does not parse.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    build_app_config(process_env)
}

/// Core parsing logic, decoupled from the real environment so tests can feed a map.
pub(crate) fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| default.to_string())
    };

    let invalid = |var: &str, e: &dyn std::fmt::Display| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason: e.to_string(),
    };

    let recency_days = or_default(ENV_RECENCY_DAYS, &DEFAULT_RECENCY_DAYS.to_string())
        .parse::<u32>()
        .map_err(|e| invalid(ENV_RECENCY_DAYS, &e))?;

    let timeout_secs = or_default(
        ENV_HTTP_TIMEOUT_SECS,
        &DEFAULT_HTTP_TIMEOUT_SECS.to_string(),
    )
    .parse::<u64>()
    .map_err(|e| invalid(ENV_HTTP_TIMEOUT_SECS, &e))?;
    if timeout_secs == 0 {
        return Err(invalid(ENV_HTTP_TIMEOUT_SECS, &"must be greater than zero"));
    }

    let smtp_port = or_default(ENV_SMTP_PORT, &DEFAULT_SMTP_PORT.to_string())
        .parse::<u16>()
        .map_err(|e| invalid(ENV_SMTP_PORT, &e))?;

    let keywords_path = lookup(ENV_KEYWORDS_PATH)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from);

    Ok(AppConfig {
        recency_days,
        http_timeout: Duration::from_secs(timeout_secs),
        user_agent: or_default(ENV_HTTP_USER_AGENT, DEFAULT_USER_AGENT),
        smtp_host: or_default(ENV_SMTP_HOST, DEFAULT_SMTP_HOST),
        smtp_port,
        sources_path: PathBuf::from(or_default(ENV_SOURCES_PATH, DEFAULT_SOURCES_PATH)),
        keywords_path,
        csv_path: PathBuf::from(or_default(ENV_CSV_LOG_PATH, DEFAULT_CSV_LOG_PATH)),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::config::test_support::lookup_from_map;

    #[test]
    fn defaults_when_env_is_empty() {
        let map: HashMap<&str, &str> = HashMap::new();
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg, AppConfig::default());
        assert_eq!(cfg.recency_days, 14);
        assert_eq!(cfg.http_timeout, Duration::from_secs(20));
        assert_eq!(cfg.smtp_port, 587);
        assert!(cfg.keywords_path.is_none());
    }

    #[test]
    fn recency_override() {
        let mut map = HashMap::new();
        map.insert(ENV_RECENCY_DAYS, "30");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.recency_days, 30);
    }

    #[test]
    fn blank_recency_falls_back_to_default() {
        let mut map = HashMap::new();
        map.insert(ENV_RECENCY_DAYS, "   ");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.recency_days, DEFAULT_RECENCY_DAYS);
    }

    #[test]
    fn invalid_recency_is_rejected() {
        let mut map = HashMap::new();
        map.insert(ENV_RECENCY_DAYS, "duas semanas");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(
                result,
                Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == ENV_RECENCY_DAYS
            ),
            "expected InvalidEnvVar(RECENCIA_DIAS), got: {result:?}"
        );
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let mut map = HashMap::new();
        map.insert(ENV_HTTP_TIMEOUT_SECS, "0");
        let result = build_app_config(lookup_from_map(&map));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == ENV_HTTP_TIMEOUT_SECS
        ));
    }

    #[test]
    fn paths_and_smtp_overrides() {
        let mut map = HashMap::new();
        map.insert(ENV_SOURCES_PATH, "/etc/editais/sources.yaml");
        map.insert(ENV_KEYWORDS_PATH, "kw.toml");
        map.insert(ENV_CSV_LOG_PATH, "out/log.csv");
        map.insert(ENV_SMTP_HOST, "smtp.example.org");
        map.insert(ENV_SMTP_PORT, "2587");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.sources_path, PathBuf::from("/etc/editais/sources.yaml"));
        assert_eq!(cfg.keywords_path, Some(PathBuf::from("kw.toml")));
        assert_eq!(cfg.csv_path, PathBuf::from("out/log.csv"));
        assert_eq!(cfg.smtp_host, "smtp.example.org");
        assert_eq!(cfg.smtp_port, 2587);
    }
}
