// src/config/email.rs
use super::{process_env, ConfigError};

pub const ENV_EMAIL_USER: &str = "EMAIL_USER";
pub const ENV_EMAIL_PASS: &str = "EMAIL_PASS";
pub const ENV_EMAIL_TO: &str = "EMAIL_TO";

/// SMTP credentials and recipient. All three values are required.
#[derive(Clone, PartialEq, Eq)]
pub struct EmailConfig {
    /// Sender address, also used as the SMTP login.
    pub user: String,
    pub pass: String,
    pub to: String,
}

// Keep the credential out of logs and panic messages.
impl std::fmt::Debug for EmailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailConfig")
            .field("user", &self.user)
            .field("pass", &"***")
            .field("to", &self.to)
            .finish()
    }
}

/// # Errors
///
/// Returns `ConfigError::MissingEnvVar` naming the first absent (or blank) variable.
pub fn load_email_config() -> Result<EmailConfig, ConfigError> {
    build_email_config(process_env)
}

pub(crate) fn build_email_config<F>(lookup: F) -> Result<EmailConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    Ok(EmailConfig {
        user: require(ENV_EMAIL_USER)?,
        pass: require(ENV_EMAIL_PASS)?,
        to: require(ENV_EMAIL_TO)?,
    })
}
