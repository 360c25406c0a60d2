//! Environment configuration.

use std::net::SocketAddr;

use chrono::Duration;

use crate::server::error::config::ConfigError;

pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_DROPBOX_API_URL: &str = "https://api.dropboxapi.com";
pub const DEFAULT_DROPBOX_CONTENT_URL: &str = "https://content.dropboxapi.com";
pub const DEFAULT_DROPBOX_TOKEN_URL: &str = "https://api.dropboxapi.com/oauth2/token";
/// Every 5 minutes, in the seconds-first format used by `tokio-cron-scheduler`
pub const DEFAULT_DROPBOX_REFRESH_CRON: &str = "0 */5 * * * *";
pub const DEFAULT_DROPBOX_REFRESH_MARGIN_SECS: i64 = 300;
/// Upper bound for `DROPBOX_REFRESH_MARGIN_SECS`
pub const MAX_DROPBOX_REFRESH_MARGIN_SECS: i64 = 86_400;

pub struct Config {
    pub database_url: String,
    pub listen_addr: SocketAddr,
    pub dropbox: DropboxConfig,
    pub dropbox_refresh_cron: String,
    pub admin: Option<AdminCredentials>,
}

/// Credentials and endpoints for the Dropbox app used to store device photos
#[derive(Clone, Debug)]
pub struct DropboxConfig {
    pub app_key: String,
    pub app_secret: String,
    /// Long-lived refresh token used to seed the token table
    pub refresh_token: String,
    pub api_url: String,
    pub content_url: String,
    pub token_url: String,
    /// Stored access tokens expiring within this margin are refreshed before use
    pub refresh_margin: Duration,
}

/// Account created at startup when no user with this username exists
pub struct AdminCredentials {
    pub username: String,
    pub password: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let listen_addr = optional("LISTEN_ADDR")
            .unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| invalid("LISTEN_ADDR", e))?;

        let refresh_margin = refresh_margin(optional("DROPBOX_REFRESH_MARGIN_SECS"))?;

        let admin = match (optional("ADMIN_USERNAME"), optional("ADMIN_PASSWORD")) {
            (Some(username), Some(password)) => Some(AdminCredentials { username, password }),
            (None, None) => None,
            _ => return Err(ConfigError::IncompleteAdminCredentials),
        };

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            listen_addr,
            dropbox: DropboxConfig {
                app_key: required("DROPBOX_APP_KEY")?,
                app_secret: required("DROPBOX_APP_SECRET")?,
                refresh_token: required("DROPBOX_REFRESH_TOKEN")?,
                api_url: optional("DROPBOX_API_URL")
                    .unwrap_or_else(|| DEFAULT_DROPBOX_API_URL.to_string()),
                content_url: optional("DROPBOX_CONTENT_URL")
                    .unwrap_or_else(|| DEFAULT_DROPBOX_CONTENT_URL.to_string()),
                token_url: optional("DROPBOX_TOKEN_URL")
                    .unwrap_or_else(|| DEFAULT_DROPBOX_TOKEN_URL.to_string()),
                refresh_margin,
            },
            dropbox_refresh_cron: optional("DROPBOX_REFRESH_CRON")
                .unwrap_or_else(|| DEFAULT_DROPBOX_REFRESH_CRON.to_string()),
            admin,
        })
    }
}

/// Seconds between 0 and [`MAX_DROPBOX_REFRESH_MARGIN_SECS`], defaulting when unset
fn refresh_margin(value: Option<String>) -> Result<Duration, ConfigError> {
    const VAR: &str = "DROPBOX_REFRESH_MARGIN_SECS";

    let secs = match value {
        Some(secs) => secs.parse::<i64>().map_err(|e| invalid(VAR, e))?,
        None => DEFAULT_DROPBOX_REFRESH_MARGIN_SECS,
    };

    if !(0..=MAX_DROPBOX_REFRESH_MARGIN_SECS).contains(&secs) {
        return Err(invalid(
            VAR,
            format!("must be between 0 and {}", MAX_DROPBOX_REFRESH_MARGIN_SECS),
        ));
    }

    Duration::try_seconds(secs).ok_or_else(|| invalid(VAR, "out of range"))
}

fn required(var: &str) -> Result<String, ConfigError> {
    optional(var).ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
}

/// Unset and empty variables are treated the same
fn optional(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|value| !value.is_empty())
}

fn invalid(var: &str, reason: impl std::fmt::Display) -> ConfigError {
    ConfigError::InvalidEnvValue {
        var: var.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::{refresh_margin, DEFAULT_DROPBOX_REFRESH_MARGIN_SECS};
    use crate::server::error::config::ConfigError;

    #[test]
    fn refresh_margin_defaults_when_unset() {
        assert_eq!(
            refresh_margin(None).unwrap(),
            Duration::seconds(DEFAULT_DROPBOX_REFRESH_MARGIN_SECS)
        );
        assert_eq!(
            refresh_margin(Some("60".to_string())).unwrap(),
            Duration::seconds(60)
        );
    }

    #[test]
    fn refresh_margin_rejects_out_of_range_values() {
        for value in ["-1", "86401", "9223372036854775807", "soon"] {
            assert!(
                matches!(
                    refresh_margin(Some(value.to_string())),
                    Err(ConfigError::InvalidEnvValue { .. })
                ),
                "{} should be rejected",
                value
            );
        }
    }
}
