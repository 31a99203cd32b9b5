//! Runtime settings loaded from environment variables.
//!
//! `.env` is read by `main` before these are resolved, so every value can come
//! from either the process environment or the dotenv file.

use crate::config::database::DEFAULT_DATABASE_URL;
use crate::errors::{Error, Result};
use std::net::SocketAddr;
use tracing::info;

/// Application settings
#[derive(Debug, Clone)]
pub struct AppSettings {
    /// SeaORM connection string
    pub database_url: String,
    /// Address the HTTP server listens on
    pub bind_address: SocketAddr,
    /// Lifetime of a login session in hours
    pub session_ttl_hours: i64,
    /// Whether `serve` also runs the daily rent reminder check
    pub reminder_scheduler: bool,
    /// Path of the room seeding file
    pub rooms_config_path: String,
    /// Administrator account created at startup when both parts are set
    pub bootstrap_admin: Option<(String, String)>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            bind_address: SocketAddr::from(([0, 0, 0, 0], 8000)),
            session_ttl_hours: 24,
            reminder_scheduler: false,
            rooms_config_path: "config.toml".to_string(),
            bootstrap_admin: None,
        }
    }
}

impl AppSettings {
    /// Reads settings from the environment, falling back to defaults.
    ///
    /// # Errors
    /// Returns [`Error::Config`] when a variable is present but malformed.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let bind_address = match var("BIND_ADDRESS") {
            Some(raw) => raw.parse().map_err(|e| Error::Config {
                message: format!("Invalid BIND_ADDRESS '{raw}': {e}"),
            })?,
            None => defaults.bind_address,
        };

        let session_ttl_hours = match var("SESSION_TTL_HOURS") {
            Some(raw) => match raw.parse::<i64>() {
                Ok(hours) if hours > 0 => hours,
                _ => {
                    return Err(Error::Config {
                        message: format!("SESSION_TTL_HOURS must be a positive integer, got '{raw}'"),
                    });
                }
            },
            None => defaults.session_ttl_hours,
        };

        let reminder_scheduler = var("REMINDER_SCHEDULER")
            .is_some_and(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"));

        let bootstrap_admin = match (var("ADMIN_USERNAME"), var("ADMIN_PASSWORD")) {
            (Some(user), Some(password)) => Some((user, password)),
            _ => None,
        };

        let settings = Self {
            database_url: var("DATABASE_URL").unwrap_or(defaults.database_url),
            bind_address,
            session_ttl_hours,
            reminder_scheduler,
            rooms_config_path: var("ROOMS_CONFIG").unwrap_or(defaults.rooms_config_path),
            bootstrap_admin,
        };
        info!(
            bind = %settings.bind_address,
            session_ttl_hours = settings.session_ttl_hours,
            reminder_scheduler = settings.reminder_scheduler,
            "Settings loaded"
        );
        Ok(settings)
    }
}

fn var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = AppSettings::default();
        assert_eq!(settings.bind_address.port(), 8000);
        assert_eq!(settings.session_ttl_hours, 24);
        assert!(!settings.reminder_scheduler);
        assert!(settings.bootstrap_admin.is_none());
    }
}
