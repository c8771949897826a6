use std::env;
use std::fmt;

use chrono::NaiveDate;

/// Distinguishes runtime behavior for different stages of the tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the command-line tooling.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub reporting: ReportingConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let as_of = match env::var("APP_AS_OF") {
            Ok(value) => Some(NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(
                |source| ConfigError::InvalidAsOfDate {
                    value: value.clone(),
                    source,
                },
            )?),
            Err(_) => None,
        };

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            reporting: ReportingConfig { as_of },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// Defaults for report evaluation. `as_of` pins the evaluation date so
/// promotion tracking output stays reproducible across reruns.
#[derive(Debug, Clone)]
pub struct ReportingConfig {
    pub as_of: Option<NaiveDate>,
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidAsOfDate {
        value: String,
        source: chrono::ParseError,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidAsOfDate { value, .. } => {
                write!(f, "APP_AS_OF must be a YYYY-MM-DD date, got '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidAsOfDate { source, .. } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("APP_ENV");
        env::remove_var("APP_AS_OF");
        env::remove_var("APP_LOG_LEVEL");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert!(config.reporting.as_of.is_none());
        assert_eq!(config.telemetry.log_level, "info");
    }

    #[test]
    fn parses_pinned_as_of_date() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_AS_OF", "2024-07-31");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(
            config.reporting.as_of,
            NaiveDate::from_ymd_opt(2024, 7, 31)
        );
        reset_env();
    }

    #[test]
    fn rejects_malformed_as_of_date() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_AS_OF", "July 31");
        let error = AppConfig::load().expect_err("bad date rejected");
        assert!(matches!(error, ConfigError::InvalidAsOfDate { .. }));
        reset_env();
    }
}
