//! # diary-config
//!
//! Layered settings: built-in defaults, then `DIARY_*` environment variables.
//! Nested keys use `__`, e.g. `DIARY_SERVER__PORT=8080` or
//! `DIARY_DATABASE__URL=sqlite:/var/lib/diary/diary.db`.
//!
//! The binary loads `.env` (via dotenvy) before calling [`Settings::load`], so
//! a dotfile feeds the same variables.

use std::collections::HashMap;
use std::path::PathBuf;

use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;

pub const ENV_PREFIX: &str = "DIARY";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn is_production(self) -> bool {
        self == Environment::Production
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Public domain the production client is served from.
    pub domain: String,
    /// Where `/` redirects in development (the client's dev server).
    pub dev_client_url: String,
    /// Built client assets, served in production.
    pub static_dir: PathBuf,
}

#[derive(Debug, Deserialize)]
pub struct DatabaseSettings {
    /// May embed credentials for networked backends, so it stays secret.
    pub url: SecretString,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RateLimitSettings {
    pub window_secs: u64,
    pub max_requests: u32,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub environment: Environment,
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub rate_limit: RateLimitSettings,
}

impl Settings {
    /// Reads the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(None)
    }

    /// Same as [`Settings::load`] but reads `vars` instead of the process
    /// environment when given.
    pub fn load_with(vars: Option<HashMap<String, String>>) -> Result<Self, ConfigError> {
        let settings: Settings = config::Config::builder()
            .set_default("environment", "development")?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("server.domain", "localhost")?
            .set_default("server.dev_client_url", "http://localhost:5173")?
            .set_default("server.static_dir", "client/dist")?
            .set_default("database.url", "sqlite:diary.db?mode=rwc")?
            .set_default("database.max_connections", 10)?
            .set_default("rate_limit.window_secs", 15 * 60)?
            .set_default("rate_limit.max_requests", 100)?
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .source(vars),
            )
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        log::debug!("loaded {} configuration", settings.environment.as_str());
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "database.max_connections must be at least 1".into(),
            ));
        }
        if self.rate_limit.window_secs == 0 || self.rate_limit.max_requests == 0 {
            return Err(ConfigError::Invalid(
                "rate_limit.window_secs and rate_limit.max_requests must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Origins allowed to call the API from a browser.
    pub fn cors_origins(&self) -> Vec<String> {
        if self.environment.is_production() {
            vec![format!("https://{}", self.server.domain)]
        } else {
            vec![self.server.dev_client_url.clone()]
        }
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.server.host.clone(), self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    fn vars(pairs: &[(&str, &str)]) -> Option<HashMap<String, String>> {
        Some(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn defaults_describe_a_local_development_server() {
        let settings = Settings::load_with(vars(&[])).unwrap();

        assert_eq!(settings.environment, Environment::Development);
        assert_eq!(settings.bind_address(), ("0.0.0.0".to_string(), 3000));
        assert_eq!(settings.database.max_connections, 10);
        assert_eq!(settings.database.url.expose_secret(), "sqlite:diary.db?mode=rwc");
        assert_eq!(settings.rate_limit.window_secs, 900);
        assert_eq!(settings.rate_limit.max_requests, 100);
        assert_eq!(settings.cors_origins(), vec!["http://localhost:5173"]);
    }

    #[test]
    fn environment_variables_override_defaults() {
        let settings = Settings::load_with(vars(&[
            ("DIARY_ENVIRONMENT", "production"),
            ("DIARY_SERVER__PORT", "8080"),
            ("DIARY_SERVER__DOMAIN", "diary.example.org"),
            ("DIARY_DATABASE__MAX_CONNECTIONS", "4"),
        ]))
        .unwrap();

        assert!(settings.environment.is_production());
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.database.max_connections, 4);
        assert_eq!(settings.cors_origins(), vec!["https://diary.example.org"]);
    }

    #[test]
    fn database_url_is_redacted_in_debug_output() {
        let settings = Settings::load_with(vars(&[(
            "DIARY_DATABASE__URL",
            "sqlite:/srv/secret-name.db",
        )]))
        .unwrap();

        assert!(!format!("{:?}", settings.database).contains("secret-name"));
    }

    #[test]
    fn zero_rate_limit_is_rejected() {
        let err = Settings::load_with(vars(&[("DIARY_RATE_LIMIT__MAX_REQUESTS", "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn unknown_environment_name_fails_to_load() {
        let err = Settings::load_with(vars(&[("DIARY_ENVIRONMENT", "staging")])).unwrap_err();
        assert!(matches!(err, ConfigError::Load(_)));
    }
}
