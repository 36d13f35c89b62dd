use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::Path;
use thiserror::Error;
use tracing::{error, info, warn};
use validator::{Validate, ValidationError, ValidationErrors};

/// Default values for configuration
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_ENV: &str = "development";
const DEFAULT_PORT: u16 = 8080;
const CONFIG_DIR: &str = "config";
/// Seven days, the lifetime of a login token.
const DEFAULT_JWT_EXPIRATION_SECS: u64 = 7 * 24 * 60 * 60;
const DEV_DEFAULT_JWT_SECRET: &str =
    "artmart_development_signing_secret_not_for_production_use_0123";

/// Application configuration structure with validation
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Database connection URL
    #[validate(length(min = 1))]
    pub database_url: String,

    /// Token signing secret. Optional at load time; see [`AppConfig::signing_secret`].
    #[serde(default)]
    #[validate(custom = "validate_jwt_secret")]
    pub jwt_secret: Option<String>,

    /// Login token lifetime in seconds
    #[serde(default = "default_jwt_expiration_secs")]
    #[validate(range(min = 1))]
    pub jwt_expiration_secs: u64,

    /// Server host address
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Application environment
    #[validate(length(min = 1))]
    pub environment: String,

    /// Logging level
    #[serde(default = "default_log_level")]
    #[validate(custom = "validate_log_level")]
    pub log_level: String,

    /// Log in JSON format (structured logging)
    #[serde(default)]
    pub log_json: bool,

    /// Whether to run database migrations on startup
    #[serde(default)]
    pub auto_migrate: bool,

    /// Enforce the forward-only order status graph instead of allowing any change
    #[serde(default)]
    pub strict_order_transitions: bool,

    /// CORS: comma-separated list of allowed origins
    #[serde(default)]
    pub cors_allowed_origins: Option<String>,

    /// DB pool: max connections
    #[serde(default = "default_db_max_connections")]
    pub db_max_connections: u32,

    /// DB pool: min connections
    #[serde(default = "default_db_min_connections")]
    pub db_min_connections: u32,

    /// DB pool: connect timeout (secs)
    #[serde(default = "default_db_connect_timeout_secs")]
    pub db_connect_timeout_secs: u64,

    /// DB pool: idle timeout (secs)
    #[serde(default = "default_db_idle_timeout_secs")]
    pub db_idle_timeout_secs: u64,

    /// DB pool: acquire timeout (secs)
    #[serde(default = "default_db_acquire_timeout_secs")]
    pub db_acquire_timeout_secs: u64,
}

impl AppConfig {
    pub fn new(database_url: String, jwt_secret: Option<String>, environment: String) -> Self {
        Self {
            database_url,
            jwt_secret,
            jwt_expiration_secs: default_jwt_expiration_secs(),
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            environment,
            log_level: default_log_level(),
            log_json: false,
            auto_migrate: false,
            strict_order_transitions: false,
            cors_allowed_origins: None,
            db_max_connections: default_db_max_connections(),
            db_min_connections: default_db_min_connections(),
            db_connect_timeout_secs: default_db_connect_timeout_secs(),
            db_idle_timeout_secs: default_db_idle_timeout_secs(),
            db_acquire_timeout_secs: default_db_acquire_timeout_secs(),
        }
    }

    pub fn is_development(&self) -> bool {
        self.environment.eq_ignore_ascii_case(DEFAULT_ENV)
    }

    /// The secret used to sign login tokens.
    ///
    /// Falls back to the bundled development secret only when running in
    /// development; any other environment must configure one explicitly.
    pub fn signing_secret(&self) -> Option<&str> {
        match self.jwt_secret.as_deref().map(str::trim) {
            Some(secret) if !secret.is_empty() => Some(secret),
            _ if self.is_development() => Some(DEV_DEFAULT_JWT_SECRET),
            _ => None,
        }
    }

    /// Parsed CORS origins, empty when none are configured.
    pub fn cors_origins(&self) -> Vec<String> {
        self.cors_allowed_origins
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn log_level(&self) -> &str {
        &self.log_level
    }

    fn validate_additional_constraints(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        match self.signing_secret() {
            None => {
                let mut err = ValidationError::new("jwt_secret_required");
                err.message = Some(
                    "A signing secret is required outside development. Set APP__JWT_SECRET."
                        .into(),
                );
                errors.add("jwt_secret", err);
            }
            Some(secret) if !self.is_development() && secret == DEV_DEFAULT_JWT_SECRET => {
                let mut err = ValidationError::new("jwt_secret_default_dev");
                err.message = Some(
                    "The bundled development secret must not be used outside development.".into(),
                );
                errors.add("jwt_secret", err);
            }
            Some(_) => {}
        }

        if errors.errors().is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum AppConfigError {
    #[error("Configuration loading failed: {0}")]
    Load(#[from] ConfigError),

    #[error("Configuration validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_jwt_expiration_secs() -> u64 {
    DEFAULT_JWT_EXPIRATION_SECS
}

fn default_db_max_connections() -> u32 {
    16
}
fn default_db_min_connections() -> u32 {
    2
}
fn default_db_connect_timeout_secs() -> u64 {
    30
}
fn default_db_idle_timeout_secs() -> u64 {
    600
}
fn default_db_acquire_timeout_secs() -> u64 {
    8
}

/// Validates log level values
fn validate_log_level(level: &str) -> Result<(), ValidationError> {
    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if valid_levels.contains(&level.to_lowercase().as_str()) {
        Ok(())
    } else {
        let mut err = ValidationError::new("log_level");
        err.message = Some("Must be one of: trace, debug, info, warn, error".into());
        Err(err)
    }
}

fn validate_jwt_secret(secret: &str) -> Result<(), ValidationError> {
    let trimmed = secret.trim();

    if trimmed.len() < 32 {
        let mut err = ValidationError::new("jwt_secret");
        err.message = Some("Signing secret must be at least 32 characters".into());
        return Err(err);
    }

    const DISALLOWED: [&str; 2] = ["your_jwt_secret", "change_me"];
    let lowered = trimmed.to_ascii_lowercase();
    if DISALLOWED.iter().any(|bad| lowered.contains(bad)) {
        let mut err = ValidationError::new("jwt_secret");
        err.message = Some("Signing secret must be overridden with a secure random value".into());
        return Err(err);
    }

    Ok(())
}

/// Initializes tracing using the provided log level as the default filter
pub fn init_tracing(level: &str, json: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_directive = format!("artmart_api={},tower_http=debug", level);
    let filter_directive = env::var("RUST_LOG")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(default_directive);

    if json {
        let _ = fmt()
            .with_env_filter(EnvFilter::new(filter_directive))
            .json()
            .try_init();
    } else {
        let _ = fmt()
            .with_env_filter(EnvFilter::new(filter_directive))
            .try_init();
    }
}

/// Loads application configuration
///
/// Layers configuration sources in this order:
/// 1. Built-in defaults
/// 2. Default config (config/default.toml)
/// 3. Environment-specific config (config/{env}.toml)
/// 4. Environment variables (APP__*)
///
/// A bare `JWT_SECRET` variable is honoured when no `APP__JWT_SECRET` is set.
pub fn load_config() -> Result<AppConfig, AppConfigError> {
    let run_env = env::var("RUN_ENV")
        .or_else(|_| env::var("APP_ENV"))
        .unwrap_or_else(|_| DEFAULT_ENV.to_string());
    info!("Loading configuration for environment: {}", run_env);

    if !Path::new(CONFIG_DIR).exists() {
        info!(
            "Config directory '{}' not found; relying on built-in defaults and environment variables",
            CONFIG_DIR
        );
    }

    let config = Config::builder()
        .set_default("database_url", "sqlite://artmart.db?mode=rwc")?
        .set_default("host", "0.0.0.0")?
        .set_default("port", DEFAULT_PORT as i64)?
        .set_default("environment", run_env.as_str())?
        .set_default("log_level", DEFAULT_LOG_LEVEL)?
        .set_default("log_json", false)?
        .add_source(File::with_name(&format!("{}/default", CONFIG_DIR)).required(false))
        .add_source(File::with_name(&format!("{}/{}", CONFIG_DIR, run_env)).required(false))
        .add_source(Environment::with_prefix("APP").separator("__"))
        .build()?;

    let mut app_config: AppConfig = config.try_deserialize()?;

    if app_config.jwt_secret.is_none() {
        app_config.jwt_secret = env::var("JWT_SECRET").ok();
    }

    app_config.validate().map_err(|e| {
        error!("Configuration validation failed: {:?}", e);
        AppConfigError::Validation(e)
    })?;

    app_config.validate_additional_constraints().map_err(|e| {
        error!("Configuration security validation failed: {:?}", e);
        AppConfigError::Validation(e)
    })?;

    if app_config.jwt_secret.is_none() {
        warn!("No signing secret configured; using the development secret");
    }

    info!("Configuration loaded successfully");
    Ok(app_config)
}

#[cfg(test)]
mod tests {
    use super::*;

    const STRONG_SECRET: &str = "f3b9c1d7e5a24c6b8d0e2f4a6c8e0b2d4f6a8c0e";

    fn config_for(environment: &str, secret: Option<&str>) -> AppConfig {
        AppConfig::new(
            "sqlite::memory:".to_string(),
            secret.map(str::to_string),
            environment.to_string(),
        )
    }

    #[test]
    fn development_falls_back_to_bundled_secret() {
        let config = config_for("development", None);
        assert_eq!(config.signing_secret(), Some(DEV_DEFAULT_JWT_SECRET));
        assert!(config.validate_additional_constraints().is_ok());
    }

    #[test]
    fn production_requires_a_secret() {
        let config = config_for("production", None);
        assert_eq!(config.signing_secret(), None);
        let errors = config.validate_additional_constraints().unwrap_err();
        assert!(errors.field_errors().contains_key("jwt_secret"));
    }

    #[test]
    fn production_rejects_the_development_secret() {
        let config = config_for("production", Some(DEV_DEFAULT_JWT_SECRET));
        assert!(config.validate_additional_constraints().is_err());
    }

    #[test]
    fn production_accepts_configured_secret() {
        let config = config_for("production", Some(STRONG_SECRET));
        assert_eq!(config.signing_secret(), Some(STRONG_SECRET));
        assert!(config.validate().is_ok());
        assert!(config.validate_additional_constraints().is_ok());
    }

    #[test]
    fn short_or_placeholder_secrets_fail_validation() {
        assert!(config_for("production", Some("short")).validate().is_err());
        assert!(config_for("production", Some("your_jwt_secret"))
            .validate()
            .is_err());
    }

    #[test]
    fn padded_placeholder_secrets_are_rejected() {
        for secret in [
            "change_me_change_me_change_me_change_me",
            "YOUR_JWT_SECRET_goes_here_0123456789abcdef",
        ] {
            let err = validate_jwt_secret(secret).unwrap_err();
            assert_eq!(
                err.message.as_deref(),
                Some("Signing secret must be overridden with a secure random value"),
                "{secret}"
            );
            assert!(config_for("production", Some(secret)).validate().is_err());
        }
        assert!(validate_jwt_secret(STRONG_SECRET).is_ok());
    }

    #[test]
    fn token_lifetime_defaults_to_seven_days() {
        assert_eq!(config_for("development", None).jwt_expiration_secs, 604_800);
    }

    #[test]
    fn cors_origins_are_split_and_trimmed() {
        let mut config = config_for("development", None);
        assert!(config.cors_origins().is_empty());
        config.cors_allowed_origins = Some("https://a.test, https://b.test ,".into());
        assert_eq!(
            config.cors_origins(),
            vec!["https://a.test".to_string(), "https://b.test".to_string()]
        );
    }

    #[test]
    fn invalid_log_level_is_rejected() {
        let mut config = config_for("development", None);
        config.log_level = "loud".into();
        let errors = config.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("log_level"));
    }
}
