//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use axum::http::HeaderValue;
use std::net::SocketAddr;
use std::time::Duration;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub database_url: String,
    pub log_level: Level,
    pub openai_api_key: Option<String>,
    pub completion_model: String,
    pub completion_timeout: Duration,
    pub tts_model: String,
    pub tts_voice: String,
    pub allowed_origin: HeaderValue,
    pub max_upload_bytes: usize,
}

const TTS_MODELS: [&str; 2] = ["tts-1", "tts-1-hd"];
const TTS_VOICES: [&str; 6] = ["alloy", "echo", "fable", "onyx", "nova", "shimmer"];

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_vars<F>(var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // --- Load Server and Database Settings ---
        let bind_address_str = var("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let database_url =
            var("DATABASE_URL").ok_or_else(|| ConfigError::MissingVar("DATABASE_URL".to_string()))?;

        let log_level_str = var("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let allowed_origin_str =
            var("ALLOWED_ORIGIN").unwrap_or_else(|| "http://localhost:3000".to_string());
        let allowed_origin = HeaderValue::from_str(&allowed_origin_str).map_err(|e| {
            ConfigError::InvalidValue("ALLOWED_ORIGIN".to_string(), e.to_string())
        })?;

        let max_upload_bytes = parse_or(&var, "MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?;

        // --- Load API Keys (as optional) ---
        let openai_api_key = var("OPENAI_API_KEY").filter(|key| !key.is_empty());

        // --- Load Adapter-specific Settings ---
        let completion_model =
            var("COMPLETION_MODEL").unwrap_or_else(|| "gpt-3.5-turbo".to_string());

        let timeout_secs: u64 = parse_or(&var, "COMPLETION_TIMEOUT_SECS", 30)?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "COMPLETION_TIMEOUT_SECS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        let tts_model = one_of(&var, "TTS_MODEL", "tts-1", &TTS_MODELS)?;
        let tts_voice = one_of(&var, "TTS_VOICE", "nova", &TTS_VOICES)?;

        Ok(Self {
            bind_address,
            database_url,
            log_level,
            openai_api_key,
            completion_model,
            completion_timeout: Duration::from_secs(timeout_secs),
            tts_model,
            tts_voice,
            allowed_origin,
            max_upload_bytes,
        })
    }
}

fn parse_or<F, T>(var: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match var(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidValue(key.to_string(), e.to_string())),
        None => Ok(default),
    }
}

fn one_of<F>(var: &F, key: &str, default: &str, allowed: &[&str]) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let value = var(key)
        .map(|v| v.trim().to_lowercase())
        .unwrap_or_else(|| default.to_string());
    if allowed.contains(&value.as_str()) {
        Ok(value)
    } else {
        Err(ConfigError::InvalidValue(
            key.to_string(),
            format!("'{}' is not one of {}", value, allowed.join(", ")),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("DATABASE_URL", "postgres://localhost/coach")]).unwrap();
        assert_eq!(config.bind_address, "0.0.0.0:3000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.log_level, Level::INFO);
        assert_eq!(config.completion_model, "gpt-3.5-turbo");
        assert_eq!(config.completion_timeout, Duration::from_secs(30));
        assert_eq!(config.tts_model, "tts-1");
        assert_eq!(config.tts_voice, "nova");
        assert_eq!(config.allowed_origin, "http://localhost:3000");
        assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
        assert!(config.openai_api_key.is_none());
    }

    #[test]
    fn test_database_url_is_required() {
        let err = load(&[]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar(ref v) if v == "DATABASE_URL"));
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("DATABASE_URL", "postgres://db/coach"),
            ("BIND_ADDRESS", "127.0.0.1:8080"),
            ("RUST_LOG", "debug"),
            ("OPENAI_API_KEY", "sk-test"),
            ("COMPLETION_TIMEOUT_SECS", "5"),
            ("TTS_VOICE", "Onyx"),
            ("TTS_MODEL", "tts-1-hd"),
        ])
        .unwrap();
        assert_eq!(config.bind_address.port(), 8080);
        assert_eq!(config.log_level, Level::DEBUG);
        assert_eq!(config.openai_api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.completion_timeout, Duration::from_secs(5));
        assert_eq!(config.tts_voice, "onyx");
        assert_eq!(config.tts_model, "tts-1-hd");
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        for (key, value) in [
            ("BIND_ADDRESS", "not-an-address"),
            ("RUST_LOG", "loud"),
            ("COMPLETION_TIMEOUT_SECS", "0"),
            ("COMPLETION_TIMEOUT_SECS", "soon"),
            ("TTS_VOICE", "robot"),
            ("MAX_UPLOAD_BYTES", "-1"),
        ] {
            let err = load(&[("DATABASE_URL", "postgres://db"), (key, value)]).unwrap_err();
            assert!(
                matches!(err, ConfigError::InvalidValue(ref k, _) if k == key),
                "{key}={value} gave {err:?}"
            );
        }
    }
}
