use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::screening::decision::RoutingPolicy;

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const PLACEHOLDER_API_KEY: &str = "your_openai_api_key_here";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Startup configuration problems. Any of these keeps the service from accepting applications.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Required environment variable '{0}' is not set")]
    Missing(&'static str),

    #[error("Environment variable '{0}' still holds the placeholder value; set a real API key")]
    Placeholder(&'static str),

    #[error("Environment variable '{key}' has an invalid value '{value}': {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("Model endpoint check failed: {0}")]
    ModelUnavailable(String),
}

/// Application configuration loaded from environment variables.
/// Startup aborts if the model credential is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub openai_model: String,
    pub openai_base_url: String,
    pub llm_timeout: Duration,
    pub llm_startup_check: bool,
    pub job_catalog_path: Option<PathBuf>,
    pub max_upload_bytes: usize,
    pub routing: RoutingPolicy,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let openai_api_key = require_env(&lookup, "OPENAI_API_KEY")?;
        if openai_api_key == PLACEHOLDER_API_KEY {
            return Err(ConfigError::Placeholder("OPENAI_API_KEY"));
        }

        let defaults = RoutingPolicy::default();
        let routing = RoutingPolicy {
            interview_threshold: parse_env(
                &lookup,
                "INTERVIEW_SCORE_THRESHOLD",
                defaults.interview_threshold,
            )?,
            escalation_threshold: parse_env(
                &lookup,
                "ESCALATION_SCORE_THRESHOLD",
                defaults.escalation_threshold,
            )?,
        };

        Ok(Config {
            openai_api_key,
            openai_model: optional_env(&lookup, "OPENAI_MODEL")
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            openai_base_url: optional_env(&lookup, "OPENAI_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            llm_timeout: Duration::from_secs(parse_env(&lookup, "LLM_TIMEOUT_SECS", 60u64)?),
            llm_startup_check: parse_env(&lookup, "LLM_STARTUP_CHECK", true)?,
            job_catalog_path: optional_env(&lookup, "JOB_CATALOG_PATH").map(PathBuf::from),
            max_upload_bytes: parse_env(&lookup, "MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            routing,
            port: parse_env(&lookup, "PORT", 8080u16)?,
            rust_log: optional_env(&lookup, "RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn optional_env<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn require_env<F>(lookup: &F, key: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    optional_env(lookup, key).ok_or(ConfigError::Missing(key))
}

fn parse_env<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match optional_env(lookup, key) {
        None => Ok(default),
        Some(value) => value.parse::<T>().map_err(|e| ConfigError::Invalid {
            key,
            reason: e.to_string(),
            value,
        }),
    }
}

#[cfg(test)]
pub(crate) fn test_config() -> Config {
    Config::from_lookup(|key| match key {
        "OPENAI_API_KEY" => Some("sk-test".to_string()),
        "LLM_STARTUP_CHECK" => Some("false".to_string()),
        _ => None,
    })
    .expect("test config is valid")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_missing_api_key_is_fatal() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("OPENAI_API_KEY")));
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn test_blank_api_key_counts_as_missing() {
        let err = Config::from_lookup(lookup_from(&[("OPENAI_API_KEY", "   ")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing(_)));
    }

    #[test]
    fn test_placeholder_api_key_is_rejected() {
        let err = Config::from_lookup(lookup_from(&[(
            "OPENAI_API_KEY",
            "your_openai_api_key_here",
        )]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Placeholder(_)));
    }

    #[test]
    fn test_defaults_applied() {
        let config = Config::from_lookup(lookup_from(&[("OPENAI_API_KEY", "sk-abc")])).unwrap();
        assert_eq!(config.openai_model, DEFAULT_MODEL);
        assert_eq!(config.openai_base_url, DEFAULT_BASE_URL);
        assert_eq!(config.llm_timeout, Duration::from_secs(60));
        assert!(config.llm_startup_check);
        assert!(config.job_catalog_path.is_none());
        assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
        assert_eq!(config.routing, RoutingPolicy::default());
        assert_eq!(config.port, 8080);
        assert_eq!(config.rust_log, "info");
    }

    #[test]
    fn test_overrides_applied() {
        let config = Config::from_lookup(lookup_from(&[
            ("OPENAI_API_KEY", "sk-abc"),
            ("OPENAI_MODEL", "gpt-4o"),
            ("OPENAI_BASE_URL", "http://localhost:11434/v1/"),
            ("LLM_TIMEOUT_SECS", "5"),
            ("LLM_STARTUP_CHECK", "false"),
            ("JOB_CATALOG_PATH", "/etc/jobs.json"),
            ("INTERVIEW_SCORE_THRESHOLD", "8"),
            ("ESCALATION_SCORE_THRESHOLD", "6.5"),
            ("PORT", "9000"),
        ]))
        .unwrap();
        assert_eq!(config.openai_model, "gpt-4o");
        assert_eq!(config.openai_base_url, "http://localhost:11434/v1");
        assert_eq!(config.llm_timeout, Duration::from_secs(5));
        assert!(!config.llm_startup_check);
        assert_eq!(config.job_catalog_path, Some(PathBuf::from("/etc/jobs.json")));
        assert_eq!(config.routing.interview_threshold, 8.0);
        assert_eq!(config.routing.escalation_threshold, 6.5);
        assert_eq!(config.port, 9000);
    }

    #[test]
    fn test_invalid_port_reports_key_and_value() {
        let err = Config::from_lookup(lookup_from(&[
            ("OPENAI_API_KEY", "sk-abc"),
            ("PORT", "eighty"),
        ]))
        .unwrap_err();
        match err {
            ConfigError::Invalid { key, value, .. } => {
                assert_eq!(key, "PORT");
                assert_eq!(value, "eighty");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
