use std::time::Duration;

use crate::error::{AppError, Result};

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_TEMPERATURE: f32 = 0.3;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(30_000);
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1/";
pub const DEFAULT_SECRET_FIELD: &str = "OPENAI_API_KEY";
pub const DEFAULT_ORIGIN: &str = "*";

/// Everything the handler and its collaborators read from the environment,
/// captured once at cold start.
#[derive(Debug, Clone)]
pub struct Config {
    /// Key override. When set, the secret store is never queried.
    pub api_key: Option<String>,
    /// Secret identifier (name or ARN) holding the upstream key.
    pub secret_id: Option<String>,
    /// Field inside the secret's JSON object that carries the key.
    pub secret_field: String,
    /// Value of `Access-Control-Allow-Origin`.
    pub allowed_origin: String,
    pub default_model: String,
    pub default_temperature: f32,
    pub upstream_timeout: Duration,
    pub api_base_url: String,
    /// Treat the whole event as the request body when `body` is absent.
    pub allow_event_as_body: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            secret_id: None,
            secret_field: DEFAULT_SECRET_FIELD.to_string(),
            allowed_origin: DEFAULT_ORIGIN.to_string(),
            default_model: DEFAULT_MODEL.to_string(),
            default_temperature: DEFAULT_TEMPERATURE,
            upstream_timeout: DEFAULT_TIMEOUT,
            api_base_url: DEFAULT_BASE_URL.to_string(),
            allow_event_as_body: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        let default_temperature = match get("OPENAI_TEMPERATURE") {
            Some(raw) => raw
                .parse::<f32>()
                .map_err(|e| AppError::Config(format!("OPENAI_TEMPERATURE={raw}: {e}")))?,
            None => defaults.default_temperature,
        };

        let upstream_timeout = match get("OPENAI_TIMEOUT_MS") {
            Some(raw) => raw
                .parse::<u64>()
                .map(Duration::from_millis)
                .map_err(|e| AppError::Config(format!("OPENAI_TIMEOUT_MS={raw}: {e}")))?,
            None => defaults.upstream_timeout,
        };

        let allow_event_as_body = match get("ALLOW_EVENT_AS_BODY") {
            Some(raw) => parse_flag(&raw).ok_or_else(|| {
                AppError::Config(format!("ALLOW_EVENT_AS_BODY={raw}: expected true/false"))
            })?,
            None => defaults.allow_event_as_body,
        };

        Ok(Self {
            api_key: get("OPENAI_API_KEY"),
            secret_id: get("OPENAI_SECRET_ID"),
            secret_field: get("OPENAI_SECRET_FIELD").unwrap_or(defaults.secret_field),
            allowed_origin: get("CORS_ORIGIN").unwrap_or(defaults.allowed_origin),
            default_model: get("OPENAI_MODEL").unwrap_or(defaults.default_model),
            default_temperature,
            upstream_timeout,
            api_base_url: get("OPENAI_BASE_URL").unwrap_or(defaults.api_base_url),
            allow_event_as_body,
        })
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.api_key, None);
        assert_eq!(config.secret_id, None);
        assert_eq!(config.secret_field, "OPENAI_API_KEY");
        assert_eq!(config.allowed_origin, "*");
        assert_eq!(config.default_model, "gpt-4o-mini");
        assert_eq!(config.default_temperature, 0.3);
        assert_eq!(config.upstream_timeout, Duration::from_secs(30));
        assert!(!config.allow_event_as_body);
    }

    #[test]
    fn reads_every_key() {
        let config = Config::from_lookup(lookup(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_SECRET_ID", "prod/openai"),
            ("OPENAI_SECRET_FIELD", "key"),
            ("CORS_ORIGIN", "https://app.example.com"),
            ("OPENAI_MODEL", "gpt-4o"),
            ("OPENAI_TEMPERATURE", "0.7"),
            ("OPENAI_TIMEOUT_MS", "19500"),
            ("OPENAI_BASE_URL", "http://localhost:8080/v1/"),
            ("ALLOW_EVENT_AS_BODY", "true"),
        ]))
        .unwrap();
        assert_eq!(config.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.secret_id.as_deref(), Some("prod/openai"));
        assert_eq!(config.secret_field, "key");
        assert_eq!(config.allowed_origin, "https://app.example.com");
        assert_eq!(config.default_model, "gpt-4o");
        assert_eq!(config.default_temperature, 0.7);
        assert_eq!(config.upstream_timeout, Duration::from_millis(19_500));
        assert_eq!(config.api_base_url, "http://localhost:8080/v1/");
        assert!(config.allow_event_as_body);
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config =
            Config::from_lookup(lookup(&[("OPENAI_API_KEY", "  "), ("CORS_ORIGIN", "")])).unwrap();
        assert_eq!(config.api_key, None);
        assert_eq!(config.allowed_origin, "*");
    }

    #[test]
    fn bad_numbers_are_config_errors() {
        let err = Config::from_lookup(lookup(&[("OPENAI_TIMEOUT_MS", "soon")])).unwrap_err();
        assert!(matches!(err, AppError::Config(msg) if msg.starts_with("OPENAI_TIMEOUT_MS")));

        let err = Config::from_lookup(lookup(&[("OPENAI_TEMPERATURE", "warm")])).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));

        let err = Config::from_lookup(lookup(&[("ALLOW_EVENT_AS_BODY", "maybe")])).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }
}
