//! Environment-backed configuration for the model provider.
//!
//! The credential is validated here, before any model call; everything
//! else has a fixed default that can be overridden per environment.

use thiserror::Error;

/// Application-level constants
pub const APP_NAME: &str = "Kanplan";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default tracing filter when RUST_LOG is unset.
pub fn default_log_filter() -> String {
    "info".to_string()
}

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
/// Low temperature favors reproducible clinical output.
pub const DEFAULT_TEMPERATURE: f32 = 0.1;
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Errors from configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("OpenAI APIキーが見つかりません。環境変数 OPENAI_API_KEY を設定してください。")]
    MissingApiKey,

    #[error("OpenAI APIキーが不正です（\"sk-\" で始まる必要があります）。")]
    InvalidApiKey,
}

/// Model provider settings, resolved from the environment.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
    pub timeout_secs: u64,
}

impl ModelConfig {
    /// Read configuration from the environment.
    ///
    /// `OPENAI_API_KEY` is required. `KANPLAN_BASE_URL`, `KANPLAN_MODEL`,
    /// and `KANPLAN_TIMEOUT_SECS` override the defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key =
            validate_api_key(&std::env::var("OPENAI_API_KEY").map_err(|_| ConfigError::MissingApiKey)?)?;

        Ok(Self {
            base_url: std::env::var("KANPLAN_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            api_key,
            model: std::env::var("KANPLAN_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            temperature: DEFAULT_TEMPERATURE,
            timeout_secs: std::env::var("KANPLAN_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        })
    }

    /// Default settings with an explicit credential (tests, embedding hosts).
    pub fn with_api_key(api_key: &str) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Trim and check the credential shape. Catches misconfigured secrets
/// (wrong value pasted, stray quotes) before the first model call.
fn validate_api_key(raw: &str) -> Result<String, ConfigError> {
    let key = raw.trim();
    if !key.starts_with("sk-") {
        return Err(ConfigError::InvalidApiKey);
    }
    Ok(key.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_key_accepted_and_trimmed() {
        let key = validate_api_key("  sk-abc123  ").unwrap();
        assert_eq!(key, "sk-abc123");
    }

    #[test]
    fn key_without_prefix_rejected() {
        assert!(matches!(
            validate_api_key("abc123"),
            Err(ConfigError::InvalidApiKey)
        ));
    }

    #[test]
    fn empty_key_rejected() {
        assert!(matches!(validate_api_key("   "), Err(ConfigError::InvalidApiKey)));
    }

    #[test]
    fn with_api_key_uses_defaults() {
        let config = ModelConfig::with_api_key("sk-test");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.model, "gpt-4o-mini");
        assert!((config.temperature - 0.1).abs() < f32::EPSILON);
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, env!("CARGO_PKG_VERSION"));
    }
}
