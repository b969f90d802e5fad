//! Configuration handling for the application.
//!
//! `Config::from_env` reads the process environment and falls back to
//! development defaults for everything except the LLM API key, which stays
//! `None` until provided. Numeric values that fail to parse are reported as
//! `ConfigError::InvalidValue` instead of being silently replaced.

use std::env;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::time::Duration;

/// Environment variable names. Public so tests and the binary can refer to them.
pub const ENV_FETCH_TIMEOUT_SECS: &str = "FETCH_TIMEOUT_SECS";
pub const ENV_LLM_BASE_URL: &str = "LLM_BASE_URL";
pub const ENV_LLM_MODEL: &str = "LLM_MODEL";
pub const ENV_LLM_API_KEY: &str = "LLM_API_KEY";
pub const ENV_OPENROUTER_API_KEY: &str = "OPENROUTER_API_KEY";
pub const ENV_LLM_TEMPERATURE: &str = "LLM_TEMPERATURE";
pub const ENV_RETRY_MAX_ATTEMPTS: &str = "RETRY_MAX_ATTEMPTS";
pub const ENV_RETRY_BASE_DELAY_MS: &str = "RETRY_BASE_DELAY_MS";
pub const ENV_RETRY_MAX_DELAY_MS: &str = "RETRY_MAX_DELAY_MS";

/// Default development values used when environment variables are absent.
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;
const DEFAULT_LLM_BASE_URL: &str = "https://openrouter.ai/api/v1";
const DEFAULT_LLM_MODEL: &str = "openai/gpt-4o-mini";
const DEFAULT_LLM_TEMPERATURE: f32 = 0.1;
const DEFAULT_RETRY_MAX_ATTEMPTS: u32 = 3;
const DEFAULT_RETRY_BASE_DELAY_MS: u64 = 1_000;
const DEFAULT_RETRY_MAX_DELAY_MS: u64 = 30_000;

/// Application runtime configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    fetch_timeout: Duration,
    llm_base_url: String,
    llm_model: String,
    llm_api_key: Option<String>,
    llm_temperature: f32,
    retry_max_attempts: u32,
    retry_base_delay: Duration,
    retry_max_delay: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            llm_base_url: DEFAULT_LLM_BASE_URL.to_string(),
            llm_model: DEFAULT_LLM_MODEL.to_string(),
            llm_api_key: None,
            llm_temperature: DEFAULT_LLM_TEMPERATURE,
            retry_max_attempts: DEFAULT_RETRY_MAX_ATTEMPTS,
            retry_base_delay: Duration::from_millis(DEFAULT_RETRY_BASE_DELAY_MS),
            retry_max_delay: Duration::from_millis(DEFAULT_RETRY_MAX_DELAY_MS),
        }
    }
}

impl Config {
    /// Load from environment variables, falling back to development defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let fetch_timeout_secs =
            parse_var(ENV_FETCH_TIMEOUT_SECS, "fetch_timeout_secs", DEFAULT_FETCH_TIMEOUT_SECS)?;
        if fetch_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "fetch_timeout_secs",
                reason: "must be greater than zero".to_string(),
            });
        }

        let retry_max_attempts =
            parse_var(ENV_RETRY_MAX_ATTEMPTS, "retry_max_attempts", DEFAULT_RETRY_MAX_ATTEMPTS)?;
        if retry_max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "retry_max_attempts",
                reason: "must be at least 1".to_string(),
            });
        }

        let llm_api_key = env::var(ENV_LLM_API_KEY)
            .or_else(|_| env::var(ENV_OPENROUTER_API_KEY))
            .ok()
            .filter(|key| !key.trim().is_empty());

        Ok(Self {
            fetch_timeout: Duration::from_secs(fetch_timeout_secs),
            llm_base_url: env::var(ENV_LLM_BASE_URL)
                .unwrap_or_else(|_| DEFAULT_LLM_BASE_URL.to_string()),
            llm_model: env::var(ENV_LLM_MODEL).unwrap_or_else(|_| DEFAULT_LLM_MODEL.to_string()),
            llm_api_key,
            llm_temperature: parse_var(
                ENV_LLM_TEMPERATURE,
                "llm_temperature",
                DEFAULT_LLM_TEMPERATURE,
            )?,
            retry_max_attempts,
            retry_base_delay: Duration::from_millis(parse_var(
                ENV_RETRY_BASE_DELAY_MS,
                "retry_base_delay_ms",
                DEFAULT_RETRY_BASE_DELAY_MS,
            )?),
            retry_max_delay: Duration::from_millis(parse_var(
                ENV_RETRY_MAX_DELAY_MS,
                "retry_max_delay_ms",
                DEFAULT_RETRY_MAX_DELAY_MS,
            )?),
        })
    }

    /// Per-call bound applied to job-posting fetches.
    pub fn fetch_timeout(&self) -> Duration {
        self.fetch_timeout
    }
    /// Base URL of the OpenAI-compatible chat endpoint.
    pub fn llm_base_url(&self) -> &str {
        &self.llm_base_url
    }
    pub fn llm_model(&self) -> &str {
        &self.llm_model
    }
    pub fn llm_api_key(&self) -> Option<&str> {
        self.llm_api_key.as_deref()
    }
    pub fn llm_temperature(&self) -> f32 {
        self.llm_temperature
    }
    pub fn retry_max_attempts(&self) -> u32 {
        self.retry_max_attempts
    }
    pub fn retry_base_delay(&self) -> Duration {
        self.retry_base_delay
    }
    pub fn retry_max_delay(&self) -> Duration {
        self.retry_max_delay
    }

    /// Returns a copy with the given fetch timeout (used by the CLI `--timeout` flag).
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }
}

fn parse_var<T: FromStr>(key: &str, field: &'static str, default: T) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidValue {
                field,
                reason: format!("{:?}: {}", raw, e),
            }),
        Err(_) => Ok(default),
    }
}

/// Errors that can occur while building a configuration.
#[derive(Debug)]
pub enum ConfigError {
    InvalidValue { field: &'static str, reason: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidValue { field, reason } => {
                write!(f, "invalid value for '{}': {}", field, reason)
            }
        }
    }
}

impl Error for ConfigError {}
