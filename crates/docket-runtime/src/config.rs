//! Runner configuration.
//!
//! Layering, lowest to highest: defaults, YAML config file, environment
//! (`DOCKET_BASE_URL`, `DOCKET_API_TOKEN`), then whatever the caller sets
//! explicitly (CLI flags).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::client::{ApiCredential, API_TOKEN_ENV};
use crate::RuntimeError;

/// Environment variable overriding [`RunnerConfig::base_url`].
pub const BASE_URL_ENV: &str = "DOCKET_BASE_URL";

/// Configuration for a test run.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Chat backend base URL
    pub base_url: String,

    /// Path of the chat-completion endpoint under `base_url`
    pub chat_path: String,

    /// Per-request timeout (e.g., "30s", "1m 30s")
    #[serde(with = "duration_str")]
    pub timeout: Duration,

    /// Maximum requests in flight
    pub concurrency: usize,

    /// Bearer token for the chat API; never serialized back out
    #[serde(skip_serializing)]
    pub api_token: Option<String>,
}

mod duration_str {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&humantime::format_duration(*duration).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        humantime::parse_duration(&text).map_err(serde::de::Error::custom)
    }
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            chat_path: "/api/chat".to_string(),
            timeout: Duration::from_secs(30),
            concurrency: 4,
            api_token: None,
        }
    }
}

impl fmt::Debug for RunnerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunnerConfig")
            .field("base_url", &self.base_url)
            .field("chat_path", &self.chat_path)
            .field("timeout", &self.timeout)
            .field("concurrency", &self.concurrency)
            .field("api_token", &self.api_token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl RunnerConfig {
    /// Create a config for the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Parse a config from YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, RuntimeError> {
        let config: RunnerConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a config from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, RuntimeError> {
        let contents = fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Apply `DOCKET_BASE_URL` if set.
    ///
    /// The token is resolved lazily by [`RunnerConfig::credential`].
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var(BASE_URL_ENV) {
            if !url.trim().is_empty() {
                self.base_url = url;
            }
        }
        self
    }

    /// Validate field values.
    pub fn validate(&self) -> Result<(), RuntimeError> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(RuntimeError::Config(format!(
                "base_url must start with http:// or https://, got '{}'",
                self.base_url
            )));
        }

        if self.concurrency == 0 {
            return Err(RuntimeError::Config(
                "concurrency must be at least 1".to_string(),
            ));
        }

        if self.timeout.is_zero() {
            return Err(RuntimeError::Config("timeout must be positive".to_string()));
        }

        Ok(())
    }

    /// Full URL of the chat-completion endpoint.
    pub fn endpoint(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.chat_path.trim_start_matches('/')
        )
    }

    /// API token from `DOCKET_API_TOKEN`, falling back to the config file.
    pub fn credential(&self) -> Option<ApiCredential> {
        self.credential_from(API_TOKEN_ENV)
    }

    fn credential_from(&self, env_var: &str) -> Option<ApiCredential> {
        ApiCredential::from_env_or_config(env_var, self.api_token.as_deref())
    }
}
