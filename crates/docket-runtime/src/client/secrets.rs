//! Secure handling of the chat API token.
//!
//! The token is wrapped in [`secrecy::SecretString`] as soon as it is read,
//! so it cannot show up in `Debug`/`Display` output or logs. It is only
//! exposed when the `Authorization` header is set.

use secrecy::{ExposeSecret, SecretString};
use std::fmt;

use super::ClientError;

/// Environment variable holding the chat API token.
pub const API_TOKEN_ENV: &str = "DOCKET_API_TOKEN";

/// Where a credential was loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    /// Loaded from the runner configuration file
    Config,
    /// Loaded from environment variable
    Environment,
    /// Provided programmatically (e.g., a CLI flag)
    Programmatic,
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialSource::Config => write!(f, "config"),
            CredentialSource::Environment => write!(f, "environment"),
            CredentialSource::Programmatic => write!(f, "programmatic"),
        }
    }
}

/// A securely-stored API credential.
pub struct ApiCredential {
    value: SecretString,
    source: CredentialSource,
}

impl ApiCredential {
    /// Wrap a token value.
    pub fn new(value: impl Into<String>, source: CredentialSource) -> Self {
        Self {
            value: SecretString::from(value.into()),
            source,
        }
    }

    /// Load the token from an environment variable.
    pub fn from_env(env_var: &str) -> Result<Self, ClientError> {
        std::env::var(env_var)
            .map(|v| Self::new(v, CredentialSource::Environment))
            .map_err(|_| {
                ClientError::NotConfigured(format!(
                    "API token not set: configure '{}' environment variable",
                    env_var
                ))
            })
    }

    /// Use `env_var` when set, falling back to the configured value.
    ///
    /// The environment outranks the config file. Returns `None` when neither
    /// is set; the chat API may not need a token.
    pub fn from_env_or_config(env_var: &str, configured: Option<&str>) -> Option<Self> {
        if let Ok(value) = Self::from_env(env_var) {
            return Some(value);
        }

        configured.map(|value| Self::new(value, CredentialSource::Config))
    }

    /// Expose the token for the `Authorization` header.
    ///
    /// Only call this at the point of use. Never store the exposed value.
    pub fn expose(&self) -> &str {
        self.value.expose_secret()
    }

    pub fn is_empty(&self) -> bool {
        self.value.expose_secret().is_empty()
    }

    pub fn source(&self) -> CredentialSource {
        self.source
    }
}

impl fmt::Debug for ApiCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiCredential")
            .field("value", &"[REDACTED]")
            .field("source", &self.source)
            .finish()
    }
}

impl fmt::Display for ApiCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "API token from {} [REDACTED]", self.source)
    }
}
