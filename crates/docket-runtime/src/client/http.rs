//! HTTP chat client backed by reqwest.

use async_trait::async_trait;
use std::time::Duration;

use super::{secrets::ApiCredential, ChatClient, ChatRequest, ChatResponse, ClientError};
use crate::config::RunnerConfig;

/// Longest error body kept in an [`ClientError::ApiError`] message.
const MAX_ERROR_BODY: usize = 200;

/// Chat client that POSTs questions to a REST endpoint.
pub struct HttpChatClient {
    client: reqwest::Client,
    endpoint: String,
    credential: Option<ApiCredential>,
    timeout: Duration,
}

impl std::fmt::Debug for HttpChatClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpChatClient")
            .field("endpoint", &self.endpoint)
            .field("credential", &self.credential)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl HttpChatClient {
    /// Create a client for a full endpoint URL.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let endpoint = endpoint.into();
        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            return Err(ClientError::NotConfigured(format!(
                "endpoint must start with http:// or https://, got '{}'",
                endpoint
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::NotConfigured(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint,
            credential: None,
            timeout,
        })
    }

    /// Create a client from runner configuration, picking up the API token
    /// from the config or the environment.
    pub fn from_config(config: &RunnerConfig) -> Result<Self, ClientError> {
        let client = Self::new(config.endpoint(), config.timeout)?;
        Ok(match config.credential() {
            Some(credential) => client.with_credential(credential),
            None => client,
        })
    }

    /// Attach a bearer token.
    pub fn with_credential(mut self, credential: ApiCredential) -> Self {
        self.credential = Some(credential);
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ChatClient for HttpChatClient {
    async fn ask(&self, request: &ChatRequest) -> Result<ChatResponse, ClientError> {
        let mut builder = self.client.post(&self.endpoint).json(request);

        if let Some(credential) = self.credential.as_ref().filter(|c| !c.is_empty()) {
            builder = builder.bearer_auth(credential.expose());
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ClientError::Timeout(self.timeout)
            } else {
                ClientError::HttpError(e.to_string())
            }
        })?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = if body.trim().is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            } else {
                body.chars().take(MAX_ERROR_BODY).collect()
            };

            return Err(ClientError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        response.json::<ChatResponse>().await.map_err(|e| {
            if e.is_timeout() {
                ClientError::Timeout(self.timeout)
            } else {
                ClientError::ParseError(e.to_string())
            }
        })
    }

    fn name(&self) -> &str {
        "http"
    }
}
