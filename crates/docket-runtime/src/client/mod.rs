//! Chat API client abstraction.
//!
//! The runner only talks to the chat backend through [`ChatClient`], so
//! tests and alternative transports can stand in for the HTTP client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::time::Duration;
use thiserror::Error;

use docket_core::TestCase;

mod http;
pub mod secrets;

pub use http::HttpChatClient;
pub use secrets::{ApiCredential, CredentialSource, API_TOKEN_ENV};

/// Errors from the chat API.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    ParseError(String),

    #[error("Client not configured: {0}")]
    NotConfigured(String),
}

/// Body sent to the chat-completion endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatRequest {
    pub question: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offence_number: Option<String>,
}

impl ChatRequest {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            offence_number: None,
        }
    }

    /// Request for a test case; the ticket's offence code goes along as the
    /// offence number.
    pub fn for_case(case: &TestCase) -> Self {
        Self {
            question: case.question.clone(),
            offence_number: case.ticket.offence_code().map(str::to_string),
        }
    }
}

/// Body returned by the chat-completion endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatResponse {
    pub answer: String,

    /// Source documents cited by the backend; shape is backend-defined
    #[serde(default)]
    pub sources: Option<Vec<JsonValue>>,
}

impl ChatResponse {
    pub fn text(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            sources: None,
        }
    }
}

/// Client abstraction allows swapping chat backends.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Ask one question.
    async fn ask(&self, request: &ChatRequest) -> Result<ChatResponse, ClientError>;

    /// Client name for logs.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use docket_core::TestSuite;

    #[test]
    fn test_request_for_case_carries_offence_code() {
        let case = TestSuite::builtin().get("test_001").unwrap();
        let request = ChatRequest::for_case(case);
        assert_eq!(request.question, case.question);
        assert_eq!(request.offence_number.as_deref(), Some("HTA-128"));
    }

    #[test]
    fn test_request_without_offence_omits_field() {
        let json = serde_json::to_value(ChatRequest::new("Hi?")).unwrap();
        assert_eq!(json, serde_json::json!({ "question": "Hi?" }));
    }

    #[test]
    fn test_response_sources_optional() {
        let response: ChatResponse = serde_json::from_str(r#"{"answer": "ok"}"#).unwrap();
        assert_eq!(response, ChatResponse::text("ok"));

        let response: ChatResponse =
            serde_json::from_str(r#"{"answer": "ok", "sources": [{"title": "HTA s.128"}]}"#)
                .unwrap();
        assert_eq!(response.sources.unwrap().len(), 1);
    }
}
