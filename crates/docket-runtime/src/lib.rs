//! # docket-runtime
//!
//! Runs Docket test suites against a live chat backend.
//!
//! The evaluation itself lives in `docket-core` and is fully deterministic.
//! This crate adds the parts that touch the network:
//! - [`ChatClient`] / [`HttpChatClient`] for the chat-completion endpoint
//! - [`TestRunner`] for concurrent fan-out over a suite with ordered fan-in
//! - [`RunnerConfig`] for endpoint, timeout, concurrency and token settings
//!
//! ## Example
//!
//! ```rust,ignore
//! use docket_runtime::{RunnerConfig, TestRunnerBuilder};
//!
//! let runner = TestRunnerBuilder::new()
//!     .config(RunnerConfig::new("https://chat.example.com").with_env_overrides())
//!     .build()?;
//!
//! for result in runner.run_all_tests().await {
//!     println!("{} {}", result.test_id, if result.passed() { "PASS" } else { "FAIL" });
//! }
//! ```

use thiserror::Error;

pub mod client;
pub mod config;
pub mod runner;

pub use client::{
    ApiCredential, ChatClient, ChatRequest, ChatResponse, ClientError, CredentialSource,
    HttpChatClient,
};
pub use config::RunnerConfig;
pub use runner::{TestRunner, TestRunnerBuilder};

/// Errors from the runtime.
#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Client error: {0}")]
    Client(#[from] client::ClientError),
}
