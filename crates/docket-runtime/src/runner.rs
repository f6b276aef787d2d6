//! Test runner: fan-out over the suite, fan-in to ordered results.
//!
//! Each test case issues one independent chat request. Requests run with
//! bounded concurrency, results come back in suite order, and a failing
//! request only fails its own case.

use futures::stream::{self, StreamExt};
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::{Duration, Instant};

use docket_core::{EvaluationResult, ResponseEvaluator, RunSummary, TestCase, TestSuite};

use crate::client::{ChatClient, ChatRequest, HttpChatClient};
use crate::config::RunnerConfig;
use crate::RuntimeError;

/// Runs a suite against a chat backend.
pub struct TestRunner {
    client: Arc<dyn ChatClient>,
    suite: Arc<TestSuite>,
    evaluator: ResponseEvaluator,
    concurrency: usize,
    case_timeout: Duration,
    latest: RwLock<Vec<EvaluationResult>>,
}

impl TestRunner {
    /// Create a runner for `suite` using `client`.
    pub fn new(client: Arc<dyn ChatClient>, suite: TestSuite, config: &RunnerConfig) -> Self {
        Self {
            client,
            suite: Arc::new(suite),
            evaluator: ResponseEvaluator::new(),
            concurrency: config.concurrency.max(1),
            case_timeout: config.timeout,
            latest: RwLock::new(Vec::new()),
        }
    }

    /// The static test case table.
    pub fn get_test_cases(&self) -> &[TestCase] {
        &self.suite.test_cases
    }

    pub fn suite(&self) -> &TestSuite {
        &self.suite
    }

    /// Run every test case and return results in suite order.
    ///
    /// Never fails: request errors become failed results.
    pub async fn run_all_tests(&self) -> Vec<EvaluationResult> {
        let started = Instant::now();
        tracing::info!(
            suite = %self.suite.name,
            cases = self.suite.len(),
            concurrency = self.concurrency,
            client = self.client.name(),
            "Starting test run"
        );

        let results: Vec<EvaluationResult> = stream::iter(self.suite.iter())
            .map(|case| self.run_test(case))
            .buffered(self.concurrency)
            .collect()
            .await;

        let summary = RunSummary::from_results(&results);
        tracing::info!(
            passed = summary.passed,
            failed = summary.failed,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Test run complete"
        );

        *self.latest.write() = results.clone();
        results
    }

    /// Ask one question and evaluate the answer.
    pub async fn run_test(&self, case: &TestCase) -> EvaluationResult {
        let request = ChatRequest::for_case(case);
        let started = Instant::now();

        match tokio::time::timeout(self.case_timeout, self.client.ask(&request)).await {
            Ok(Ok(response)) => {
                let elapsed = started.elapsed();
                self.evaluator
                    .evaluate_case(case, &response.answer, elapsed)
                    .with_sources(response.sources.unwrap_or_default())
            }
            Ok(Err(e)) => {
                tracing::warn!(test_id = %case.id, error = %e, "Chat request failed");
                EvaluationResult::from_error(case, e, started.elapsed())
            }
            Err(_) => {
                tracing::warn!(test_id = %case.id, timeout = ?self.case_timeout, "Chat request timed out");
                EvaluationResult::from_error(
                    case,
                    format!("Timeout after {:?}", self.case_timeout),
                    started.elapsed(),
                )
            }
        }
    }

    /// Results of the last completed run, empty before the first.
    pub fn latest_results(&self) -> Vec<EvaluationResult> {
        self.latest.read().clone()
    }

    pub fn latest_summary(&self) -> RunSummary {
        RunSummary::from_results(&self.latest.read())
    }
}

/// Builder for TestRunner.
pub struct TestRunnerBuilder {
    client: Option<Arc<dyn ChatClient>>,
    suite: Option<TestSuite>,
    config: RunnerConfig,
}

impl TestRunnerBuilder {
    pub fn new() -> Self {
        Self {
            client: None,
            suite: None,
            config: RunnerConfig::default(),
        }
    }

    /// Use a specific chat client instead of the HTTP client.
    pub fn client(mut self, client: Arc<dyn ChatClient>) -> Self {
        self.client = Some(client);
        self
    }

    /// Run this suite instead of the built-in one.
    pub fn suite(mut self, suite: TestSuite) -> Self {
        self.suite = Some(suite);
        self
    }

    pub fn config(mut self, config: RunnerConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the runner.
    ///
    /// Without an explicit client an [`HttpChatClient`] is created from the
    /// configuration.
    pub fn build(self) -> Result<TestRunner, RuntimeError> {
        self.config.validate()?;

        let client: Arc<dyn ChatClient> = match self.client {
            Some(client) => client,
            None => Arc::new(HttpChatClient::from_config(&self.config)?),
        };
        let suite = self.suite.unwrap_or_else(|| TestSuite::builtin().clone());

        Ok(TestRunner::new(client, suite, &self.config))
    }
}

impl Default for TestRunnerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{ChatResponse, ClientError};
    use async_trait::async_trait;
    use std::collections::HashMap;

    const GOOD_ANSWER: &str = "You have 3 demerit points and a fine of $95. Option 1: Fight. \
        Option 2: Pay. 15 days to dispute. Disclaimer: not legal advice.";

    // Scripted client: answers by question, errors for unknown questions
    struct ScriptedClient {
        answers: HashMap<String, String>,
        delays: HashMap<String, Duration>,
    }

    impl ScriptedClient {
        fn new() -> Self {
            Self {
                answers: HashMap::new(),
                delays: HashMap::new(),
            }
        }

        fn answer(mut self, question: &str, answer: &str) -> Self {
            self.answers.insert(question.to_string(), answer.to_string());
            self
        }

        fn delay(mut self, question: &str, delay: Duration) -> Self {
            self.delays.insert(question.to_string(), delay);
            self
        }
    }

    #[async_trait]
    impl ChatClient for ScriptedClient {
        async fn ask(&self, request: &ChatRequest) -> Result<ChatResponse, ClientError> {
            if let Some(delay) = self.delays.get(&request.question) {
                tokio::time::sleep(*delay).await;
            }
            self.answers
                .get(&request.question)
                .map(|a| ChatResponse::text(a.clone()))
                .ok_or_else(|| ClientError::HttpError("connection refused".to_string()))
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    fn two_case_suite() -> TestSuite {
        TestSuite::builtin().filter(&["test_001", "test_005"]).unwrap()
    }

    fn runner(client: ScriptedClient, suite: TestSuite) -> TestRunner {
        TestRunnerBuilder::new()
            .client(Arc::new(client))
            .suite(suite)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_run_all_tests_evaluates_answers() {
        let suite = two_case_suite();
        let q1 = suite.test_cases[0].question.clone();
        let q5 = suite.test_cases[1].question.clone();

        let client = ScriptedClient::new()
            .answer(&q1, GOOD_ANSWER)
            .answer(&q5, "I guarantee nothing here. Disclaimer.");
        let runner = runner(client, suite);

        let results = runner.run_all_tests().await;
        assert_eq!(results.len(), 2);
        assert!(results[0].passed(), "failures: {:?}", results[0].failures);
        assert_eq!(
            results[1].failures,
            vec!["Contains forbidden phrase: \"i guarantee\"".to_string()]
        );
    }

    #[tokio::test]
    async fn test_transport_failure_does_not_abort_batch() {
        let suite = two_case_suite();
        let q5 = suite.test_cases[1].question.clone();

        // Only the second question has an answer; the first errors
        let client = ScriptedClient::new().answer(&q5, "Disclaimer: general information.");
        let runner = runner(client, suite);

        let results = runner.run_all_tests().await;
        assert_eq!(results.len(), 2);
        assert_eq!(
            results[0].failures,
            vec!["Error: HTTP request failed: connection refused".to_string()]
        );
        assert!(results[0].answer.is_empty());
        assert!(results[1].passed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_results_keep_suite_order() {
        let suite = two_case_suite();
        let q1 = suite.test_cases[0].question.clone();
        let q5 = suite.test_cases[1].question.clone();

        // First case answers last
        let client = ScriptedClient::new()
            .answer(&q1, GOOD_ANSWER)
            .answer(&q5, "Disclaimer")
            .delay(&q1, Duration::from_millis(500));
        let runner = runner(client, suite);

        let results = runner.run_all_tests().await;
        let ids: Vec<_> = results.iter().map(|r| r.test_id.as_str()).collect();
        assert_eq!(ids, vec!["test_001", "test_005"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_client_times_out() {
        let suite = TestSuite::builtin().filter(&["test_005"]).unwrap();
        let question = suite.test_cases[0].question.clone();
        let client = ScriptedClient::new()
            .answer(&question, "Disclaimer")
            .delay(&question, Duration::from_secs(60));

        let config = RunnerConfig {
            timeout: Duration::from_secs(5),
            ..Default::default()
        };
        let runner = TestRunnerBuilder::new()
            .client(Arc::new(client))
            .suite(suite)
            .config(config)
            .build()
            .unwrap();

        let results = runner.run_all_tests().await;
        assert_eq!(results[0].failures, vec!["Error: Timeout after 5s".to_string()]);
    }

    #[tokio::test]
    async fn test_latest_results_replaced_each_run() {
        let suite = TestSuite::builtin().filter(&["test_005"]).unwrap();
        let runner = runner(ScriptedClient::new(), suite);

        assert!(runner.latest_results().is_empty());
        assert_eq!(runner.latest_summary().total, 0);

        runner.run_all_tests().await;
        runner.run_all_tests().await;

        assert_eq!(runner.latest_results().len(), 1);
        assert_eq!(runner.latest_summary().failed, 1);
    }

    #[test]
    fn test_builder_defaults_to_builtin_suite() {
        let runner = TestRunnerBuilder::new()
            .client(Arc::new(ScriptedClient::new()))
            .build()
            .unwrap();
        assert_eq!(runner.get_test_cases().len(), TestSuite::builtin().len());
    }

    #[test]
    fn test_builder_rejects_invalid_config() {
        let result = TestRunnerBuilder::new()
            .config(RunnerConfig::new("not-a-url"))
            .build();
        assert!(matches!(result, Err(RuntimeError::Config(_))));
    }
}
