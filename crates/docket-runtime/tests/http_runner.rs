//! End-to-end runs against a mocked chat endpoint.

use std::sync::Arc;
use std::time::Duration;

use docket_core::TestSuite;
use docket_runtime::{
    ApiCredential, ChatClient, ChatRequest, ClientError, CredentialSource, HttpChatClient,
    RunnerConfig, TestRunnerBuilder,
};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GOOD_ANSWER: &str = "You have 3 demerit points and a fine of $95. Option 1: Fight... \
    Option 2: Pay... 15 days to dispute. Disclaimer: not legal advice.";

fn config_for(server: &MockServer) -> RunnerConfig {
    RunnerConfig {
        base_url: server.uri(),
        timeout: Duration::from_secs(5),
        concurrency: 2,
        ..Default::default()
    }
}

#[tokio::test]
async fn test_ask_sends_question_and_offence_number() {
    let server = MockServer::start().await;
    let case = TestSuite::builtin().get("test_001").unwrap();

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(header("authorization", "Bearer test-token"))
        .and(body_json(json!({
            "question": case.question,
            "offence_number": "HTA-128"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "answer": GOOD_ANSWER,
            "sources": [{ "title": "Highway Traffic Act s.128" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpChatClient::from_config(&config_for(&server))
        .unwrap()
        .with_credential(ApiCredential::new("test-token", CredentialSource::Programmatic));

    let response = client.ask(&ChatRequest::for_case(case)).await.unwrap();
    assert_eq!(response.answer, GOOD_ANSWER);
    assert_eq!(response.sources.unwrap().len(), 1);
}

#[tokio::test]
async fn test_error_status_maps_to_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(503).set_body_string("backend overloaded"))
        .mount(&server)
        .await;

    let client = HttpChatClient::from_config(&config_for(&server)).unwrap();
    let err = client.ask(&ChatRequest::new("Hello?")).await.unwrap_err();

    match err {
        ClientError::ApiError { status, message } => {
            assert_eq!(status, 503);
            assert_eq!(message, "backend overloaded");
        }
        other => panic!("Expected ApiError, got {:?}", other),
    }
}

#[tokio::test]
async fn test_malformed_body_maps_to_parse_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "reply": "no answer field" })))
        .mount(&server)
        .await;

    let client = HttpChatClient::from_config(&config_for(&server)).unwrap();
    let err = client.ask(&ChatRequest::new("Hello?")).await.unwrap_err();
    assert!(matches!(err, ClientError::ParseError(_)));
}

#[tokio::test]
async fn test_run_all_tests_mixed_outcomes() {
    let server = MockServer::start().await;
    let suite = TestSuite::builtin()
        .filter(&["test_001", "test_003", "test_005"])
        .unwrap();

    // test_001 gets a complete answer
    Mock::given(method("POST"))
        .and(body_json(json!({
            "question": suite.get("test_001").unwrap().question,
            "offence_number": "HTA-128"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "answer": GOOD_ANSWER })))
        .mount(&server)
        .await;

    // test_003 hits a server error
    Mock::given(method("POST"))
        .and(body_json(json!({
            "question": suite.get("test_003").unwrap().question,
            "offence_number": "HTA-144(18)"
        })))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    // test_005 forgets the disclaimer
    Mock::given(method("POST"))
        .and(body_json(json!({
            "question": suite.get("test_005").unwrap().question
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "answer": "Nobody can promise an outcome." })),
        )
        .mount(&server)
        .await;

    let runner = TestRunnerBuilder::new()
        .config(config_for(&server))
        .suite(suite)
        .build()
        .unwrap();

    let results = runner.run_all_tests().await;
    let ids: Vec<_> = results.iter().map(|r| r.test_id.as_str()).collect();
    assert_eq!(ids, vec!["test_001", "test_003", "test_005"]);

    assert!(results[0].passed(), "failures: {:?}", results[0].failures);

    assert_eq!(results[1].failures.len(), 1);
    assert!(results[1].failures[0].starts_with("Error: API error: 500"));

    assert_eq!(results[2].failures, vec!["Missing legal disclaimer".to_string()]);

    let summary = runner.latest_summary();
    assert_eq!(summary.total, 3);
    assert_eq!(summary.passed, 1);
    assert_eq!(summary.failed, 2);
}

#[tokio::test]
async fn test_unreachable_backend_fails_every_case() {
    // Nothing listens on port 9 on the test host
    let config = RunnerConfig {
        base_url: "http://127.0.0.1:9".to_string(),
        timeout: Duration::from_secs(2),
        ..Default::default()
    };
    let suite = TestSuite::builtin().filter(&["test_001", "test_002"]).unwrap();

    let runner = TestRunnerBuilder::new()
        .config(config)
        .suite(suite)
        .build()
        .unwrap();

    let results = runner.run_all_tests().await;
    assert_eq!(results.len(), 2);
    for result in &results {
        assert!(!result.passed());
        assert_eq!(result.failures.len(), 1);
        assert!(result.failures[0].starts_with("Error: "));
    }
}

#[tokio::test]
async fn test_custom_client_via_builder() {
    let server = MockServer::start().await;
    let client: Arc<dyn ChatClient> = Arc::new(HttpChatClient::from_config(&config_for(&server)).unwrap());

    let runner = TestRunnerBuilder::new().client(client).build().unwrap();
    assert_eq!(runner.get_test_cases().len(), TestSuite::builtin().len());
}
