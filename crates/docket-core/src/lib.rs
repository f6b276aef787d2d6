//! # docket-core
//!
//! Deterministic evaluation of legal chat answers.
//!
//! A [`TestCase`] pairs a question and its ticket context with an
//! [`ExpectedOutcome`]. The [`ResponseEvaluator`] checks a free-text answer
//! against that outcome and lists every rule the answer violates.
//!
//! ## Key Guarantees
//!
//! 1. **Deterministic**: same answer and expectation, same failures
//! 2. **Exhaustive**: every violated check is reported, not just the first
//! 3. **Total**: no input makes evaluation fail; absent ticket fields skip their check
//! 4. **Single source of truth**: `passed()` is derived from the failure list
//!
//! ## Example
//!
//! ```rust,ignore
//! use docket_core::{evaluate_case, TestSuite};
//! use std::time::Duration;
//!
//! let case = TestSuite::builtin().get("test_001").unwrap();
//! let result = evaluate_case(case, "You have 3 demerit points ...", Duration::from_millis(840));
//!
//! for failure in &result.failures {
//!     println!("FAIL {}: {}", result.test_id, failure);
//! }
//! ```

pub mod evaluator;
pub mod patterns;
pub mod suite;
pub mod types;

// Re-export main types at crate root
pub use evaluator::ResponseEvaluator;
pub use suite::{SuiteError, TestSuite};
pub use types::{EvaluationResult, ExpectedOutcome, RunSummary, TestCase, TicketData};

use std::time::Duration;

/// Evaluate an answer against an expectation and its ticket context.
///
/// `elapsed` is the response time measured by the caller.
pub fn evaluate(
    expected: &ExpectedOutcome,
    ticket: &TicketData,
    answer: &str,
    elapsed: Duration,
) -> EvaluationResult {
    ResponseEvaluator::new().evaluate(expected, ticket, answer, elapsed)
}

/// Evaluate an answer for a test case, keeping its id and question.
pub fn evaluate_case(case: &TestCase, answer: &str, elapsed: Duration) -> EvaluationResult {
    ResponseEvaluator::new().evaluate_case(case, answer, elapsed)
}

/// The built-in test case table.
pub fn get_test_cases() -> &'static [TestCase] {
    &TestSuite::builtin().test_cases
}
