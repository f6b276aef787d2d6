//! Core data types for Docket evaluations.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

/// Ticket context attached to a test case.
///
/// Every field is optional; checks that depend on a missing field are skipped.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TicketData {
    /// Set fine in dollars
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fine_amount: Option<f64>,

    /// Demerit points attached to the offence
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demerit_points: Option<u32>,

    /// Offence code as printed on the ticket (e.g., "HTA-128")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offence_code: Option<String>,

    /// Offence description as printed on the ticket
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offence_description: Option<String>,
}

impl TicketData {
    /// True when the ticket carries no data at all.
    pub fn is_empty(&self) -> bool {
        self.fine_amount.is_none()
            && self.demerit_points.is_none()
            && self.offence_code.is_none()
            && self.offence_description.is_none()
    }

    /// Offence code, ignoring blank values.
    pub fn offence_code(&self) -> Option<&str> {
        self.offence_code
            .as_deref()
            .map(str::trim)
            .filter(|code| !code.is_empty())
    }

    /// First whitespace-separated word of the offence description.
    pub fn offence_keyword(&self) -> Option<&str> {
        self.offence_description
            .as_deref()
            .and_then(|desc| desc.split_whitespace().next())
    }
}

/// Declarative checks an answer must satisfy.
///
/// All fields default to empty/false, so an expectation file only lists
/// what it cares about.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ExpectedOutcome {
    /// Phrases that must appear in the answer
    pub must_include: Vec<String>,

    /// Phrases that must not appear in the answer
    pub must_not_include: Vec<String>,

    /// Answer names the offence (code or description keyword)
    pub offence_identified: bool,

    /// Answer states the ticket's demerit points
    pub demerit_points_correct: bool,

    /// Answer presents both the fight and the pay option
    pub options_presented: bool,

    /// Answer explains consequences (insurance, licence, ...)
    pub consequences_explained: bool,

    /// Answer walks through the process
    pub process_explained: bool,

    /// Answer mentions a deadline
    pub deadline_mentioned: bool,
}

/// A fixed question probing the chat backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TestCase {
    /// Unique identifier (e.g., "test_001")
    pub id: String,

    /// Question sent to the chat API
    pub question: String,

    /// Human-readable description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Free-form tags used for filtering
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// Ticket context
    #[serde(default)]
    pub ticket: TicketData,

    /// What the answer must satisfy
    #[serde(default)]
    pub expected: ExpectedOutcome,
}

impl TestCase {
    /// Create a test case with an empty ticket and no expectations.
    pub fn new(id: impl Into<String>, question: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            question: question.into(),
            description: None,
            tags: Vec::new(),
            ticket: TicketData::default(),
            expected: ExpectedOutcome::default(),
        }
    }

    pub fn with_ticket(mut self, ticket: TicketData) -> Self {
        self.ticket = ticket;
        self
    }

    pub fn with_expected(mut self, expected: ExpectedOutcome) -> Self {
        self.expected = expected;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Whether this case carries the given tag (case-insensitive).
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}

/// Outcome of evaluating one answer.
///
/// There is no stored pass flag: [`EvaluationResult::passed`] is derived from
/// the failure list, so the two can never disagree.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct EvaluationResult {
    /// Test case this result belongs to
    #[serde(default)]
    pub test_id: String,

    /// Question that was asked
    #[serde(default)]
    pub question: String,

    /// Every violated rule, in check order
    #[serde(default)]
    pub failures: Vec<String>,

    /// Raw answer text
    #[serde(default)]
    pub answer: String,

    /// Sources returned alongside the answer
    #[serde(default)]
    pub sources: Vec<serde_json::Value>,

    /// Time the chat API took to answer, in milliseconds
    #[serde(default)]
    pub response_time_ms: u64,

    /// When the evaluation ran
    pub evaluated_at: DateTime<Utc>,
}

impl EvaluationResult {
    /// Build a result from an answer and its failure list.
    pub fn new(
        test_id: impl Into<String>,
        question: impl Into<String>,
        answer: impl Into<String>,
        failures: Vec<String>,
        elapsed: Duration,
    ) -> Self {
        Self {
            test_id: test_id.into(),
            question: question.into(),
            failures,
            answer: answer.into(),
            sources: Vec::new(),
            response_time_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
            evaluated_at: Utc::now(),
        }
    }

    /// A failed result for a case whose answer could not be obtained.
    pub fn from_error(case: &TestCase, message: impl std::fmt::Display, elapsed: Duration) -> Self {
        Self::new(
            &case.id,
            &case.question,
            String::new(),
            vec![format!("Error: {}", message)],
            elapsed,
        )
    }

    /// Attach the sources returned by the chat API.
    pub fn with_sources(mut self, sources: Vec<serde_json::Value>) -> Self {
        self.sources = sources;
        self
    }

    /// True iff no rule was violated.
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn response_time(&self) -> Duration {
        Duration::from_millis(self.response_time_ms)
    }
}

impl Serialize for EvaluationResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("EvaluationResult", 8)?;
        state.serialize_field("test_id", &self.test_id)?;
        state.serialize_field("question", &self.question)?;
        state.serialize_field("passed", &self.passed())?;
        state.serialize_field("failures", &self.failures)?;
        state.serialize_field("answer", &self.answer)?;
        state.serialize_field("sources", &self.sources)?;
        state.serialize_field("response_time_ms", &self.response_time_ms)?;
        state.serialize_field("evaluated_at", &self.evaluated_at)?;
        state.end()
    }
}

/// Aggregate view of a run for reporting.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RunSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    /// Fraction of passing cases in `[0.0, 1.0]`; 0.0 for an empty run
    pub pass_rate: f64,
    pub average_response_ms: u64,
}

impl RunSummary {
    /// Summarize a set of results.
    pub fn from_results(results: &[EvaluationResult]) -> Self {
        let total = results.len();
        if total == 0 {
            return Self::default();
        }

        let passed = results.iter().filter(|r| r.passed()).count();
        let total_ms: u64 = results.iter().map(|r| r.response_time_ms).sum();

        Self {
            total,
            passed,
            failed: total - passed,
            pass_rate: passed as f64 / total as f64,
            average_response_ms: total_ms / total as u64,
        }
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}
