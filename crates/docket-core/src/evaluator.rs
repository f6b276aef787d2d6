//! Response evaluator.
//!
//! Classifies one answer against one [`ExpectedOutcome`]. Checks run in a
//! fixed order and never short-circuit, so the failure list names every
//! violated rule.

use std::time::Duration;

use crate::patterns::{self, contains_ignore_case};
use crate::types::{EvaluationResult, ExpectedOutcome, TestCase, TicketData};

pub const MSG_OFFENCE_NOT_IDENTIFIED: &str = "Offence not identified";
pub const MSG_FIGHT_OPTION_MISSING: &str = "Fight/dispute option not mentioned";
pub const MSG_PAY_OPTION_MISSING: &str = "Pay option not mentioned";
pub const MSG_DISCLAIMER_MISSING: &str = "Missing legal disclaimer";
pub const MSG_CONSEQUENCES_MISSING: &str = "Consequences not explained";
pub const MSG_PROCESS_MISSING: &str = "Process not explained";
pub const MSG_DEADLINE_MISSING: &str = "Deadline not mentioned";

/// Stateless answer classifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseEvaluator;

impl ResponseEvaluator {
    pub fn new() -> Self {
        Self
    }

    /// Evaluate an answer for a test case.
    pub fn evaluate_case(&self, case: &TestCase, answer: &str, elapsed: Duration) -> EvaluationResult {
        let failures = self.failures(&case.expected, &case.ticket, answer);

        tracing::debug!(
            test_id = %case.id,
            failures = failures.len(),
            "Evaluated answer"
        );

        EvaluationResult::new(&case.id, &case.question, answer, failures, elapsed)
    }

    /// Evaluate an answer without test case identity.
    pub fn evaluate(
        &self,
        expected: &ExpectedOutcome,
        ticket: &TicketData,
        answer: &str,
        elapsed: Duration,
    ) -> EvaluationResult {
        let failures = self.failures(expected, ticket, answer);
        EvaluationResult::new("", "", answer, failures, elapsed)
    }

    /// Run every check and collect the failure reasons in order.
    pub fn failures(
        &self,
        expected: &ExpectedOutcome,
        ticket: &TicketData,
        answer: &str,
    ) -> Vec<String> {
        let mut failures = Vec::new();

        // 1. Required phrases
        for phrase in &expected.must_include {
            if !contains_ignore_case(answer, phrase) {
                failures.push(format!("Missing required phrase: \"{}\"", phrase));
            }
        }

        // 2. Forbidden phrases
        for phrase in &expected.must_not_include {
            if contains_ignore_case(answer, phrase) {
                failures.push(format!("Contains forbidden phrase: \"{}\"", phrase));
            }
        }

        // 3. Offence
        if expected.offence_identified {
            if let Some(failure) = self.check_offence(ticket, answer) {
                failures.push(failure);
            }
        }

        // 4. Demerit points
        if expected.demerit_points_correct {
            if let Some(failure) = self.check_demerit_points(ticket, answer) {
                failures.push(failure);
            }
        }

        // 5. Options, reported independently
        if expected.options_presented {
            if !patterns::mentions_fight_option(answer) {
                failures.push(MSG_FIGHT_OPTION_MISSING.to_string());
            }
            if !patterns::mentions_pay_option(answer) {
                failures.push(MSG_PAY_OPTION_MISSING.to_string());
            }
        }

        // 6. Disclaimer is mandatory for every answer
        if !patterns::contains_disclaimer(answer) {
            failures.push(MSG_DISCLAIMER_MISSING.to_string());
        }

        // 7-9. Topic coverage
        if expected.consequences_explained && !patterns::mentions_consequences(answer) {
            failures.push(MSG_CONSEQUENCES_MISSING.to_string());
        }

        if expected.process_explained && !patterns::mentions_process(answer) {
            failures.push(MSG_PROCESS_MISSING.to_string());
        }

        if expected.deadline_mentioned && !patterns::mentions_deadline(answer) {
            failures.push(MSG_DEADLINE_MISSING.to_string());
        }

        failures
    }

    /// Offence code anywhere in the answer, or the description's first word.
    ///
    /// The first-word match is a heuristic: "Speeding - 45 km/h over" is
    /// satisfied by any answer mentioning "speeding".
    fn check_offence(&self, ticket: &TicketData, answer: &str) -> Option<String> {
        let code = ticket.offence_code();
        let keyword = ticket.offence_keyword();

        if code.is_none() && keyword.is_none() {
            return None;
        }

        let code_found = code.is_some_and(|c| contains_ignore_case(answer, c));
        let keyword_found = keyword.is_some_and(|k| contains_ignore_case(answer, k));

        if code_found || keyword_found {
            None
        } else {
            Some(MSG_OFFENCE_NOT_IDENTIFIED.to_string())
        }
    }

    fn check_demerit_points(&self, ticket: &TicketData, answer: &str) -> Option<String> {
        let points = ticket.demerit_points?;
        let stated = patterns::demerit_points_pattern(points).is_ok_and(|re| re.is_match(answer));

        if stated {
            None
        } else {
            Some(format!("Demerit points ({}) not stated correctly", points))
        }
    }
}
