//! Vocabulary patterns used by the response evaluator.
//!
//! All patterns are case-insensitive. They deliberately match loose
//! vocabulary rather than exact phrasing: the chat backend answers in free
//! text and the harness only asserts that a topic was covered.

use lazy_static::lazy_static;
use regex::Regex;

/// Phrases accepted as a legal disclaimer.
pub const DISCLAIMER_PHRASES: [&str; 3] = ["disclaimer", "not legal advice", "general information"];

lazy_static! {
    /// Vocabulary for contesting the ticket
    pub static ref FIGHT_OPTION_PATTERN: Regex = Regex::new(
        r"(?i)fight|dispute|appeal|trial|option 1"
    ).unwrap();

    /// Vocabulary for paying the ticket
    pub static ref PAY_OPTION_PATTERN: Regex = Regex::new(
        r"(?i)pay|payment|fine|option 2"
    ).unwrap();

    /// Consequences: insurance, licence and general impact
    pub static ref CONSEQUENCES_PATTERN: Regex = Regex::new(
        r"(?i)consequence|impact|insurance|licen[cs]e"
    ).unwrap();

    /// Procedural vocabulary
    pub static ref PROCESS_PATTERN: Regex = Regex::new(
        r"(?i)process|step|procedure"
    ).unwrap();

    /// "15 days", "30 day", "deadline", "time limit"
    pub static ref DEADLINE_PATTERN: Regex = Regex::new(
        r"(?i)\d+\s*days?|deadline|time limit"
    ).unwrap();
}

/// Case-insensitive substring test.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Build the pattern asserting that `points` is stated as demerit points.
///
/// The number must be a whole word followed by whitespace and then
/// "demerit" or "point" ("3 demerit points", "3 points"). "13 points" and
/// "3points" do not count.
pub fn demerit_points_pattern(points: u32) -> Result<Regex, regex::Error> {
    Regex::new(&format!(
        r"(?i)\b{}\s+(demerit|point)",
        regex::escape(&points.to_string())
    ))
}

/// Check if the answer carries a disclaimer phrase.
pub fn contains_disclaimer(content: &str) -> bool {
    let lower = content.to_lowercase();
    DISCLAIMER_PHRASES.iter().any(|phrase| lower.contains(phrase))
}

/// Check if the answer mentions fighting the ticket.
pub fn mentions_fight_option(content: &str) -> bool {
    FIGHT_OPTION_PATTERN.is_match(content)
}

/// Check if the answer mentions paying the ticket.
pub fn mentions_pay_option(content: &str) -> bool {
    PAY_OPTION_PATTERN.is_match(content)
}

/// Check if the answer explains consequences (insurance, licence).
pub fn mentions_consequences(content: &str) -> bool {
    CONSEQUENCES_PATTERN.is_match(content)
}

/// Check if the answer walks through the procedure.
pub fn mentions_process(content: &str) -> bool {
    PROCESS_PATTERN.is_match(content)
}

/// Check if the answer gives a deadline or day count.
pub fn mentions_deadline(content: &str) -> bool {
    DEADLINE_PATTERN.is_match(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disclaimer_detection() {
        assert!(contains_disclaimer("Disclaimer: this is not advice"));
        assert!(contains_disclaimer("DISCLAIMER"));
        assert!(contains_disclaimer("This is NOT LEGAL ADVICE."));
        assert!(contains_disclaimer("For general information only."));
        assert!(!contains_disclaimer("Talk to a paralegal."));
        assert!(!contains_disclaimer(""));
    }

    #[test]
    fn test_option_detection() {
        assert!(mentions_fight_option("You can dispute the charge"));
        assert!(mentions_fight_option("Request a TRIAL"));
        assert!(mentions_fight_option("Option 1: early resolution"));
        assert!(!mentions_fight_option("Just pay it"));

        assert!(mentions_pay_option("You may pay online"));
        assert!(mentions_pay_option("The set fine is $95"));
        assert!(mentions_pay_option("option 2 is simplest"));
        assert!(!mentions_pay_option("You can dispute it in court"));
    }

    #[test]
    fn test_demerit_pattern() {
        let re = demerit_points_pattern(3).unwrap();
        assert!(re.is_match("You will receive 3 demerit points."));
        assert!(re.is_match("that is 3 Points on your record"));
        assert!(re.is_match("3\tdemerit"));
        assert!(!re.is_match("you get 3points"));
        assert!(!re.is_match("13 demerit points"));
        assert!(!re.is_match("three demerit points"));
    }

    #[test]
    fn test_consequence_process_deadline() {
        assert!(mentions_consequences("Your insurance premiums may rise"));
        assert!(mentions_consequences("your licence could be suspended"));
        assert!(mentions_consequences("possible license suspension"));
        assert!(!mentions_consequences("Nothing else happens"));

        assert!(mentions_process("The first step is to file"));
        assert!(mentions_process("court procedure"));
        assert!(!mentions_process("Just wait"));

        assert!(mentions_deadline("You have 15 days"));
        assert!(mentions_deadline("within 30day window"));
        assert!(mentions_deadline("There is a strict Time Limit"));
        assert!(mentions_deadline("Mind the deadline"));
        assert!(!mentions_deadline("Act soon"));
    }

    #[test]
    fn test_contains_ignore_case() {
        assert!(contains_ignore_case("Demerit Points", "demerit"));
        assert!(contains_ignore_case("anything", ""));
        assert!(!contains_ignore_case("", "x"));
    }
}
