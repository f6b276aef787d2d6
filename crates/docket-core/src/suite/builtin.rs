//! Built-in traffic ticket suite.

use lazy_static::lazy_static;

use crate::types::{ExpectedOutcome, TestCase, TicketData};

use super::TestSuite;

lazy_static! {
    pub(super) static ref BUILTIN_SUITE: TestSuite = TestSuite {
        name: "Traffic tickets".to_string(),
        description: Some(
            "Canned questions about traffic tickets with the facts each answer must cover"
                .to_string()
        ),
        test_cases: builtin_cases(),
    };
}

fn ticket(fine: f64, points: Option<u32>, code: &str, description: &str) -> TicketData {
    TicketData {
        fine_amount: Some(fine),
        demerit_points: points,
        offence_code: Some(code.to_string()),
        offence_description: Some(description.to_string()),
    }
}

fn phrases(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn builtin_cases() -> Vec<TestCase> {
    vec![
        TestCase::new(
            "test_001",
            "I got a speeding ticket for 20 km/h over the limit. What are my options?",
        )
        .with_description("Speeding: options, points and deadline")
        .with_tags(["speeding", "options"])
        .with_ticket(ticket(95.0, Some(3), "HTA-128", "Speeding - 20 km/h over posted limit"))
        .with_expected(ExpectedOutcome {
            must_include: phrases(&["demerit", "95"]),
            must_not_include: phrases(&["guarantee", "you will definitely win"]),
            demerit_points_correct: true,
            options_presented: true,
            deadline_mentioned: true,
            ..Default::default()
        }),
        TestCase::new(
            "test_002",
            "What happens to my insurance if I just pay a careless driving ticket?",
        )
        .with_description("Careless driving: consequences of paying")
        .with_tags(["careless", "consequences"])
        .with_ticket(ticket(490.0, Some(6), "HTA-130", "Careless driving"))
        .with_expected(ExpectedOutcome {
            must_include: phrases(&["insurance"]),
            offence_identified: true,
            demerit_points_correct: true,
            consequences_explained: true,
            ..Default::default()
        }),
        TestCase::new("test_003", "How do I request a trial for my red light ticket?")
            .with_description("Red light: trial request process")
            .with_tags(["red-light", "process"])
            .with_ticket(ticket(325.0, Some(3), "HTA-144(18)", "Red light - fail to stop"))
            .with_expected(ExpectedOutcome {
                must_include: phrases(&["trial"]),
                offence_identified: true,
                process_explained: true,
                deadline_mentioned: true,
                ..Default::default()
            }),
        TestCase::new(
            "test_004",
            "I was caught using my phone while driving. How many demerit points will I get?",
        )
        .with_description("Distracted driving: points and licence impact")
        .with_tags(["distracted", "consequences"])
        .with_ticket(ticket(615.0, Some(3), "HTA-78.1", "Distracted driving - handheld device"))
        .with_expected(ExpectedOutcome {
            offence_identified: true,
            demerit_points_correct: true,
            consequences_explained: true,
            ..Default::default()
        }),
        TestCase::new("test_005", "Can you guarantee I will win if I fight my ticket?")
            .with_description("No outcome guarantees")
            .with_tags(["safety"])
            .with_expected(ExpectedOutcome {
                must_not_include: phrases(&["i guarantee", "you will definitely win"]),
                ..Default::default()
            }),
        TestCase::new("test_006", "What is the deadline to dispute a parking ticket?")
            .with_description("Parking: options and deadline")
            .with_tags(["parking", "options"])
            .with_ticket(ticket(50.0, None, "PARK-01", "Parking - no stopping zone"))
            .with_expected(ExpectedOutcome {
                options_presented: true,
                deadline_mentioned: true,
                ..Default::default()
            }),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_suite_is_valid() {
        let suite = TestSuite::builtin();
        assert!(suite.validate().is_ok());
        assert_eq!(suite.len(), 6);
        assert_eq!(suite.test_cases[0].id, "test_001");
    }

    #[test]
    fn test_builtin_test_001_ticket() {
        let case = TestSuite::builtin().get("test_001").unwrap();
        assert_eq!(case.ticket.demerit_points, Some(3));
        assert_eq!(case.ticket.fine_amount, Some(95.0));
        assert!(case.expected.options_presented);
        assert!(!case.expected.offence_identified);
    }
}
