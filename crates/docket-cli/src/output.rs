//! Report rendering for the CLI.

use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;

use docket_core::{EvaluationResult, RunSummary, TestSuite};

/// Output format for reports and listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Yaml,
}

#[derive(Serialize)]
struct Report<'a> {
    summary: &'a RunSummary,
    results: &'a [EvaluationResult],
}

/// Render run results.
pub fn render_report(
    results: &[EvaluationResult],
    summary: &RunSummary,
    format: OutputFormat,
) -> Result<String> {
    let report = Report { summary, results };
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&report)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(&report)?),
        OutputFormat::Text => Ok(render_text(results, summary)),
    }
}

fn render_text(results: &[EvaluationResult], summary: &RunSummary) -> String {
    let mut out = String::new();

    for result in results {
        let badge = if result.passed() { "PASS" } else { "FAIL" };
        out.push_str(&format!(
            "{}  {}  ({} ms)\n",
            badge, result.test_id, result.response_time_ms
        ));
        for failure in &result.failures {
            out.push_str(&format!("      - {}\n", failure));
        }
    }

    out.push_str(&format!(
        "\n{} passed, {} failed ({:.1}%), avg {} ms\n",
        summary.passed,
        summary.failed,
        summary.pass_rate * 100.0,
        summary.average_response_ms
    ));
    out
}

/// Render a suite listing.
pub fn render_suite(suite: &TestSuite, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(suite)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(suite)?),
        OutputFormat::Text => {
            let mut out = format!("{} ({} test cases)\n", suite.name, suite.len());
            for case in suite.iter() {
                let tags = if case.tags.is_empty() {
                    String::new()
                } else {
                    format!(" [{}]", case.tags.join(", "))
                };
                out.push_str(&format!("  {}{}  {}\n", case.id, tags, case.question));
            }
            Ok(out)
        }
    }
}
