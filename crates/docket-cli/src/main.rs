//! `docket`: run canned legal questions against a chat backend and check
//! every answer.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use docket_core::{evaluate_case, RunSummary, TestSuite};
use docket_runtime::{RunnerConfig, TestRunnerBuilder};

mod output;

use output::{render_report, render_suite, OutputFormat};

#[derive(Parser)]
#[command(name = "docket", version, about = "Evaluate legal chat answers against expected outcomes")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the suite against the chat API
    Run(RunArgs),

    /// List test cases
    List {
        #[command(flatten)]
        selection: SuiteSelection,

        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Evaluate one answer offline
    Check {
        /// Test case id
        #[arg(long)]
        id: String,

        /// Suite file (YAML or JSON); defaults to the built-in suite
        #[arg(long)]
        suite: Option<PathBuf>,

        /// Read the answer from this file instead of stdin
        #[arg(long)]
        answer_file: Option<PathBuf>,

        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Validate a suite file
    Validate {
        /// Suite file (YAML or JSON)
        file: PathBuf,
    },
}

#[derive(Args)]
struct SuiteSelection {
    /// Suite file (YAML or JSON); defaults to the built-in suite
    #[arg(long)]
    suite: Option<PathBuf>,

    /// Only these test case ids (repeatable)
    #[arg(long = "only")]
    only: Vec<String>,

    /// Only test cases with this tag
    #[arg(long)]
    tag: Option<String>,
}

#[derive(Args)]
struct RunArgs {
    /// Runner config file (YAML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Chat backend base URL
    #[arg(long)]
    base_url: Option<String>,

    /// Per-request timeout (e.g., "30s")
    #[arg(long, value_parser = humantime::parse_duration)]
    timeout: Option<Duration>,

    /// Maximum requests in flight
    #[arg(long)]
    concurrency: Option<usize>,

    #[command(flatten)]
    selection: SuiteSelection,

    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

fn init_logging(verbose: u8) {
    let default_directive = match verbose {
        0 => "docket=info",
        1 => "docket=debug",
        _ => "docket=trace",
    };

    // Logs go to stderr; stdout carries the report
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_directive.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_suite(path: Option<&Path>) -> Result<TestSuite> {
    match path {
        Some(path) => TestSuite::from_path(path)
            .with_context(|| format!("Failed to load suite {}", path.display())),
        None => Ok(TestSuite::builtin().clone()),
    }
}

fn select(selection: &SuiteSelection) -> Result<TestSuite> {
    let mut suite = load_suite(selection.suite.as_deref())?;

    if !selection.only.is_empty() {
        suite = suite.filter(selection.only.as_slice())?;
    }
    if let Some(tag) = &selection.tag {
        suite = suite.filter_by_tag(tag);
    }

    Ok(suite)
}

async fn run(args: RunArgs) -> Result<ExitCode> {
    let mut config = match &args.config {
        Some(path) => RunnerConfig::from_yaml_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => RunnerConfig::default(),
    }
    .with_env_overrides();

    if let Some(base_url) = args.base_url {
        config.base_url = base_url;
    }
    if let Some(timeout) = args.timeout {
        config.timeout = timeout;
    }
    if let Some(concurrency) = args.concurrency {
        config.concurrency = concurrency;
    }

    let suite = select(&args.selection)?;
    if suite.is_empty() {
        bail!("No test cases selected");
    }

    tracing::debug!(?config, "Resolved runner config");

    let runner = TestRunnerBuilder::new()
        .config(config)
        .suite(suite)
        .build()
        .context("Failed to set up test runner")?;

    let results = runner.run_all_tests().await;
    let summary = RunSummary::from_results(&results);

    print!("{}", render_report(&results, &summary, args.format)?);

    Ok(exit_code(&summary))
}

fn check(
    id: &str,
    suite: Option<&Path>,
    answer_file: Option<&Path>,
    format: OutputFormat,
) -> Result<ExitCode> {
    let suite = load_suite(suite)?;
    let case = suite
        .get(id)
        .with_context(|| format!("Unknown test case: {}", id))?;

    let answer = read_answer(answer_file)?;

    let result = evaluate_case(case, &answer, Duration::ZERO);
    let results = [result];
    let summary = RunSummary::from_results(&results);

    print!("{}", render_report(&results, &summary, format)?);

    Ok(exit_code(&summary))
}

fn read_answer(answer_file: Option<&Path>) -> Result<String> {
    match answer_file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read answer {}", path.display())),
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read answer from stdin")?;
            Ok(buffer)
        }
    }
}

fn exit_code(summary: &RunSummary) -> ExitCode {
    if summary.all_passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Run(args) => run(args).await,
        Command::List { selection, format } => {
            let suite = select(&selection)?;
            print!("{}", render_suite(&suite, format)?);
            Ok(ExitCode::SUCCESS)
        }
        Command::Check {
            id,
            suite,
            answer_file,
            format,
        } => check(&id, suite.as_deref(), answer_file.as_deref(), format),
        Command::Validate { file } => {
            let suite = TestSuite::from_path(&file)
                .with_context(|| format!("Invalid suite {}", file.display()))?;
            println!("OK: {} ({} test cases)", suite.name, suite.len());
            Ok(ExitCode::SUCCESS)
        }
    }
}
