//! Suite parsing from YAML/JSON.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::types::TestCase;

use super::builtin::BUILTIN_SUITE;
use super::schema::validate_suite_schema;

/// Errors that can occur when loading suites.
#[derive(Error, Debug)]
pub enum SuiteError {
    #[error("Failed to read suite file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Suite does not match schema: {}", .0.join("; "))]
    SchemaError(Vec<String>),

    #[error("Suite validation failed: {0}")]
    ValidationError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Unknown test case: {0}")]
    UnknownTestCase(String),

    #[error("Unsupported suite format: {0}")]
    UnsupportedFormat(String),
}

/// A named table of test cases.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TestSuite {
    /// Human-readable name
    pub name: String,

    /// Detailed description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Cases in run order
    pub test_cases: Vec<TestCase>,
}

impl TestSuite {
    /// The built-in traffic ticket suite.
    pub fn builtin() -> &'static TestSuite {
        &BUILTIN_SUITE
    }

    /// Parse a suite from YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, SuiteError> {
        let value: JsonValue = serde_yaml::from_str(yaml)?;
        Self::from_value(value)
    }

    /// Parse a suite from JSON string.
    pub fn from_json(json: &str) -> Result<Self, SuiteError> {
        let value: JsonValue = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Parse a suite from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, SuiteError> {
        let contents = fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Parse a suite from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SuiteError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Parse a suite file, picking the format from its extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SuiteError> {
        let path = path.as_ref();
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_file(path),
            Some("json") => Self::from_json_file(path),
            other => Err(SuiteError::UnsupportedFormat(format!(
                "{} (extension {:?}, expected .yaml, .yml or .json)",
                path.display(),
                other.unwrap_or("")
            ))),
        }
    }

    fn from_value(value: JsonValue) -> Result<Self, SuiteError> {
        validate_suite_schema(&value).map_err(SuiteError::SchemaError)?;
        let suite: TestSuite = serde_json::from_value(value)?;
        suite.validate()?;
        tracing::debug!(suite = %suite.name, cases = suite.len(), "Loaded test suite");
        Ok(suite)
    }

    /// Validate the suite structure.
    pub(crate) fn validate(&self) -> Result<(), SuiteError> {
        if self.name.trim().is_empty() {
            return Err(SuiteError::MissingField("name".to_string()));
        }

        let mut seen = HashSet::new();
        for (index, case) in self.test_cases.iter().enumerate() {
            if case.id.trim().is_empty() {
                return Err(SuiteError::MissingField(format!("test_cases[{}].id", index)));
            }
            if case.question.trim().is_empty() {
                return Err(SuiteError::MissingField(format!(
                    "test_cases[{}].question",
                    index
                )));
            }
            if !seen.insert(case.id.as_str()) {
                return Err(SuiteError::ValidationError(format!(
                    "Duplicate test case ID: {}",
                    case.id
                )));
            }
        }

        Ok(())
    }

    /// Look up a case by id.
    pub fn get(&self, id: &str) -> Option<&TestCase> {
        self.test_cases.iter().find(|c| c.id == id)
    }

    /// Keep only the listed ids, in suite order.
    ///
    /// Every requested id must exist.
    pub fn filter<S: AsRef<str>>(&self, ids: &[S]) -> Result<TestSuite, SuiteError> {
        if let Some(unknown) = ids.iter().map(|id| id.as_ref()).find(|id| self.get(id).is_none()) {
            return Err(SuiteError::UnknownTestCase(unknown.to_string()));
        }

        Ok(self.retain(|case| ids.iter().any(|id| id.as_ref() == case.id)))
    }

    /// Keep only cases carrying `tag`.
    pub fn filter_by_tag(&self, tag: &str) -> TestSuite {
        self.retain(|case| case.has_tag(tag))
    }

    fn retain(&self, keep: impl Fn(&TestCase) -> bool) -> TestSuite {
        TestSuite {
            name: self.name.clone(),
            description: self.description.clone(),
            test_cases: self.test_cases.iter().filter(|c| keep(c)).cloned().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.test_cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.test_cases.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TestCase> {
        self.test_cases.iter()
    }
}
