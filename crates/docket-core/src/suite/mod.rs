//! Test suite loading and validation.
//!
//! A suite is a named, read-only table of test cases. The built-in traffic
//! ticket suite ships with the crate; custom suites are YAML/JSON files
//! validated against an embedded JSON Schema.

mod builtin;
mod parser;
mod schema;

pub use parser::{SuiteError, TestSuite};
pub use schema::validate_suite_schema;
