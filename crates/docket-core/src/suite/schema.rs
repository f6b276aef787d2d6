//! JSON Schema validation for suite files.
//!
//! Suites are validated against `schema/test-suite.schema.json` before they
//! are deserialized, so typos in flag names are reported instead of being
//! silently defaulted to `false`.

use std::sync::OnceLock;

/// Embedded suite schema (loaded at compile time).
const SUITE_SCHEMA_JSON: &str = include_str!("../../../../schema/test-suite.schema.json");

/// Compiled JSON Schema validator (initialized once, reused).
static COMPILED_SCHEMA: OnceLock<Result<jsonschema::Validator, String>> = OnceLock::new();

fn get_validator() -> Result<&'static jsonschema::Validator, String> {
    let result = COMPILED_SCHEMA.get_or_init(|| {
        let schema_value: serde_json::Value = serde_json::from_str(SUITE_SCHEMA_JSON)
            .map_err(|e| format!("Invalid schema JSON: {}", e))?;

        jsonschema::options()
            .build(&schema_value)
            .map_err(|e| format!("Failed to compile schema: {}", e))
    });

    result.as_ref().map_err(Clone::clone)
}

/// Validate a suite JSON value against the schema.
///
/// Returns every validation error, each suffixed with its instance path.
pub fn validate_suite_schema(suite_json: &serde_json::Value) -> Result<(), Vec<String>> {
    let validator = get_validator().map_err(|e| vec![e])?;

    let errors: Vec<String> = validator
        .iter_errors(suite_json)
        .map(|e| format!("{} at {}", e, e.instance_path))
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
