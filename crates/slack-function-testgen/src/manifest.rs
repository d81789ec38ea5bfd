// crates/slack-function-testgen/src/manifest.rs
// ============================================================================
// Module: Manifest Literal Serializer
// Description: Renders the expected function manifest as a TypeScript literal.
// Purpose: Rebuild a function's manifest export field by field from a record.
// Dependencies: slack-schema-types
// ============================================================================

//! ## Overview
//! The manifest-shape test compares `<Function>.export()` against a literal
//! built here. Fields are emitted in a fixed order:
//! `source_file`, `title`, optional `description`, `input_parameters`,
//! `output_parameters`, joined by `",\n"`.
//!
//! Each parameter set renders as
//! `{properties: {<name>: {type: <ref>, ...}, ...}, required: [...]}`.
//! Free-text values are JSON-escaped so record content cannot break the
//! generated source.

use slack_schema_types::typescript_string_literal;

use crate::TestGenError;
use crate::record::FunctionParameter;
use crate::record::FunctionRecord;

/// Renders the manifest fields of `record` without surrounding braces.
///
/// # Errors
/// Returns [`TestGenError::Json`] if a string literal cannot be encoded.
pub fn manifest_fields(record: &FunctionRecord) -> Result<String, TestGenError> {
    let title = record.title.as_deref().unwrap_or(&record.callback_id);
    let mut fields = vec!["source_file: \"\"".to_string(), format!("title: {}", literal(title)?)];
    if let Some(description) = &record.description {
        fields.push(format!("description: {}", literal(description)?));
    }
    fields.push(format!("input_parameters: {}", parameter_set(&record.input_parameters)?));
    fields.push(format!("output_parameters: {}", parameter_set(&record.output_parameters)?));
    Ok(fields.join(",\n"))
}

/// Renders the manifest object literal for `record`.
///
/// # Errors
/// Returns [`TestGenError::Json`] if a string literal cannot be encoded.
pub fn manifest_literal(record: &FunctionRecord) -> Result<String, TestGenError> {
    Ok(format!("{{{}}}", manifest_fields(record)?))
}

/// Renders one `{properties, required}` parameter set.
fn parameter_set(parameters: &[FunctionParameter]) -> Result<String, TestGenError> {
    let mut properties = Vec::with_capacity(parameters.len());
    for parameter in parameters {
        properties.push(format!("{}: {}", parameter.name, parameter_schema(parameter)?));
    }
    let mut required = Vec::new();
    for parameter in parameters.iter().filter(|parameter| parameter.is_required) {
        required.push(literal(&parameter.name)?);
    }
    Ok(format!(
        "{{properties: {{{}}}, required: [{}]}}",
        properties.join(",\n"),
        required.join(", ")
    ))
}

/// Renders the schema object of one parameter.
fn parameter_schema(parameter: &FunctionParameter) -> Result<String, TestGenError> {
    let mut fields = vec![format!("type: {}", parameter.type_ref())];
    if let Some(items) = parameter.items_type_ref() {
        fields.push(format!("items: {{type: {items}}}"));
    }
    if let Some(title) = &parameter.title {
        fields.push(format!("title: {}", literal(title)?));
    }
    if let Some(description) = &parameter.description {
        fields.push(format!("description: {}", literal(description)?));
    }
    Ok(format!("{{{}}}", fields.join(", ")))
}

/// Renders a string as a quoted TypeScript literal.
pub(crate) fn literal(value: &str) -> Result<String, TestGenError> {
    typescript_string_literal(value)
        .map_err(|_| TestGenError::Json(format!("cannot encode string literal: {value}")))
}
