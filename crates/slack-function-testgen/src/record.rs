// crates/slack-function-testgen/src/record.rs
// ============================================================================
// Module: Function Records
// Description: Input model for Slack function test generation.
// Purpose: Describe functions, validate them, and load catalogs from disk.
// Dependencies: serde, serde_json, slack-schema-types
// ============================================================================

//! ## Overview
//! A [`FunctionRecord`] describes one Slack function: its callback id and its
//! ordered input and output parameters. Records usually arrive in bulk as a
//! `functions.json` catalog, loaded with [`FunctionCatalog::load`].
//!
//! ### Security Posture
//! Catalogs are treated as untrusted input. Loading enforces a hard size
//! limit and fails closed on parse errors; names that end up as identifiers
//! in generated code are validated by [`FunctionRecord::validate`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::fs;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;
use slack_schema_types::PrimitiveType;
use slack_schema_types::TypeRef;
use slack_schema_types::is_typescript_identifier;

use crate::TestGenError;

// ============================================================================
// CONSTANTS: Naming and input limits
// ============================================================================

/// Prefix of the Slack-qualified callback id.
pub const SLACK_FUNCTION_PREFIX: &str = "slack#/functions/";

/// Suffix appended to the callback id to name the generated test file.
pub const TEST_FILE_SUFFIX: &str = "_test.ts";

/// Maximum catalog size accepted by [`FunctionCatalog::load`].
pub const MAX_CATALOG_BYTES: u64 = 4 * 1024 * 1024;

// ============================================================================
// SECTION: Parameters
// ============================================================================

/// One input or output parameter of a Slack function.
///
/// Only `name` and `is_required` shape the workflow tests. The remaining
/// fields feed the expected manifest literal and the type imports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionParameter {
    /// Parameter name, rendered as an object key and property access.
    pub name: String,
    /// Raw schema type id.
    #[serde(rename = "type", default = "default_type_id")]
    pub type_id: String,
    /// True when callers must supply the parameter.
    #[serde(default)]
    pub is_required: bool,
    /// Optional display title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Element type for array parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<ParameterItems>,
}

/// Element type of an array parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterItems {
    /// Raw schema type id of each element.
    #[serde(rename = "type")]
    pub type_id: String,
}

/// Default parameter type id when a record omits it.
fn default_type_id() -> String {
    PrimitiveType::String.as_str().to_string()
}

impl FunctionParameter {
    /// Creates a string parameter.
    #[must_use]
    pub fn new(name: impl Into<String>, is_required: bool) -> Self {
        Self {
            name: name.into(),
            type_id: default_type_id(),
            is_required,
            title: None,
            description: None,
            items: None,
        }
    }

    /// Returns a copy with the given type id.
    #[must_use]
    pub fn with_type(mut self, type_id: impl Into<String>) -> Self {
        self.type_id = type_id.into();
        self
    }

    /// Returns a copy with the given title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Returns a copy with the given description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Returns a copy with the given array element type.
    #[must_use]
    pub fn with_items(mut self, type_id: impl Into<String>) -> Self {
        self.items = Some(ParameterItems {
            type_id: type_id.into(),
        });
        self
    }

    /// Classifies the parameter's type id.
    #[must_use]
    pub fn type_ref(&self) -> TypeRef {
        TypeRef::parse(&self.type_id)
    }

    /// Classifies the array element type id, if any.
    #[must_use]
    pub fn items_type_ref(&self) -> Option<TypeRef> {
        self.items.as_ref().map(|items| TypeRef::parse(&items.type_id))
    }
}

// ============================================================================
// SECTION: Records
// ============================================================================

/// Description of one Slack function to generate tests for.
///
/// # Invariants
/// - After [`FunctionRecord::validate`] succeeds, `callback_id` and every
///   parameter name are safe to splice into generated identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionRecord {
    /// Stable function identifier in `snake_case`.
    pub callback_id: String,
    /// Optional display title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Ordered input parameters.
    #[serde(default)]
    pub input_parameters: Vec<FunctionParameter>,
    /// Ordered output parameters.
    #[serde(default)]
    pub output_parameters: Vec<FunctionParameter>,
}

impl FunctionRecord {
    /// Creates a record with no parameters.
    #[must_use]
    pub fn new(callback_id: impl Into<String>) -> Self {
        Self {
            callback_id: callback_id.into(),
            title: None,
            description: None,
            input_parameters: Vec::new(),
            output_parameters: Vec::new(),
        }
    }

    /// Returns a copy with the given title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Returns a copy with the given description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Returns a copy with `parameter` appended to the inputs.
    #[must_use]
    pub fn with_input(mut self, parameter: FunctionParameter) -> Self {
        self.input_parameters.push(parameter);
        self
    }

    /// Returns a copy with `parameter` appended to the outputs.
    #[must_use]
    pub fn with_output(mut self, parameter: FunctionParameter) -> Self {
        self.output_parameters.push(parameter);
        self
    }

    /// Returns the exported symbol name (`send_message` -> `SendMessage`).
    #[must_use]
    pub fn function_name(&self) -> String {
        pascal_case(&self.callback_id)
    }

    /// Returns the Slack-qualified callback id.
    #[must_use]
    pub fn slack_callback_id(&self) -> String {
        format!("{SLACK_FUNCTION_PREFIX}{}", self.callback_id)
    }

    /// Returns the file name of the generated test.
    #[must_use]
    pub fn test_file_name(&self) -> String {
        format!("{}{TEST_FILE_SUFFIX}", self.callback_id)
    }

    /// Returns the relative import path of the function definition.
    #[must_use]
    pub fn definition_import_path(&self) -> String {
        format!("./{}.ts", self.callback_id)
    }

    /// Returns the required inputs in declaration order.
    pub fn required_inputs(&self) -> impl Iterator<Item = &FunctionParameter> {
        self.input_parameters.iter().filter(|parameter| parameter.is_required)
    }

    /// Validates the record before any source is rendered.
    ///
    /// # Errors
    /// Returns [`TestGenError::MalformedRecord`] when the callback id is empty
    /// or not identifier-safe, or when a parameter name is not a valid
    /// TypeScript identifier.
    pub fn validate(&self) -> Result<(), TestGenError> {
        if self.callback_id.is_empty() {
            return Err(TestGenError::MalformedRecord("callback_id must be non-empty".to_string()));
        }
        if !is_callback_id(&self.callback_id) {
            return Err(TestGenError::MalformedRecord(format!(
                "callback_id '{}' must match [A-Za-z_][A-Za-z0-9_]*",
                self.callback_id
            )));
        }
        if !is_typescript_identifier(&self.function_name()) {
            return Err(TestGenError::MalformedRecord(format!(
                "callback_id '{}' does not derive a valid function name",
                self.callback_id
            )));
        }
        validate_parameters(&self.callback_id, "input_parameters", &self.input_parameters)?;
        validate_parameters(&self.callback_id, "output_parameters", &self.output_parameters)?;
        Ok(())
    }
}

/// Checks every parameter name in one list.
fn validate_parameters(
    callback_id: &str,
    field: &str,
    parameters: &[FunctionParameter],
) -> Result<(), TestGenError> {
    let mut seen = BTreeSet::new();
    for parameter in parameters {
        if !is_typescript_identifier(&parameter.name) {
            return Err(TestGenError::MalformedRecord(format!(
                "{callback_id}.{field}: parameter name '{}' is not a valid identifier",
                parameter.name
            )));
        }
        if !seen.insert(parameter.name.as_str()) {
            return Err(TestGenError::MalformedRecord(format!(
                "{callback_id}.{field}: duplicate parameter name '{}'",
                parameter.name
            )));
        }
    }
    Ok(())
}

/// Returns true when `value` matches `[A-Za-z_][A-Za-z0-9_]*`.
fn is_callback_id(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
}

/// Converts a `snake_case` identifier into `PascalCase`, keeping the case of
/// every character after a segment's first.
fn pascal_case(value: &str) -> String {
    let mut output = String::new();
    for segment in value.split('_') {
        let mut chars = segment.chars();
        if let Some(first) = chars.next() {
            output.push(first.to_ascii_uppercase());
            output.extend(chars);
        }
    }
    output
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Accepted catalog layouts.
#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogDocument {
    /// Bare array of records.
    List(Vec<FunctionRecord>),
    /// API-style envelope with a `functions` array.
    Envelope {
        /// Records inside the envelope.
        functions: Vec<FunctionRecord>,
    },
}

/// Ordered set of function records loaded from a catalog.
///
/// # Invariants
/// - Record order matches the catalog input.
/// - Callback ids are unique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionCatalog {
    /// Source path when loaded from disk.
    path: Option<PathBuf>,
    /// Records in input order.
    records: Vec<FunctionRecord>,
}

impl FunctionCatalog {
    /// Loads a catalog from a JSON file.
    ///
    /// # Errors
    /// Returns [`TestGenError`] when the file cannot be read or parsed, exceeds
    /// [`MAX_CATALOG_BYTES`], or repeats a callback id.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TestGenError> {
        let path = path.as_ref().to_path_buf();
        let bytes = read_catalog_bytes(&path)?;
        let records = parse_records(&bytes)?;
        Ok(Self {
            path: Some(path),
            records,
        })
    }

    /// Parses a catalog from an in-memory JSON document.
    ///
    /// # Errors
    /// Returns [`TestGenError`] when parsing fails or a callback id repeats.
    pub fn from_json(json: &str) -> Result<Self, TestGenError> {
        let records = parse_records(json.as_bytes())?;
        Ok(Self {
            path: None,
            records,
        })
    }

    /// Returns the source path, if loaded from disk.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Returns the records in input order.
    #[must_use]
    pub fn records(&self) -> &[FunctionRecord] {
        &self.records
    }
}

/// Parses catalog bytes and rejects duplicate callback ids.
fn parse_records(bytes: &[u8]) -> Result<Vec<FunctionRecord>, TestGenError> {
    let document: CatalogDocument =
        serde_json::from_slice(bytes).map_err(|err| TestGenError::Json(err.to_string()))?;
    let records = match document {
        CatalogDocument::List(records)
        | CatalogDocument::Envelope {
            functions: records,
        } => records,
    };
    let mut seen = BTreeSet::new();
    for record in &records {
        if !seen.insert(record.callback_id.as_str()) {
            return Err(TestGenError::Catalog(format!(
                "duplicate callback_id: {}",
                record.callback_id
            )));
        }
    }
    Ok(records)
}

/// Reads the catalog with size limits to avoid memory exhaustion.
fn read_catalog_bytes(path: &Path) -> Result<Vec<u8>, TestGenError> {
    let file = fs::File::open(path).map_err(|err| TestGenError::Io(err.to_string()))?;
    let metadata = file.metadata().map_err(|err| TestGenError::Io(err.to_string()))?;
    if metadata.len() > MAX_CATALOG_BYTES {
        return Err(TestGenError::Catalog(format!("catalog exceeds {MAX_CATALOG_BYTES} bytes")));
    }
    let mut bytes = Vec::new();
    let mut limited = file.take(MAX_CATALOG_BYTES + 1);
    limited.read_to_end(&mut bytes).map_err(|err| TestGenError::Io(err.to_string()))?;
    let size = u64::try_from(bytes.len()).map_err(|_| {
        TestGenError::Catalog("catalog size exceeds addressable memory".to_string())
    })?;
    if size > MAX_CATALOG_BYTES {
        return Err(TestGenError::Catalog(format!("catalog exceeds {MAX_CATALOG_BYTES} bytes")));
    }
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    #![allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test fixtures use explicit asserts and unwraps for clarity."
    )]

    use super::*;

    #[test]
    fn function_name_pascal_cases_segments() {
        assert_eq!(FunctionRecord::new("add_pin").function_name(), "AddPin");
        assert_eq!(FunctionRecord::new("send_dm").function_name(), "SendDm");
        assert_eq!(FunctionRecord::new("archiveChannel").function_name(), "ArchiveChannel");
        assert_eq!(FunctionRecord::new("__leading").function_name(), "Leading");
    }

    #[test]
    fn derived_names_use_callback_id() {
        let record = FunctionRecord::new("add_pin");
        assert_eq!(record.slack_callback_id(), "slack#/functions/add_pin");
        assert_eq!(record.test_file_name(), "add_pin_test.ts");
        assert_eq!(record.definition_import_path(), "./add_pin.ts");
    }

    #[test]
    fn validate_rejects_empty_callback_id() {
        let err = FunctionRecord::new("").validate().unwrap_err();
        assert!(matches!(err, TestGenError::MalformedRecord(message) if message.contains("non-empty")));
    }

    #[test]
    fn validate_rejects_non_identifier_callback_ids() {
        for callback_id in ["1st", "add-pin", "add pin", "_"] {
            let result = FunctionRecord::new(callback_id).validate();
            assert!(
                matches!(result, Err(TestGenError::MalformedRecord(_))),
                "{callback_id} should be rejected"
            );
        }
    }

    #[test]
    fn validate_names_the_offending_parameter() {
        let record = FunctionRecord::new("add_pin")
            .with_input(FunctionParameter::new("channel_id", true))
            .with_output(FunctionParameter::new("bad-name", false));
        let err = record.validate().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("add_pin.output_parameters"), "{message}");
        assert!(message.contains("bad-name"), "{message}");
    }

    #[test]
    fn validate_rejects_duplicate_parameter_names() {
        let record = FunctionRecord::new("add_pin")
            .with_input(FunctionParameter::new("channel_id", true))
            .with_input(FunctionParameter::new("channel_id", false));
        let err = record.validate().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("add_pin.input_parameters"), "{message}");
        assert!(message.contains("duplicate parameter name 'channel_id'"), "{message}");
    }

    #[test]
    fn same_name_in_inputs_and_outputs_is_allowed() {
        let record = FunctionRecord::new("create_channel")
            .with_input(FunctionParameter::new("channel_id", true))
            .with_output(FunctionParameter::new("channel_id", false));
        assert!(record.validate().is_ok());
    }

    #[test]
    fn required_inputs_keep_declaration_order() {
        let record = FunctionRecord::new("f")
            .with_input(FunctionParameter::new("b", true))
            .with_input(FunctionParameter::new("skip", false))
            .with_input(FunctionParameter::new("a", true));
        let names: Vec<&str> =
            record.required_inputs().map(|parameter| parameter.name.as_str()).collect();
        assert_eq!(names, ["b", "a"]);
    }

    #[test]
    fn parameters_default_to_optional_strings() {
        let parameter: FunctionParameter = serde_json::from_str(r#"{"name":"note"}"#).unwrap();
        assert_eq!(parameter, FunctionParameter::new("note", false));
    }

    #[test]
    fn catalog_accepts_envelope_layout() {
        let catalog = FunctionCatalog::from_json(
            r#"{"ok":true,"functions":[{"callback_id":"a"},{"callback_id":"b"}]}"#,
        )
        .unwrap();
        let ids: Vec<&str> =
            catalog.records().iter().map(|record| record.callback_id.as_str()).collect();
        assert_eq!(ids, ["a", "b"]);
        assert!(catalog.path().is_none());
    }

    #[test]
    fn catalog_rejects_duplicate_callback_ids() {
        let err =
            FunctionCatalog::from_json(r#"[{"callback_id":"a"},{"callback_id":"a"}]"#).unwrap_err();
        assert!(matches!(err, TestGenError::Catalog(message) if message.contains("duplicate")));
    }
}
