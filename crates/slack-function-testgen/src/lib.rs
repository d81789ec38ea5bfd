// crates/slack-function-testgen/src/lib.rs
// ============================================================================
// Module: Slack Function Test Generator Library
// Description: Deterministic generator for Slack function TypeScript tests.
// Purpose: Render `<callback_id>_test.ts` sources from function records.
// Dependencies: slack-schema-types, serde, serde_json, thiserror, toml
// ============================================================================

//! ## Overview
//! This crate turns a [`FunctionRecord`] (callback id plus ordered input and
//! output parameters) into the TypeScript test file the SDK ships for that
//! function. Each file checks three things:
//! - the function's manifest export matches the record,
//! - the function can be added as a workflow step with only its required
//!   inputs,
//! - every declared output exists on the step (only when outputs exist).
//!
//! ### Design Notes
//! - Output is deterministic: parameter order follows the record and import
//!   sets are ordered.
//! - Generation builds a [`TestModule`] first and renders it once; no emitted
//!   line is patched afterwards.
//! - Records are validated before anything is rendered. Malformed records
//!   fail with [`TestGenError::MalformedRecord`] and produce no output.
//!
//! ## Index
//! - Public API: [`TestGenerator`], [`generate`], [`TestGenError`]
//! - Inputs: [`FunctionRecord`], [`FunctionParameter`], [`FunctionCatalog`]
//! - Rendering: [`ir`], [`manifest`], [`placeholder`]
//! - Ambient: [`config`], [`audit`]

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod config;
pub mod ir;
pub mod manifest;
pub mod placeholder;
pub mod record;
pub mod template;

// ============================================================================
// SECTION: Errors
// ============================================================================

use thiserror::Error;

/// Errors raised by the test generator.
///
/// # Invariants
/// - Variant meanings are stable for automation and tests.
/// - [`TestGenError::kind`] labels are stable audit values.
///
/// # Examples
/// ```
/// use slack_function_testgen::TestGenError;
///
/// let err = TestGenError::MalformedRecord("callback_id must be non-empty".to_string());
/// assert_eq!(err.kind(), "malformed_record");
/// ```
#[derive(Debug, Error)]
pub enum TestGenError {
    /// IO error while reading or writing files.
    #[error("io error: {0}")]
    Io(String),
    /// JSON serialization or parsing error.
    #[error("json error: {0}")]
    Json(String),
    /// Configuration could not be loaded or is invalid.
    #[error("config error: {0}")]
    Config(String),
    /// Function catalog error.
    #[error("catalog error: {0}")]
    Catalog(String),
    /// Function record failed validation.
    #[error("malformed record: {0}")]
    MalformedRecord(String),
    /// Generated files on disk differ from the rendered sources.
    #[error("output drift: {0}")]
    OutputDrift(String),
}

impl TestGenError {
    /// Returns a stable label for the error variant.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::Json(_) => "json",
            Self::Config(_) => "config",
            Self::Catalog(_) => "catalog",
            Self::MalformedRecord(_) => "malformed_record",
            Self::OutputDrift(_) => "output_drift",
        }
    }
}

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::GeneratorConfig;
pub use ir::TestModule;
pub use placeholder::PlaceholderPolicy;
pub use record::FunctionCatalog;
pub use record::FunctionParameter;
pub use record::FunctionRecord;
pub use template::GeneratorOptions;
pub use template::TestGenerator;

/// Generates the test source for `record` with default options.
///
/// # Errors
/// Returns [`TestGenError::MalformedRecord`] when the record fails validation.
///
/// # Examples
/// ```
/// use slack_function_testgen::FunctionRecord;
///
/// # fn main() -> Result<(), slack_function_testgen::TestGenError> {
/// let source = slack_function_testgen::generate(&FunctionRecord::new("my_function"))?;
/// assert!(source.contains("Deno.test(\"MyFunction generates valid FunctionManifest\""));
/// # Ok(())
/// # }
/// ```
pub fn generate(record: &FunctionRecord) -> Result<String, TestGenError> {
    TestGenerator::default().generate(record)
}
