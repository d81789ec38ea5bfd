// crates/slack-function-testgen/src/config.rs
// ============================================================================
// Module: Generator Configuration
// Description: Configuration loading and validation for the test generator.
// Purpose: Provide strict, fail-closed TOML config parsing with hard limits.
// Dependencies: serde, serde_json, toml, slack-schema-types
// ============================================================================

//! ## Overview
//! Configuration is an optional TOML file. The path is resolved from the CLI,
//! then the `SLACK_TESTGEN_CONFIG` environment variable, then
//! `slack-testgen.toml` in the working directory. An explicit or environment
//! path must exist; a missing default file means built-in defaults.
//!
//! ```toml
//! [generator]
//! test_runner = "Deno.test"
//!
//! [imports]
//! dev_deps = "../../../dev_deps.ts"
//!
//! [placeholders]
//! mode = "type_aware"
//! fallback = "test"
//! values = { integer = 1, "slack#/types/user_id" = "U0123" }
//! ```
//!
//! Unknown keys are rejected. Every loaded config is validated before use.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde_json::Value;
use slack_schema_types::is_typescript_identifier;
use thiserror::Error;

use crate::placeholder::DEFAULT_PLACEHOLDER;
use crate::placeholder::PlaceholderPolicy;
use crate::template::GeneratorOptions;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
pub const DEFAULT_CONFIG_NAME: &str = "slack-testgen.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "SLACK_TESTGEN_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum length of an import specifier.
pub(crate) const MAX_IMPORT_PATH_LENGTH: usize = 1024;
/// Maximum number of per-type placeholder entries.
pub(crate) const MAX_PLACEHOLDER_VALUES: usize = 256;
/// Default test registration call.
pub(crate) const DEFAULT_TEST_RUNNER: &str = "Deno.test";

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Test generator configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Generator behaviour.
    #[serde(default)]
    pub generator: GeneratorSection,
    /// Import specifiers used by generated tests.
    #[serde(default)]
    pub imports: ImportPaths,
    /// Required-input placeholder configuration.
    #[serde(default)]
    pub placeholders: PlaceholderConfig,
}

/// `[generator]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorSection {
    /// Dotted test registration call (`Deno.test`).
    pub test_runner: String,
}

impl Default for GeneratorSection {
    fn default() -> Self {
        Self {
            test_runner: DEFAULT_TEST_RUNNER.to_string(),
        }
    }
}

/// `[imports]` section: module specifiers relative to the generated file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImportPaths {
    /// Module exporting `assertEquals` and `assertExists`.
    pub dev_deps: String,
    /// Module exporting `DefineWorkflow`.
    pub workflows: String,
    /// Module exporting `ManifestFunctionSchema`.
    pub manifest_schema: String,
    /// Module default-exporting `SchemaTypes`.
    pub schema_types: String,
    /// Module default-exporting `SlackTypes`.
    pub slack_types: String,
    /// Module exporting `InternalSlackTypes`.
    pub custom_types: String,
}

impl Default for ImportPaths {
    fn default() -> Self {
        Self {
            dev_deps: "../../../dev_deps.ts".to_string(),
            workflows: "../../../workflows/mod.ts".to_string(),
            manifest_schema: "../../../manifest/manifest_schema.ts".to_string(),
            schema_types: "../../schema_types.ts".to_string(),
            slack_types: "../schema_types.ts".to_string(),
            custom_types: "../types/custom/mod.ts".to_string(),
        }
    }
}

impl ImportPaths {
    /// Returns `(key, value)` pairs for validation and diagnostics.
    fn entries(&self) -> [(&'static str, &str); 6] {
        [
            ("imports.dev_deps", &self.dev_deps),
            ("imports.workflows", &self.workflows),
            ("imports.manifest_schema", &self.manifest_schema),
            ("imports.schema_types", &self.schema_types),
            ("imports.slack_types", &self.slack_types),
            ("imports.custom_types", &self.custom_types),
        ]
    }

    /// Validates every import specifier.
    fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in self.entries() {
            if value.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
            }
            if value.len() > MAX_IMPORT_PATH_LENGTH {
                return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
            }
            if value.chars().any(char::is_control) {
                return Err(ConfigError::Invalid(format!(
                    "{field} must not contain control characters"
                )));
            }
        }
        Ok(())
    }
}

/// Placeholder selection mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceholderMode {
    /// One value for every required input.
    #[default]
    Fixed,
    /// Values chosen by parameter type id.
    TypeAware,
}

/// `[placeholders]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlaceholderConfig {
    /// Selection mode.
    pub mode: PlaceholderMode,
    /// Value used in fixed mode and for unmapped types in type-aware mode.
    pub fallback: Value,
    /// Per-type overrides (type-aware mode only).
    pub values: BTreeMap<String, Value>,
}

impl Default for PlaceholderConfig {
    fn default() -> Self {
        Self {
            mode: PlaceholderMode::Fixed,
            fallback: Value::String(DEFAULT_PLACEHOLDER.to_string()),
            values: BTreeMap::new(),
        }
    }
}

impl PlaceholderConfig {
    /// Validates placeholder settings.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.mode == PlaceholderMode::Fixed && !self.values.is_empty() {
            return Err(ConfigError::Invalid(
                "placeholders.values requires mode = \"type_aware\"".to_string(),
            ));
        }
        if self.values.len() > MAX_PLACEHOLDER_VALUES {
            return Err(ConfigError::Invalid(format!(
                "placeholders.values exceeds {MAX_PLACEHOLDER_VALUES} entries"
            )));
        }
        if self.values.keys().any(|key| key.trim().is_empty()) {
            return Err(ConfigError::Invalid(
                "placeholders.values keys must be non-empty type ids".to_string(),
            ));
        }
        Ok(())
    }

    /// Builds the runtime placeholder policy.
    #[must_use]
    pub fn policy(&self) -> PlaceholderPolicy {
        match self.mode {
            PlaceholderMode::Fixed => PlaceholderPolicy::Fixed(self.fallback.clone()),
            PlaceholderMode::TypeAware => {
                PlaceholderPolicy::type_aware(self.fallback.clone(), self.values.clone())
            }
        }
    }
}

impl GeneratorConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(resolved) = resolve_path(path)? else {
            return Ok(Self::default());
        };
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| {
            ConfigError::Io(format!("{}: {err}", resolved.display()))
        })?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml_str(content)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_test_runner(&self.generator.test_runner)?;
        self.imports.validate()?;
        self.placeholders.validate()?;
        Ok(())
    }

    /// Builds generator options from the configuration.
    #[must_use]
    pub fn options(&self) -> GeneratorOptions {
        GeneratorOptions {
            test_runner: self.generator.test_runner.clone(),
            imports: self.imports.clone(),
            placeholders: self.placeholders.policy(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from CLI, environment, or the default file.
fn resolve_path(path: Option<&Path>) -> Result<Option<PathBuf>, ConfigError> {
    if let Some(path) = path {
        return Ok(Some(path.to_path_buf()));
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(Some(PathBuf::from(env_path)));
    }
    let default = PathBuf::from(DEFAULT_CONFIG_NAME);
    Ok(default.is_file().then_some(default))
}

/// Validates the resolved path against length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a dotted runner expression such as `Deno.test`.
fn validate_test_runner(runner: &str) -> Result<(), ConfigError> {
    if runner.is_empty() {
        return Err(ConfigError::Invalid("generator.test_runner must be non-empty".to_string()));
    }
    if !runner.split('.').all(is_typescript_identifier) {
        return Err(ConfigError::Invalid(format!(
            "generator.test_runner '{runner}' must be a dotted identifier"
        )));
    }
    Ok(())
}
