// crates/slack-function-testgen/src/placeholder.rs
// ============================================================================
// Module: Placeholder Values
// Description: Sample values supplied for required inputs in workflow tests.
// Purpose: Choose the literal each required parameter receives.
// Dependencies: serde_json
// ============================================================================

//! ## Overview
//! Workflow tests add the function as a step with only its required inputs.
//! [`PlaceholderPolicy`] picks the value for each of them:
//! - [`PlaceholderPolicy::Fixed`] uses one value for every parameter. The
//!   default is the string `"test"`, whatever the parameter's type.
//! - [`PlaceholderPolicy::TypeAware`] looks the parameter's type id up in a
//!   table and falls back to a fixed value for unmapped types.
//!
//! Values are JSON, which is also valid TypeScript literal syntax.

use std::collections::BTreeMap;

use serde_json::Value;
use serde_json::json;
use slack_schema_types::PrimitiveType;

use crate::TestGenError;
use crate::record::FunctionParameter;

/// Placeholder string used when nothing else is configured.
pub const DEFAULT_PLACEHOLDER: &str = "test";

/// Strategy for choosing required-input sample values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaceholderPolicy {
    /// Same value for every parameter.
    Fixed(Value),
    /// Per-type values with a fallback.
    TypeAware {
        /// Value for type ids missing from `values`.
        fallback: Value,
        /// Values keyed by raw type id.
        values: BTreeMap<String, Value>,
    },
}

impl Default for PlaceholderPolicy {
    fn default() -> Self {
        Self::Fixed(Value::String(DEFAULT_PLACEHOLDER.to_string()))
    }
}

impl PlaceholderPolicy {
    /// Returns the built-in per-type table for the `SchemaTypes` primitives.
    #[must_use]
    pub fn primitive_defaults() -> BTreeMap<String, Value> {
        PrimitiveType::ALL
            .into_iter()
            .map(|primitive| {
                let value = match primitive {
                    PrimitiveType::String => json!(DEFAULT_PLACEHOLDER),
                    PrimitiveType::Boolean => json!(true),
                    PrimitiveType::Integer | PrimitiveType::Number => json!(0),
                    PrimitiveType::Object => json!({}),
                    PrimitiveType::Array => json!([]),
                };
                (primitive.as_str().to_string(), value)
            })
            .collect()
    }

    /// Returns a type-aware policy over the built-in table plus `overrides`.
    #[must_use]
    pub fn type_aware(fallback: Value, overrides: BTreeMap<String, Value>) -> Self {
        let mut values = Self::primitive_defaults();
        values.extend(overrides);
        Self::TypeAware {
            fallback,
            values,
        }
    }

    /// Returns the value chosen for `parameter`.
    #[must_use]
    pub fn value_for(&self, parameter: &FunctionParameter) -> &Value {
        match self {
            Self::Fixed(value) => value,
            Self::TypeAware {
                fallback,
                values,
            } => values.get(&parameter.type_id).unwrap_or(fallback),
        }
    }

    /// Renders the value chosen for `parameter` as a TypeScript literal.
    ///
    /// # Errors
    /// Returns [`TestGenError::Json`] if the value cannot be encoded.
    pub fn render(&self, parameter: &FunctionParameter) -> Result<String, TestGenError> {
        serde_json::to_string(self.value_for(parameter))
            .map_err(|err| TestGenError::Json(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "Test fixtures use unwraps for clarity.")]

    use super::*;

    #[test]
    fn fixed_policy_ignores_parameter_type() {
        let policy = PlaceholderPolicy::default();
        let flag = FunctionParameter::new("enabled", true).with_type("boolean");
        assert_eq!(policy.render(&flag).unwrap(), "\"test\"");
    }

    #[test]
    fn type_aware_policy_uses_table_then_fallback() {
        let mut overrides = BTreeMap::new();
        overrides.insert("slack#/types/user_id".to_string(), json!("U0123"));
        let policy = PlaceholderPolicy::type_aware(json!("test"), overrides);
        let render = |type_id: &str| {
            policy.render(&FunctionParameter::new("p", true).with_type(type_id)).unwrap()
        };
        assert_eq!(render("boolean"), "true");
        assert_eq!(render("integer"), "0");
        assert_eq!(render("object"), "{}");
        assert_eq!(render("array"), "[]");
        assert_eq!(render("slack#/types/user_id"), "\"U0123\"");
        assert_eq!(render("slack#/types/channel_id"), "\"test\"");
    }

    #[test]
    fn overrides_replace_primitive_defaults() {
        let mut overrides = BTreeMap::new();
        overrides.insert("integer".to_string(), json!(42));
        let policy = PlaceholderPolicy::type_aware(json!("x"), overrides);
        let parameter = FunctionParameter::new("count", true).with_type("integer");
        assert_eq!(policy.value_for(&parameter), &json!(42));
    }
}
