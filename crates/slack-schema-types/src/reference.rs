// crates/slack-schema-types/src/reference.rs
// ============================================================================
// Module: Type References
// Description: Classification of raw parameter type ids.
// Purpose: Decide how a generated module spells a type and what it imports.
// Dependencies: serde_json
// ============================================================================

//! ## Overview
//! Parameter records carry raw type ids such as `string`,
//! `slack#/types/user_id`, or `slack#/types/credential/oauth`. [`TypeRef`]
//! turns an id into the TypeScript expression generated code uses and names
//! the [`TypeModule`] binding that expression depends on.
//!
//! Resolution order: primitive, registered custom type, public Slack type,
//! unknown. Unknown ids render as quoted string literals and need no import.

use std::fmt;

use crate::custom::CustomTypeDefinition;
use crate::custom::find_custom_type;
use crate::primitive::PrimitiveType;

/// Prefix shared by every public Slack type id.
pub const SLACK_TYPE_PREFIX: &str = "slack#/types/";

// ============================================================================
// SECTION: Types
// ============================================================================

/// Binding a generated module imports to reference a type.
///
/// # Invariants
/// - Ordering matches the order type imports are emitted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TypeModule {
    /// `SchemaTypes` default import.
    SchemaTypes,
    /// `SlackTypes` default import.
    SlackTypes,
    /// `InternalSlackTypes` named import.
    InternalSlackTypes,
}

impl TypeModule {
    /// Returns the binding name used in generated code.
    #[must_use]
    pub const fn binding(self) -> &'static str {
        match self {
            Self::SchemaTypes => "SchemaTypes",
            Self::SlackTypes => "SlackTypes",
            Self::InternalSlackTypes => "InternalSlackTypes",
        }
    }
}

/// Classified type id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    /// `SchemaTypes` primitive.
    Primitive(PrimitiveType),
    /// Registered custom type.
    Custom(&'static CustomTypeDefinition),
    /// Public Slack type; holds the member name after the prefix.
    Slack(String),
    /// Anything else; holds the raw id.
    Unknown(String),
}

impl TypeRef {
    /// Classifies a raw type id.
    #[must_use]
    pub fn parse(id: &str) -> Self {
        if let Some(primitive) = PrimitiveType::from_id(id) {
            return Self::Primitive(primitive);
        }
        if let Some(definition) = find_custom_type(id) {
            return Self::Custom(definition);
        }
        match id.strip_prefix(SLACK_TYPE_PREFIX) {
            Some(name) if is_typescript_identifier(name) => Self::Slack(name.to_string()),
            _ => Self::Unknown(id.to_string()),
        }
    }

    /// Returns the binding this reference needs imported, if any.
    #[must_use]
    pub const fn module(&self) -> Option<TypeModule> {
        match self {
            Self::Primitive(_) => Some(TypeModule::SchemaTypes),
            Self::Custom(_) => Some(TypeModule::InternalSlackTypes),
            Self::Slack(_) => Some(TypeModule::SlackTypes),
            Self::Unknown(_) => None,
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(primitive) => {
                write!(formatter, "{}.{}", TypeModule::SchemaTypes.binding(), primitive.as_str())
            }
            Self::Custom(definition) => write!(
                formatter,
                "{}.{}",
                TypeModule::InternalSlackTypes.binding(),
                definition.registry_key
            ),
            Self::Slack(name) => write!(formatter, "{}.{name}", TypeModule::SlackTypes.binding()),
            Self::Unknown(id) => formatter.write_str(&typescript_string_literal(id)?),
        }
    }
}

// ============================================================================
// SECTION: Identifiers
// ============================================================================

/// Renders `value` as a double-quoted TypeScript string literal.
///
/// JSON string escaping is valid TypeScript string syntax.
///
/// # Errors
///
/// Returns [`fmt::Error`] if the value cannot be encoded.
pub fn typescript_string_literal(value: &str) -> Result<String, fmt::Error> {
    serde_json::to_string(value).map_err(|_| fmt::Error)
}

/// Returns true when `value` is a plain TypeScript identifier
/// (`[A-Za-z_$][A-Za-z0-9_$]*`).
#[must_use]
pub fn is_typescript_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' || first == '$' => {}
        _ => return false,
    }
    chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '$')
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "Test fixtures use unwraps for clarity.")]

    use super::*;
    use crate::custom::OAUTH_TYPE;
    use crate::custom::OAUTH_TYPE_ID;

    #[test]
    fn primitives_render_through_schema_types() {
        let reference = TypeRef::parse("boolean");
        assert_eq!(reference, TypeRef::Primitive(PrimitiveType::Boolean));
        assert_eq!(reference.to_string(), "SchemaTypes.boolean");
        assert_eq!(reference.module(), Some(TypeModule::SchemaTypes));
    }

    #[test]
    fn slack_types_render_through_slack_types() {
        let reference = TypeRef::parse("slack#/types/channel_id");
        assert_eq!(reference.to_string(), "SlackTypes.channel_id");
        assert_eq!(reference.module(), Some(TypeModule::SlackTypes));
    }

    #[test]
    fn oauth_resolves_to_internal_binding_before_slack_prefix() {
        let reference = TypeRef::parse(OAUTH_TYPE_ID);
        assert_eq!(reference, TypeRef::Custom(&OAUTH_TYPE));
        assert_eq!(reference.to_string(), "InternalSlackTypes.oauth2");
        assert_eq!(reference.module(), Some(TypeModule::InternalSlackTypes));
    }

    #[test]
    fn unknown_ids_render_as_string_literals() {
        let nested = TypeRef::parse("slack#/types/custom/thing");
        assert_eq!(nested.to_string(), "\"slack#/types/custom/thing\"");
        assert_eq!(nested.module(), None);
        let other = TypeRef::parse("#/types/my_type");
        assert_eq!(other, TypeRef::Unknown("#/types/my_type".to_string()));
    }

    #[test]
    fn string_literals_escape_quotes_and_newlines() {
        assert_eq!(typescript_string_literal("plain").unwrap(), "\"plain\"");
        assert_eq!(typescript_string_literal("say \"hi\"\n").unwrap(), "\"say \\\"hi\\\"\\n\"");
    }

    #[test]
    fn identifier_rules() {
        assert!(is_typescript_identifier("user_id"));
        assert!(is_typescript_identifier("$value"));
        assert!(is_typescript_identifier("_x1"));
        assert!(!is_typescript_identifier(""));
        assert!(!is_typescript_identifier("1st"));
        assert!(!is_typescript_identifier("bad-name"));
        assert!(!is_typescript_identifier("has space"));
    }

    #[test]
    fn module_ordering_follows_import_order() {
        assert!(TypeModule::SchemaTypes < TypeModule::SlackTypes);
        assert!(TypeModule::SlackTypes < TypeModule::InternalSlackTypes);
    }
}
