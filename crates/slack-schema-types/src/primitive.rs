// crates/slack-schema-types/src/primitive.rs
// ============================================================================
// Module: Primitive Schema Types
// Description: The `SchemaTypes` primitives understood by the Slack SDK.
// Purpose: Map raw primitive type ids to a closed, ordered enum.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! [`PrimitiveType`] is the closed set of primitive type ids (`string`,
//! `boolean`, `integer`, `number`, `object`, `array`). Each variant's wire id
//! is also its member name on the SDK `SchemaTypes` binding.

use serde::Serialize;

/// Primitive schema type exposed through the SDK `SchemaTypes` binding.
///
/// # Invariants
/// - [`PrimitiveType::as_str`] returns the wire id, which is also the member
///   name on `SchemaTypes`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimitiveType {
    /// UTF-8 string.
    String,
    /// Boolean flag.
    Boolean,
    /// Integer number.
    Integer,
    /// Arbitrary number.
    Number,
    /// JSON object.
    Object,
    /// JSON array.
    Array,
}

impl PrimitiveType {
    /// All primitive types in declaration order.
    pub const ALL: [Self; 6] =
        [Self::String, Self::Boolean, Self::Integer, Self::Number, Self::Object, Self::Array];

    /// Returns the wire id for the primitive.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Object => "object",
            Self::Array => "array",
        }
    }

    /// Parses a wire id into a primitive type.
    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|primitive| primitive.as_str() == id)
    }
}
