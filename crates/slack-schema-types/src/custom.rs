// crates/slack-schema-types/src/custom.rs
// ============================================================================
// Module: Custom Slack Types
// Description: Static declarations for SDK-registered custom object types.
// Purpose: Provide the OAuth credential type and a lookup registry.
// Dependencies: serde_json
// ============================================================================

//! ## Overview
//! Custom types are object types the SDK registers under its own
//! `InternalSlackTypes` binding rather than the public `SlackTypes` one. Each
//! definition can be viewed as a JSON Schema fragment or rendered as the
//! `DefineType(...)` module the SDK ships.
//!
//! The only registered type today is the OAuth credential type
//! (`slack#/types/credential/oauth`).

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::fmt::Write;

use serde_json::Map;
use serde_json::Value;
use serde_json::json;

use crate::primitive::PrimitiveType;
use crate::reference::typescript_string_literal;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Type id of the OAuth credential custom type.
pub const OAUTH_TYPE_ID: &str = "slack#/types/credential/oauth";

/// Import path of `SchemaTypes` from a custom type module.
const SCHEMA_TYPES_IMPORT: &str = "../../../schema_types.ts";

/// Import path of `DefineType` from a custom type module.
const DEFINE_TYPE_IMPORT: &str = "../../../../types/mod.ts";

// ============================================================================
// SECTION: Types
// ============================================================================

/// Property of a custom object type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyDefinition {
    /// Property key.
    pub name: &'static str,
    /// Primitive type of the property value.
    pub ty: PrimitiveType,
    /// Allowed string values; empty when unconstrained.
    pub allowed_values: &'static [&'static str],
}

/// Static declaration of a custom object type.
///
/// # Invariants
/// - `required` names are a subset of `properties` names.
/// - `registry_key` is a valid TypeScript identifier and names the member on
///   `InternalSlackTypes` as well as the module file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CustomTypeDefinition {
    /// Wire type id.
    pub id: &'static str,
    /// Name of the exported constant holding the type id.
    pub id_binding: &'static str,
    /// Name of the exported type definition.
    pub type_binding: &'static str,
    /// Member name on `InternalSlackTypes`.
    pub registry_key: &'static str,
    /// Base schema type.
    pub base: PrimitiveType,
    /// Declared properties in source order.
    pub properties: &'static [PropertyDefinition],
    /// Required property names.
    pub required: &'static [&'static str],
}

/// OAuth credential type: an object with a required `credential_source`
/// string limited to `"DEVELOPER"`.
pub const OAUTH_TYPE: CustomTypeDefinition = CustomTypeDefinition {
    id: OAUTH_TYPE_ID,
    id_binding: "oAuthTypeId",
    type_binding: "OAuthType",
    registry_key: "oauth2",
    base: PrimitiveType::Object,
    properties: &[PropertyDefinition {
        name: "credential_source",
        ty: PrimitiveType::String,
        allowed_values: &["DEVELOPER"],
    }],
    required: &["credential_source"],
};

/// Registry of every custom type, in registration order.
pub static CUSTOM_TYPES: &[CustomTypeDefinition] = &[OAUTH_TYPE];

/// Looks up a registered custom type by wire id.
#[must_use]
pub fn find_custom_type(id: &str) -> Option<&'static CustomTypeDefinition> {
    CUSTOM_TYPES.iter().find(|definition| definition.id == id)
}

// ============================================================================
// SECTION: Rendering
// ============================================================================

impl CustomTypeDefinition {
    /// Returns the file name of the generated type module.
    #[must_use]
    pub fn module_file_name(&self) -> String {
        format!("{}.ts", self.registry_key)
    }

    /// Returns the JSON Schema view of the type.
    #[must_use]
    pub fn to_json_schema(&self) -> Value {
        let mut properties = Map::new();
        for property in self.properties {
            let mut schema = Map::new();
            schema.insert("type".to_string(), json!(property.ty.as_str()));
            if !property.allowed_values.is_empty() {
                schema.insert("enum".to_string(), json!(property.allowed_values));
            }
            properties.insert(property.name.to_string(), Value::Object(schema));
        }
        json!({
            "$id": self.id,
            "type": self.base.as_str(),
            "properties": properties,
            "required": self.required,
        })
    }

    /// Renders the `DefineType` TypeScript module for the type.
    ///
    /// # Errors
    ///
    /// Returns [`fmt::Error`] if a string literal cannot be encoded.
    pub fn render_typescript(&self) -> Result<String, fmt::Error> {
        let mut out = String::new();
        writeln!(out, "import SchemaTypes from {};", typescript_string_literal(SCHEMA_TYPES_IMPORT)?)?;
        writeln!(
            out,
            "import {{ DefineType }} from {};\n",
            typescript_string_literal(DEFINE_TYPE_IMPORT)?
        )?;
        writeln!(out, "export const {} = {};\n", self.id_binding, typescript_string_literal(self.id)?)?;
        writeln!(out, "export const {} = DefineType({{", self.type_binding)?;
        writeln!(out, "  name: {},", self.id_binding)?;
        writeln!(out, "  type: SchemaTypes.{},", self.base.as_str())?;
        writeln!(out, "  properties: {{")?;
        for property in self.properties {
            writeln!(out, "    {}: {{", property.name)?;
            writeln!(out, "      type: SchemaTypes.{},", property.ty.as_str())?;
            if !property.allowed_values.is_empty() {
                writeln!(out, "      enum: {},", string_array(property.allowed_values)?)?;
            }
            writeln!(out, "    }},")?;
        }
        writeln!(out, "  }},")?;
        writeln!(out, "  required: {},", string_array(self.required)?)?;
        writeln!(out, "}});")?;
        Ok(out)
    }
}

/// Renders a list of strings as a TypeScript array literal.
fn string_array(values: &[&str]) -> Result<String, fmt::Error> {
    let mut items = Vec::with_capacity(values.len());
    for value in values {
        items.push(typescript_string_literal(value)?);
    }
    Ok(format!("[{}]", items.join(", ")))
}
