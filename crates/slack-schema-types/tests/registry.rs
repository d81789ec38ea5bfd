// crates/slack-schema-types/tests/registry.rs
// ============================================================================
// Module: Custom Type Registry Tests
// Description: Cross-check registered custom types against type references.
// Purpose: Ensure every registered type resolves and renders consistently.
// Dependencies: slack-schema-types
// ============================================================================

//! Registry consistency tests for custom Slack types.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::missing_docs_in_private_items,
    reason = "Test-only registry checks use panic-based assertions."
)]

use slack_schema_types::CUSTOM_TYPES;
use slack_schema_types::TypeModule;
use slack_schema_types::TypeRef;
use slack_schema_types::is_typescript_identifier;

#[test]
fn every_custom_type_resolves_to_internal_binding() {
    for definition in CUSTOM_TYPES {
        let reference = TypeRef::parse(definition.id);
        assert_eq!(reference.module(), Some(TypeModule::InternalSlackTypes), "{}", definition.id);
        assert_eq!(reference.to_string(), format!("InternalSlackTypes.{}", definition.registry_key));
    }
}

#[test]
fn every_custom_type_has_identifier_bindings() {
    for definition in CUSTOM_TYPES {
        assert!(is_typescript_identifier(definition.registry_key), "{}", definition.id);
        assert!(is_typescript_identifier(definition.id_binding), "{}", definition.id);
        assert!(is_typescript_identifier(definition.type_binding), "{}", definition.id);
    }
}

#[test]
fn rendered_modules_export_declared_bindings() {
    for definition in CUSTOM_TYPES {
        let module = definition.render_typescript().unwrap();
        let id_export = format!("export const {} = \"{}\";", definition.id_binding, definition.id);
        let type_export = format!("export const {} = DefineType({{", definition.type_binding);
        assert!(module.contains(&id_export), "missing id export for {}", definition.id);
        assert!(module.contains(&type_export), "missing type export for {}", definition.id);
        assert!(module.ends_with("});\n"));
    }
}

#[test]
fn json_schema_ids_match_registry_ids() {
    for definition in CUSTOM_TYPES {
        let schema = definition.to_json_schema();
        assert_eq!(schema["$id"].as_str(), Some(definition.id));
        let required = schema["required"].as_array().unwrap();
        assert_eq!(required.len(), definition.required.len());
    }
}
