// crates/slack-schema-types/src/lib.rs
// ============================================================================
// Module: Slack Schema Types Library
// Description: Static schema type declarations shared by Slack code generators.
// Purpose: Provide primitive, Slack, and custom type vocabularies in one place.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! This crate holds the static type vocabulary that generated Slack function
//! sources refer to:
//! - [`PrimitiveType`]: the `SchemaTypes` primitives (`string`, `boolean`, ...).
//! - [`CustomTypeDefinition`]: custom object types registered by the SDK, such
//!   as the OAuth credential type [`OAUTH_TYPE`].
//! - [`TypeRef`]: classification of a raw type id into the binding that a
//!   generated TypeScript module must import to reference it.
//!
//! Declarations are plain `'static` data. Nothing here performs IO.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod custom;
pub mod primitive;
pub mod reference;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use custom::CUSTOM_TYPES;
pub use custom::CustomTypeDefinition;
pub use custom::OAUTH_TYPE;
pub use custom::OAUTH_TYPE_ID;
pub use custom::PropertyDefinition;
pub use custom::find_custom_type;
pub use primitive::PrimitiveType;
pub use reference::SLACK_TYPE_PREFIX;
pub use reference::TypeModule;
pub use reference::TypeRef;
pub use reference::is_typescript_identifier;
pub use reference::typescript_string_literal;
