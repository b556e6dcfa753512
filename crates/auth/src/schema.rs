//! JSON Schema for role documents, extensible with application-defined spec
//! fields.
//!
//! The built-in schema is a structured value. Extensions are merged into the
//! `spec.properties` object after being parsed on their own, so a fragment
//! can only ever add property definitions; it cannot alter the envelope or
//! redefine a built-in field.

use core::fmt;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};

use rolegate_core::{RbacError, RbacResult};

use crate::parse::document_to_value;

/// Spec fields every role document understands.
pub const BUILTIN_SPEC_FIELDS: &[&str] = &[
    "max_session_ttl",
    "logins",
    "node_labels",
    "namespaces",
    "resources",
];

fn builtin_spec_properties() -> Map<String, Value> {
    let properties = json!({
        "max_session_ttl": {"type": ["string", "number"]},
        "logins": {"type": "array", "items": {"type": "string"}},
        "node_labels": {"type": "object", "additionalProperties": {"type": "string"}},
        "namespaces": {"type": "array", "items": {"type": "string"}},
        "resources": {
            "type": "object",
            "additionalProperties": {"type": "array", "items": {"type": "string"}}
        }
    });
    match properties {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Schema under construction: the base document plus extension properties.
#[derive(Debug, Clone, PartialEq)]
pub struct RoleSchema {
    spec_properties: Map<String, Value>,
}

impl RoleSchema {
    /// Schema of the built-in role document.
    pub fn base() -> Self {
        Self {
            spec_properties: builtin_spec_properties(),
        }
    }

    /// Add extension property definitions to `spec`.
    ///
    /// `fragment` must be an object mapping field names to schema objects.
    pub fn with_spec_properties(mut self, fragment: Value) -> RbacResult<Self> {
        let Value::Object(properties) = fragment else {
            return Err(RbacError::invalid_input(
                "schema extension must be an object of property definitions",
            ));
        };

        for (field, definition) in properties {
            if BUILTIN_SPEC_FIELDS.contains(&field.as_str()) {
                return Err(RbacError::invalid_input(format!(
                    "schema extension cannot redefine built-in field {field:?}"
                )));
            }
            if !definition.is_object() {
                return Err(RbacError::invalid_input(format!(
                    "schema extension for {field:?} must be an object"
                )));
            }
            if self.spec_properties.insert(field.clone(), definition).is_some() {
                return Err(RbacError::invalid_input(format!(
                    "schema extension defines {field:?} twice"
                )));
            }
        }
        Ok(self)
    }

    /// Full schema document.
    pub fn to_value(&self) -> Value {
        json!({
            "type": "object",
            "additionalProperties": false,
            "properties": {
                "kind": {"type": "string"},
                "version": {"type": "string"},
                "metadata": {
                    "type": "object",
                    "additionalProperties": false,
                    "properties": {
                        "name": {"type": "string"},
                        "namespace": {"type": "string"},
                        "description": {"type": "string"},
                        "labels": {"type": "object", "additionalProperties": {"type": "string"}}
                    }
                },
                "spec": {
                    "type": "object",
                    "additionalProperties": false,
                    "properties": Value::Object(self.spec_properties.clone())
                }
            }
        })
    }

    /// Compile into a reusable validator.
    pub fn build(&self) -> RbacResult<CompiledSchema> {
        let document = self.to_value();
        let validator = jsonschema::validator_for(&document)
            .map_err(|e| RbacError::invalid_input(format!("invalid schema: {e}")))?;
        Ok(CompiledSchema {
            validator,
            document,
        })
    }
}

impl Default for RoleSchema {
    fn default() -> Self {
        Self::base()
    }
}

/// A compiled role schema. Immutable and shareable across threads.
pub struct CompiledSchema {
    validator: jsonschema::Validator,
    document: Value,
}

impl CompiledSchema {
    pub fn document(&self) -> &Value {
        &self.document
    }

    /// Check `instance` against the schema, reporting every violation.
    pub fn validate(&self, instance: &Value) -> RbacResult<()> {
        let violations: Vec<String> = self
            .validator
            .iter_errors(instance)
            .map(|e| format!("{}: {}", e.instance_path, e))
            .collect();
        if violations.is_empty() {
            Ok(())
        } else {
            Err(RbacError::schema_violation(violations.join("; ")))
        }
    }
}

impl fmt::Debug for CompiledSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledSchema")
            .field("document", &self.document)
            .finish_non_exhaustive()
    }
}

/// Build the role schema extended with `fragment`.
///
/// `fragment` is either a JSON object (`{"a": {"type": "string"}}`) or its
/// bare member list (`"a": {"type": "string"}`). Blank means no extension.
pub fn schema_for(fragment: &str) -> RbacResult<CompiledSchema> {
    let trimmed = fragment.trim();
    if trimmed.is_empty() {
        return RoleSchema::base().build();
    }

    let parsed: Result<Value, _> = if trimmed.starts_with('{') {
        serde_json::from_str(trimmed)
    } else {
        serde_json::from_str(&format!("{{{trimmed}}}"))
    };
    let extension = parsed
        .map_err(|e| RbacError::invalid_input(format!("malformed schema extension: {e}")))?;

    RoleSchema::base().with_spec_properties(extension)?.build()
}

/// Validate `document` against `schema`, then decode it into `T`.
///
/// Nothing is decoded unless the whole document satisfies the schema.
pub fn unmarshal_with_schema<T>(schema: &CompiledSchema, document: &[u8]) -> RbacResult<T>
where
    T: DeserializeOwned,
{
    let value = document_to_value(document)?;
    schema.validate(&value).inspect_err(|e| {
        tracing::debug!(error = %e, "role document rejected by schema");
    })?;
    serde_json::from_value(value).map_err(|e| RbacError::invalid_input(e.to_string()))
}
