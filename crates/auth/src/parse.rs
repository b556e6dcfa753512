//! Role document parsing: format detection, schema validation, defaults.

use std::sync::LazyLock;

use serde_json::Value;

use rolegate_core::{RbacError, RbacResult};

use crate::roles::RoleV2;
use crate::schema::{CompiledSchema, RoleSchema, unmarshal_with_schema};

static BUILTIN_SCHEMA: LazyLock<RbacResult<CompiledSchema>> =
    LazyLock::new(|| RoleSchema::base().build());

/// The compiled built-in role schema, shared by every parse.
pub fn builtin_schema() -> RbacResult<&'static CompiledSchema> {
    BUILTIN_SCHEMA.as_ref().map_err(Clone::clone)
}

/// Decode a JSON or YAML document into a JSON value.
///
/// A document whose first non-blank character is `{` is read as JSON,
/// anything else as YAML. Both forms yield the same value for the same
/// content. The top level must be a mapping.
pub fn document_to_value(document: &[u8]) -> RbacResult<Value> {
    let text = std::str::from_utf8(document)
        .map_err(|e| RbacError::invalid_input(format!("document is not UTF-8: {e}")))?;
    let text = text.trim_start_matches('\u{feff}').trim();
    if text.is_empty() {
        return Err(RbacError::invalid_input("empty input"));
    }

    let value: Value = if text.starts_with('{') {
        serde_json::from_str(text).map_err(|e| RbacError::invalid_input(e.to_string()))?
    } else {
        serde_yaml::from_str(text).map_err(|e| RbacError::invalid_input(e.to_string()))?
    };

    if !value.is_object() {
        return Err(RbacError::invalid_input("document must be a mapping"));
    }
    Ok(value)
}

/// Parse and validate a role document.
pub fn parse_role(document: &[u8]) -> RbacResult<RoleV2> {
    let mut role: RoleV2 = unmarshal_with_schema(builtin_schema()?, document)?;
    role.check_and_set_defaults().inspect_err(|e| {
        tracing::debug!(error = %e, "role document failed validation");
    })?;
    Ok(role)
}

/// Serialize a role to its JSON wire form.
pub fn marshal_role(role: &RoleV2) -> RbacResult<Vec<u8>> {
    serde_json::to_vec(role).map_err(|e| RbacError::invalid_input(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::duration::SessionTtl;
    use crate::permissions::{ACTION_READ, ACTION_WRITE, KIND_ROLE, V2};
    use crate::roles::RoleSpecV2;
    use proptest::prelude::*;
    use rolegate_core::{DEFAULT_NAMESPACE, Metadata};
    use std::collections::BTreeMap;

    fn expected_full_role() -> RoleV2 {
        RoleV2 {
            kind: KIND_ROLE.to_string(),
            version: V2.to_string(),
            metadata: Metadata::new("name1").with_namespace(DEFAULT_NAMESPACE),
            spec: RoleSpecV2 {
                max_session_ttl: SessionTtl::from_hours(20),
                node_labels: BTreeMap::from([("a".to_string(), "b".to_string())]),
                namespaces: vec!["system".to_string(), "default".to_string()],
                resources: BTreeMap::from([(
                    "role".to_string(),
                    vec![ACTION_READ.to_string(), ACTION_WRITE.to_string()],
                )]),
                ..Default::default()
            },
        }
    }

    #[test]
    fn empty_input_is_invalid() {
        for doc in ["", "   \n"] {
            let err = parse_role(doc.as_bytes()).unwrap_err();
            assert_eq!(err, RbacError::invalid_input("empty input"));
        }
    }

    #[test]
    fn missing_name_fails_validation() {
        for doc in ["{}", r#"{"kind": "role"}"#, r#"{"metadata": {"name": ""}}"#] {
            let err = parse_role(doc.as_bytes()).unwrap_err();
            assert_eq!(err.to_string(), "failed to validate: name: name is required");
        }
    }

    #[test]
    fn minimal_role_gets_defaults() {
        let role = parse_role(br#"{"kind": "role", "metadata": {"name": "name1"}, "spec": {}}"#)
            .unwrap();
        assert_eq!(role, RoleV2::new("name1", RoleSpecV2::default()).unwrap());
    }

    #[test]
    fn json_and_yaml_parse_identically() {
        let json = br#"{
            "kind": "role",
            "metadata": {"name": "name1"},
            "spec": {
                "max_session_ttl": "20h",
                "node_labels": {"a": "b"},
                "namespaces": ["system", "default"],
                "resources": {"role": ["read", "write"]}
            }
        }"#;
        let yaml = b"kind: role
metadata:
  name: name1
spec:
  max_session_ttl: 20h
  node_labels:
    a: b
  namespaces: [\"system\", \"default\"]
  resources:
    role: [read, write]
";
        let from_json = parse_role(json).unwrap();
        let from_yaml = parse_role(yaml).unwrap();
        assert_eq!(from_json, expected_full_role());
        assert_eq!(from_yaml, from_json);
    }

    #[test]
    fn unparsable_documents_are_invalid_input() {
        for doc in ["{not json", "- just\n- a list\n", "plain scalar", "kind: [unclosed"] {
            let err = parse_role(doc.as_bytes()).unwrap_err();
            assert!(err.is_invalid_input(), "{doc:?}: {err}");
        }
    }

    #[test]
    fn malformed_ttl_is_invalid_input() {
        let err = parse_role(br#"{"metadata": {"name": "n"}, "spec": {"max_session_ttl": "soon"}}"#)
            .unwrap_err();
        assert!(err.is_invalid_input(), "{err}");
    }

    #[test]
    fn overflowing_ttl_is_invalid_input() {
        let err = parse_role(
            br#"{"metadata": {"name": "n"}, "spec": {"max_session_ttl": "94522879700260684295381.999999999999999999h"}}"#,
        )
        .unwrap_err();
        assert!(err.is_invalid_input(), "{err}");
    }

    #[test]
    fn whitespace_name_is_accepted() {
        let role = parse_role(br#"{"metadata": {"name": " "}}"#).unwrap();
        assert_eq!(role.metadata.name, " ");
    }

    #[test]
    fn wrongly_typed_builtin_field_is_a_schema_violation() {
        let err = parse_role(b"metadata:\n  name: n\nspec:\n  namespaces: default\n").unwrap_err();
        assert!(err.is_schema_violation(), "{err}");
    }

    #[test]
    fn serialized_role_reparses_equal() {
        let role = expected_full_role();
        let reparsed = parse_role(&marshal_role(&role).unwrap()).unwrap();
        assert_eq!(reparsed, role);
    }

    fn arb_role() -> impl Strategy<Value = RoleV2> {
        (
            "[a-z][a-z0-9-]{0,12}",
            prop_oneof![Just(String::new()), "[a-z]{1,8}"],
            any::<u64>(),
            prop::collection::vec("[a-z*]{1,6}", 0..4),
            prop::collection::btree_map("[a-z*]{1,6}", "[a-z*]{1,6}", 0..4),
            prop::collection::vec("[a-z*]{1,6}", 0..4),
            prop::collection::btree_map(
                "[a-z_]{1,8}",
                prop::collection::vec(prop_oneof![Just("read".to_string()), Just("write".to_string())], 0..3),
                0..4,
            ),
        )
            .prop_map(|(name, namespace, ttl, logins, node_labels, namespaces, resources)| {
                let mut role = RoleV2 {
                    metadata: Metadata::new(name).with_namespace(namespace),
                    spec: RoleSpecV2 {
                        max_session_ttl: SessionTtl::new(std::time::Duration::from_nanos(ttl)),
                        logins,
                        node_labels,
                        namespaces,
                        resources,
                    },
                    ..Default::default()
                };
                role.check_and_set_defaults().unwrap();
                role
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: parse(serialize(role)) == role.
        #[test]
        fn parse_serialize_round_trip(role in arb_role()) {
            let bytes = marshal_role(&role).unwrap();
            let reparsed = parse_role(&bytes).unwrap();
            prop_assert_eq!(reparsed, role);
        }

        /// Property: the YAML rendering parses to the same role as the JSON one.
        #[test]
        fn yaml_rendering_is_equivalent(role in arb_role()) {
            let yaml = serde_yaml::to_string(&role).unwrap();
            let from_yaml = parse_role(yaml.as_bytes()).unwrap();
            prop_assert_eq!(from_yaml, role);
        }
    }
}
