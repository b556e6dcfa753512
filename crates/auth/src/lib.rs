//! `rolegate-auth` — role documents and the access evaluation engine.
//!
//! Roles enter through [`parse_role`] (JSON or YAML, schema-validated,
//! defaulted) and are combined into a [`RoleSet`] that answers two questions:
//! may login L reach server S, and may an actor perform action A on resource
//! kind R in namespace N. No IO, no storage, no transport.

pub mod authorize;
pub mod duration;
pub mod parse;
pub mod permissions;
pub mod roles;
pub mod schema;
pub mod server;

pub use authorize::{AccessExplanation, DenialKind, RoleSet, RoleVerdict};
pub use duration::{DurationParseError, SessionTtl};
pub use parse::{builtin_schema, document_to_value, marshal_role, parse_role};
pub use permissions::{
    ACTION_READ, ACTION_WRITE, ADMIN_RESOURCES, ANY, KIND_CERT_AUTHORITY, KIND_NODE, KIND_OIDC,
    KIND_REVERSE_TUNNEL, KIND_ROLE, KIND_SESSION, KIND_TRUSTED_CLUSTER, KIND_USER, NONE, V2, ro, rw,
};
pub use roles::{RoleAccess, RoleConditionType, RoleSpecV2, RoleV2};
pub use schema::{BUILTIN_SPEC_FIELDS, CompiledSchema, RoleSchema, schema_for, unmarshal_with_schema};
pub use server::Server;

pub use rolegate_core::{
    DEFAULT_NAMESPACE, ErrorKind, Metadata, RbacError, RbacResult, WILDCARD,
    dedup_preserving_order, match_namespace, match_rule,
};
