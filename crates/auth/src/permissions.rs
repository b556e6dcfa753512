//! Resource kinds, actions and the convenience sets role-editing adapters
//! build rules from.

use rolegate_core::WILDCARD;

/// Document kind of a role.
pub const KIND_ROLE: &str = "role";
/// Document kind of a node (SSH target).
pub const KIND_NODE: &str = "node";
pub const KIND_SESSION: &str = "session";
pub const KIND_USER: &str = "user";
pub const KIND_OIDC: &str = "oidc";
pub const KIND_CERT_AUTHORITY: &str = "cert_authority";
pub const KIND_REVERSE_TUNNEL: &str = "tunnel";
pub const KIND_TRUSTED_CLUSTER: &str = "trusted_cluster";

/// The only document version this crate reads and writes.
pub const V2: &str = "v2";

pub const ACTION_READ: &str = "read";
pub const ACTION_WRITE: &str = "write";

/// Resource kinds that together make up administrative access.
pub const ADMIN_RESOURCES: &[&str] = &[
    KIND_ROLE,
    KIND_USER,
    KIND_OIDC,
    KIND_CERT_AUTHORITY,
    KIND_REVERSE_TUNNEL,
    KIND_TRUSTED_CLUSTER,
    KIND_NODE,
];

/// A grant list that matches every value.
pub const ANY: &[&str] = &[WILDCARD];

/// A grant list that matches nothing.
pub const NONE: &[&str] = &[];

/// Read and write actions.
pub fn rw() -> Vec<String> {
    vec![ACTION_READ.to_string(), ACTION_WRITE.to_string()]
}

/// Read-only action set.
pub fn ro() -> Vec<String> {
    vec![ACTION_READ.to_string()]
}
