//! `rolegate-core` — RBAC foundation building blocks.
//!
//! This crate contains the error taxonomy, resource metadata and the
//! wildcard matching primitives. No IO, no storage, no transport.

pub mod error;
pub mod matching;
pub mod metadata;

pub use error::{ErrorKind, RbacError, RbacResult};
pub use matching::{
    LabelSelector, Segment, WILDCARD, dedup_preserving_order, match_labels, match_login,
    match_namespace, match_rule,
};
pub use metadata::{DEFAULT_NAMESPACE, Metadata};
