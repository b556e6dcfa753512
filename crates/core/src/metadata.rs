//! Resource identity shared by roles and servers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{RbacError, RbacResult};

/// Namespace used when a resource does not name one.
pub const DEFAULT_NAMESPACE: &str = "default";

/// Identifies a resource: name, namespace and optional descriptive labels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub namespace: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
}

impl Metadata {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn with_labels<I, K, V>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.labels = labels
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self
    }

    /// Namespace to evaluate against: the stored one, or the default if unset.
    pub fn effective_namespace(&self) -> &str {
        if self.namespace.is_empty() {
            DEFAULT_NAMESPACE
        } else {
            &self.namespace
        }
    }

    /// Enforce required fields and fill in defaults.
    ///
    /// After a successful call `name` is non-empty and `namespace` is never
    /// the empty string.
    pub fn check_and_set_defaults(&mut self) -> RbacResult<()> {
        if self.name.is_empty() {
            return Err(RbacError::validation("name", "name is required"));
        }
        if self.namespace.is_empty() {
            self.namespace = DEFAULT_NAMESPACE.to_string();
        }
        Ok(())
    }
}
