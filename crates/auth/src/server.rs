//! Login target evaluated by host-access checks.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use rolegate_core::Metadata;

use crate::permissions::{KIND_NODE, V2};

/// A host that principals log into. Only its namespace and labels take part
/// in authorization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Server {
    #[serde(default)]
    pub kind: String,

    #[serde(default)]
    pub version: String,

    pub metadata: Metadata,
}

impl Server {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            kind: KIND_NODE.to_string(),
            version: V2.to_string(),
            metadata: Metadata::new(name),
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.metadata = self.metadata.with_namespace(namespace);
        self
    }

    pub fn with_labels<I, K, V>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.metadata = self.metadata.with_labels(labels);
        self
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// Stored namespace, or the default namespace if unset.
    pub fn namespace(&self) -> &str {
        self.metadata.effective_namespace()
    }

    pub fn labels(&self) -> &BTreeMap<String, String> {
        &self.metadata.labels
    }
}
