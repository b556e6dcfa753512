//! The versioned role document and its getter/setter surface.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use rolegate_core::{Metadata, RbacError, RbacResult};

use crate::duration::SessionTtl;
use crate::permissions::{KIND_ROLE, V2};

/// Authorization payload of one role.
///
/// Host access is the conjunction of `namespaces`, `node_labels` and
/// `logins`. API access is `resources`, scoped by the same `namespaces`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleSpecV2 {
    #[serde(default)]
    pub max_session_ttl: SessionTtl,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub logins: Vec<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub node_labels: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub namespaces: Vec<String>,

    /// Resource kind -> permitted actions.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub resources: BTreeMap<String, Vec<String>>,
}

/// Role envelope: `{kind: "role", version: "v2", metadata, spec}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleV2 {
    #[serde(default)]
    pub kind: String,

    #[serde(default)]
    pub version: String,

    #[serde(default)]
    pub metadata: Metadata,

    #[serde(default)]
    pub spec: RoleSpecV2,
}

impl RoleV2 {
    /// Build a validated role.
    pub fn new(name: impl Into<String>, spec: RoleSpecV2) -> RbacResult<Self> {
        let mut role = Self {
            kind: KIND_ROLE.to_string(),
            version: V2.to_string(),
            metadata: Metadata::new(name),
            spec,
        };
        role.check_and_set_defaults()?;
        Ok(role)
    }

    /// Enforce required fields and fill in defaults (kind, version, namespace).
    pub fn check_and_set_defaults(&mut self) -> RbacResult<()> {
        self.metadata.check_and_set_defaults()?;

        if self.kind.is_empty() {
            self.kind = KIND_ROLE.to_string();
        } else if self.kind != KIND_ROLE {
            return Err(RbacError::validation(
                "kind",
                format!("expected {KIND_ROLE:?}, got {:?}", self.kind),
            ));
        }

        if self.version.is_empty() {
            self.version = V2.to_string();
        } else if self.version != V2 {
            return Err(RbacError::validation(
                "version",
                format!("unsupported version {:?}", self.version),
            ));
        }
        Ok(())
    }
}

/// Which condition set an accessor reads or writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleConditionType {
    Allow,
    Deny,
}

/// Field-group accessors used by role-editing adapters.
///
/// Getters return owned copies so an adapter can edit and write back.
pub trait RoleAccess {
    fn name(&self) -> &str;
    fn set_name(&mut self, name: String) -> RbacResult<()>;

    fn max_session_ttl(&self) -> SessionTtl;
    fn set_max_session_ttl(&mut self, ttl: Duration);

    fn logins(&self, condition: RoleConditionType) -> Vec<String>;
    fn set_logins(&mut self, condition: RoleConditionType, logins: Vec<String>) -> RbacResult<()>;

    fn node_labels(&self, condition: RoleConditionType) -> BTreeMap<String, String>;
    fn set_node_labels(
        &mut self,
        condition: RoleConditionType,
        labels: BTreeMap<String, String>,
    ) -> RbacResult<()>;

    fn namespaces(&self, condition: RoleConditionType) -> Vec<String>;
    fn set_namespaces(
        &mut self,
        condition: RoleConditionType,
        namespaces: Vec<String>,
    ) -> RbacResult<()>;

    fn rules(&self, condition: RoleConditionType) -> BTreeMap<String, Vec<String>>;
    fn set_rules(
        &mut self,
        condition: RoleConditionType,
        rules: BTreeMap<String, Vec<String>>,
    ) -> RbacResult<()>;
}

// v2 documents only carry allow grants.
fn allow_only(condition: RoleConditionType) -> RbacResult<()> {
    match condition {
        RoleConditionType::Allow => Ok(()),
        RoleConditionType::Deny => Err(RbacError::invalid_input(
            "v2 roles do not support deny conditions",
        )),
    }
}

impl RoleAccess for RoleV2 {
    fn name(&self) -> &str {
        &self.metadata.name
    }

    fn set_name(&mut self, name: String) -> RbacResult<()> {
        if name.is_empty() {
            return Err(RbacError::validation("name", "name is required"));
        }
        self.metadata.name = name;
        Ok(())
    }

    fn max_session_ttl(&self) -> SessionTtl {
        self.spec.max_session_ttl
    }

    fn set_max_session_ttl(&mut self, ttl: Duration) {
        self.spec.max_session_ttl = SessionTtl::new(ttl);
    }

    fn logins(&self, condition: RoleConditionType) -> Vec<String> {
        match condition {
            RoleConditionType::Allow => self.spec.logins.clone(),
            RoleConditionType::Deny => Vec::new(),
        }
    }

    fn set_logins(&mut self, condition: RoleConditionType, logins: Vec<String>) -> RbacResult<()> {
        allow_only(condition)?;
        self.spec.logins = logins;
        Ok(())
    }

    fn node_labels(&self, condition: RoleConditionType) -> BTreeMap<String, String> {
        match condition {
            RoleConditionType::Allow => self.spec.node_labels.clone(),
            RoleConditionType::Deny => BTreeMap::new(),
        }
    }

    fn set_node_labels(
        &mut self,
        condition: RoleConditionType,
        labels: BTreeMap<String, String>,
    ) -> RbacResult<()> {
        allow_only(condition)?;
        self.spec.node_labels = labels;
        Ok(())
    }

    fn namespaces(&self, condition: RoleConditionType) -> Vec<String> {
        match condition {
            RoleConditionType::Allow => self.spec.namespaces.clone(),
            RoleConditionType::Deny => Vec::new(),
        }
    }

    fn set_namespaces(
        &mut self,
        condition: RoleConditionType,
        namespaces: Vec<String>,
    ) -> RbacResult<()> {
        allow_only(condition)?;
        self.spec.namespaces = namespaces;
        Ok(())
    }

    fn rules(&self, condition: RoleConditionType) -> BTreeMap<String, Vec<String>> {
        match condition {
            RoleConditionType::Allow => self.spec.resources.clone(),
            RoleConditionType::Deny => BTreeMap::new(),
        }
    }

    fn set_rules(
        &mut self,
        condition: RoleConditionType,
        rules: BTreeMap<String, Vec<String>>,
    ) -> RbacResult<()> {
        allow_only(condition)?;
        self.spec.resources = rules;
        Ok(())
    }
}
