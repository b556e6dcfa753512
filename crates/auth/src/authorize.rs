use std::sync::Arc;

use serde::Serialize;

use rolegate_core::{LabelSelector, RbacError, RbacResult, match_login, match_namespace};

use crate::roles::RoleV2;
use crate::server::Server;

/// Roles that apply to one principal, unioned for every decision.
///
/// Adding a role can only widen access. A set shared across threads must not
/// be mutated; build a new set (see [`RoleSet::with_role`]) when roles change.
#[derive(Debug, Clone, Default)]
pub struct RoleSet {
    roles: Vec<Arc<RoleV2>>,
}

impl RoleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of this set with `role` appended.
    pub fn with_role(&self, role: impl Into<Arc<RoleV2>>) -> Self {
        let mut roles = self.roles.clone();
        roles.push(role.into());
        Self { roles }
    }

    pub fn push(&mut self, role: impl Into<Arc<RoleV2>>) {
        self.roles.push(role.into());
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RoleV2> {
        self.roles.iter().map(|role| role.as_ref())
    }

    /// Authorize `login` on `server`.
    ///
    /// Granted if any single role matches the server's namespace, its labels
    /// and the login. Stops at the first such role.
    pub fn check_access_to_server(&self, login: &str, server: &Server) -> RbacResult<()> {
        match self
            .iter()
            .find(|role| server_denial(role, login, server).is_none())
        {
            Some(role) => {
                tracing::debug!(
                    role = %role.metadata.name,
                    login,
                    server = %server.name(),
                    "server access granted"
                );
                Ok(())
            }
            None => {
                tracing::debug!(
                    login,
                    server = %server.name(),
                    namespace = %server.namespace(),
                    roles = self.len(),
                    "server access denied"
                );
                Err(RbacError::access_denied(format!(
                    "login {login:?} is not allowed on server {:?}",
                    server.name()
                )))
            }
        }
    }

    /// Authorize `action` on resources of kind `resource` in `namespace`.
    ///
    /// `namespace` is taken literally; no defaulting applies.
    pub fn check_resource_action(
        &self,
        namespace: &str,
        resource: &str,
        action: &str,
    ) -> RbacResult<()> {
        match self
            .iter()
            .find(|role| resource_denial(role, namespace, resource, action).is_none())
        {
            Some(role) => {
                tracing::debug!(
                    role = %role.metadata.name,
                    namespace,
                    resource,
                    action,
                    "resource action granted"
                );
                Ok(())
            }
            None => {
                tracing::debug!(
                    namespace,
                    resource,
                    action,
                    roles = self.len(),
                    "resource action denied"
                );
                Err(RbacError::access_denied(format!(
                    "{action} on {resource} in namespace {namespace:?} is not allowed"
                )))
            }
        }
    }

    /// Explain a server access decision role by role.
    ///
    /// Agrees with [`RoleSet::check_access_to_server`] for every query.
    pub fn explain_access_to_server(&self, login: &str, server: &Server) -> AccessExplanation {
        AccessExplanation::from_verdicts(
            format!("login {login} on server {} ({})", server.name(), server.namespace()),
            self.iter().map(|role| RoleVerdict {
                role: role.metadata.name.clone(),
                denial: server_denial(role, login, server),
            }),
        )
    }

    /// Explain a resource action decision role by role.
    pub fn explain_resource_action(
        &self,
        namespace: &str,
        resource: &str,
        action: &str,
    ) -> AccessExplanation {
        AccessExplanation::from_verdicts(
            format!("{action} on {resource} in namespace {namespace}"),
            self.iter().map(|role| RoleVerdict {
                role: role.metadata.name.clone(),
                denial: resource_denial(role, namespace, resource, action),
            }),
        )
    }
}

impl FromIterator<RoleV2> for RoleSet {
    fn from_iter<I: IntoIterator<Item = RoleV2>>(iter: I) -> Self {
        Self {
            roles: iter.into_iter().map(Arc::new).collect(),
        }
    }
}

impl FromIterator<Arc<RoleV2>> for RoleSet {
    fn from_iter<I: IntoIterator<Item = Arc<RoleV2>>>(iter: I) -> Self {
        Self {
            roles: iter.into_iter().collect(),
        }
    }
}

/// First conjunct that keeps `role` from granting `login` on `server`.
fn server_denial(role: &RoleV2, login: &str, server: &Server) -> Option<DenialKind> {
    if !match_namespace(&role.spec.namespaces, server.namespace()) {
        return Some(DenialKind::NamespaceMismatch);
    }
    if !LabelSelector::from_map(&role.spec.node_labels).matches(server.labels()) {
        return Some(DenialKind::LabelMismatch);
    }
    if !match_login(&role.spec.logins, login) {
        return Some(DenialKind::LoginNotAllowed);
    }
    None
}

/// First conjunct that keeps `role` from granting `action` on `resource`.
fn resource_denial(
    role: &RoleV2,
    namespace: &str,
    resource: &str,
    action: &str,
) -> Option<DenialKind> {
    if !match_namespace(&role.spec.namespaces, namespace) {
        return Some(DenialKind::NamespaceMismatch);
    }
    let Some(actions) = role.spec.resources.get(resource) else {
        return Some(DenialKind::ResourceNotGranted);
    };
    if !actions.iter().any(|a| a == action) {
        return Some(DenialKind::ActionNotGranted);
    }
    None
}

// ─────────────────────────────────────────────────────────────────────────────
// Decision explanation (audit trail)
// ─────────────────────────────────────────────────────────────────────────────

/// Why a single role did not grant the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialKind {
    NamespaceMismatch,
    LabelMismatch,
    LoginNotAllowed,
    ResourceNotGranted,
    ActionNotGranted,
}

/// Outcome of one role for one query. `denial` is `None` if the role grants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleVerdict {
    pub role: String,
    pub denial: Option<DenialKind>,
}

impl RoleVerdict {
    pub fn grants(&self) -> bool {
        self.denial.is_none()
    }
}

/// Detailed, serializable account of an authorization decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessExplanation {
    /// Human-readable description of the query.
    pub query: String,

    pub granted: bool,

    /// First role (in set order) that grants the query.
    pub granted_by: Option<String>,

    pub verdicts: Vec<RoleVerdict>,
}

impl AccessExplanation {
    fn from_verdicts(query: String, verdicts: impl Iterator<Item = RoleVerdict>) -> Self {
        let verdicts: Vec<RoleVerdict> = verdicts.collect();
        let granted_by = verdicts
            .iter()
            .find(|v| v.grants())
            .map(|v| v.role.clone());
        Self {
            query,
            granted: granted_by.is_some(),
            granted_by,
            verdicts,
        }
    }
}
