use crate::evaluator::{PermissionEvaluator, PermissionPolicy};
use crate::identity::{Identity, Membership};
use crate::permission::ModulePermissions;
use crate::scope::{AvailableScope, ScopeId};

/// `AccessContext` is a read-only snapshot of everything that decides what the
/// signed-in user may see: identity, memberships, the scope set, the active
/// scope and the module permissions for that scope.
///
/// It is rebuilt from the live session on every navigation and never cached
/// across a scope switch.
#[derive(Debug, Clone, Default)]
pub struct AccessContext {
    identity: Option<Identity>,
    memberships: Vec<Membership>,
    available_scopes: Vec<AvailableScope>,
    active_scope_id: Option<ScopeId>,
    permissions: ModulePermissions,
    policy: PermissionPolicy,
}

impl AccessContext {
    /// Create a new `AccessContext` builder
    #[must_use]
    pub fn builder() -> AccessContextBuilder {
        AccessContextBuilder::default()
    }

    /// Context with no identity; every module-gated check follows the policy
    /// against an empty map.
    #[must_use]
    pub fn anonymous() -> Self {
        AccessContextBuilder::default().build()
    }

    #[must_use]
    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    #[must_use]
    pub fn is_superuser(&self) -> bool {
        self.identity.as_ref().is_some_and(|i| i.is_superuser)
    }

    #[must_use]
    pub fn memberships(&self) -> &[Membership] {
        &self.memberships
    }

    #[must_use]
    pub fn available_scopes(&self) -> &[AvailableScope] {
        &self.available_scopes
    }

    #[must_use]
    pub fn active_scope_id(&self) -> Option<&ScopeId> {
        self.active_scope_id.as_ref()
    }

    /// The active scope resolved against the available set.
    #[must_use]
    pub fn active_scope(&self) -> Option<&AvailableScope> {
        let id = self.active_scope_id.as_ref()?;
        self.available_scopes.iter().find(|s| &s.id == id)
    }

    #[must_use]
    pub fn permissions(&self) -> &ModulePermissions {
        &self.permissions
    }

    #[must_use]
    pub fn policy(&self) -> PermissionPolicy {
        self.policy
    }

    /// True when there is something to configure within a scope: the identity
    /// holds at least one membership and the scope list is non-empty.
    #[must_use]
    pub fn has_scope_access(&self) -> bool {
        !self.memberships.is_empty() && !self.available_scopes.is_empty()
    }

    #[must_use]
    pub fn evaluator(&self) -> PermissionEvaluator<'_> {
        PermissionEvaluator::new(self.is_superuser(), &self.permissions, self.policy)
    }
}

#[derive(Default)]
pub struct AccessContextBuilder {
    identity: Option<Identity>,
    memberships: Vec<Membership>,
    available_scopes: Vec<AvailableScope>,
    active_scope_id: Option<ScopeId>,
    permissions: ModulePermissions,
    policy: PermissionPolicy,
}

impl AccessContextBuilder {
    #[must_use]
    pub fn identity(mut self, identity: Identity) -> Self {
        self.identity = Some(identity);
        self
    }

    #[must_use]
    pub fn memberships(mut self, memberships: Vec<Membership>) -> Self {
        self.memberships = memberships;
        self
    }

    #[must_use]
    pub fn available_scopes(mut self, scopes: Vec<AvailableScope>) -> Self {
        self.available_scopes = scopes;
        self
    }

    #[must_use]
    pub fn active_scope_id(mut self, scope_id: Option<ScopeId>) -> Self {
        self.active_scope_id = scope_id;
        self
    }

    #[must_use]
    pub fn permissions(mut self, permissions: ModulePermissions) -> Self {
        self.permissions = permissions;
        self
    }

    #[must_use]
    pub fn policy(mut self, policy: PermissionPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn build(self) -> AccessContext {
        AccessContext {
            identity: self.identity,
            memberships: self.memberships,
            available_scopes: self.available_scopes,
            active_scope_id: self.active_scope_id,
            permissions: self.permissions,
            policy: self.policy,
        }
    }
}
