use serde::{Deserialize, Serialize};

use crate::permission::{Capability, Module, ModulePermissions};

/// How an empty permission map is interpreted for non-superusers.
///
/// `FailOpen` is the product default: a role whose module rows were never
/// configured is "not yet restricted" and sees every module.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionPolicy {
    #[default]
    FailOpen,
    FailClosed,
}

/// Answers "may the current identity, in the current scope, do X on module M?".
///
/// Borrowing evaluator over the live permission map; build a fresh one for
/// every navigation so that a scope switch is picked up immediately.
#[derive(Debug, Clone, Copy)]
pub struct PermissionEvaluator<'a> {
    is_superuser: bool,
    permissions: &'a ModulePermissions,
    policy: PermissionPolicy,
}

impl<'a> PermissionEvaluator<'a> {
    #[must_use]
    pub fn new(
        is_superuser: bool,
        permissions: &'a ModulePermissions,
        policy: PermissionPolicy,
    ) -> Self {
        Self {
            is_superuser,
            permissions,
            policy,
        }
    }

    #[must_use]
    pub fn is_superuser(&self) -> bool {
        self.is_superuser
    }

    /// Visibility check used by navigation. `None` means the destination has
    /// no module requirement and is always visible.
    #[must_use]
    pub fn can_view(&self, module: Option<&Module>) -> bool {
        self.can(module, Capability::View)
    }

    #[must_use]
    pub fn can(&self, module: Option<&Module>, capability: Capability) -> bool {
        if self.is_superuser {
            return true;
        }
        let Some(module) = module else {
            return true;
        };
        if self.permissions.is_empty() {
            return self.policy == PermissionPolicy::FailOpen;
        }
        self.permissions
            .get(module)
            .is_some_and(|p| p.allows(capability))
    }

    #[must_use]
    pub fn can_create(&self, module: &Module) -> bool {
        self.can(Some(module), Capability::Create)
    }

    #[must_use]
    pub fn can_edit(&self, module: &Module) -> bool {
        self.can(Some(module), Capability::Edit)
    }

    #[must_use]
    pub fn can_delete(&self, module: &Module) -> bool {
        self.can(Some(module), Capability::Delete)
    }

    #[must_use]
    pub fn can_approve(&self, module: &Module) -> bool {
        self.can(Some(module), Capability::Approve)
    }
}
