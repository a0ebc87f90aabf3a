use serde::{Deserialize, Serialize};

use crate::scope::{AvailableScope, ScopeId, ScopeType};

/// The signed-in user, as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: serde_json::Value,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub is_superuser: bool,
}

impl Identity {
    /// Name shown in the topbar: the username, falling back to the email.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.username.trim().is_empty() {
            &self.email
        } else {
            &self.username
        }
    }
}

/// Grant of a role to the identity within one scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    pub scope_id: ScopeId,
    pub scope_type: ScopeType,
    #[serde(default)]
    pub scope_name: String,
    #[serde(default, alias = "role")]
    pub role_name: String,
}

impl Membership {
    /// The scope this membership grants standing in.
    #[must_use]
    pub fn scope(&self) -> AvailableScope {
        AvailableScope {
            id: self.scope_id.clone(),
            name: self.scope_name.clone(),
            scope_type: self.scope_type,
        }
    }

    /// `"Tower A (SITE)"`-style label written alongside the persisted active scope.
    #[must_use]
    pub fn label(&self) -> String {
        self.scope().label()
    }
}
