//! Wire models exchanged with the leasing platform API.

use console_security::{AvailableScope, Identity, Membership, ScopeId, ScopeType};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Successful credential exchange.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access: String,
    #[serde(default)]
    pub refresh: Option<String>,
    pub user: Identity,
    #[serde(default)]
    pub memberships: Vec<Membership>,
    #[serde(default, deserialize_with = "optional_scope_id")]
    pub active_scope_id: Option<ScopeId>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RefreshRequest<'a> {
    pub refresh: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RefreshResponse {
    pub access: String,
    /// Present when the server rotates refresh tokens.
    #[serde(default)]
    pub refresh: Option<String>,
}

/// Identity plus memberships for the current token.
#[derive(Debug, Clone, Deserialize)]
pub struct MeResponse {
    pub user: Identity,
    #[serde(default)]
    pub memberships: Vec<Membership>,
    #[serde(default, deserialize_with = "optional_scope_id")]
    pub active_scope_id: Option<ScopeId>,
}

/// Scopes the identity may switch into, plus the broadest level it holds.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AvailableScopesResponse {
    #[serde(default)]
    pub scopes: Vec<AvailableScope>,
    #[serde(default)]
    pub highest_level: Option<ScopeType>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PendingApprovalsResponse {
    pub count: u32,
}

/// `null`, a blank string and a missing field all mean "no active scope".
fn optional_scope_id<'de, D>(deserializer: D) -> Result<Option<ScopeId>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(value) = Option::<serde_json::Value>::deserialize(deserializer)? else {
        return Ok(None);
    };
    if value.is_null() || value.as_str().is_some_and(|s| s.trim().is_empty()) {
        return Ok(None);
    }
    ScopeId::from_json(&value).map(Some).ok_or_else(|| {
        serde::de::Error::custom(format!("active scope id must be a string or number, got: {value}"))
    })
}

/// Error payload shapes the API uses (`{"detail": ".."}` or `{"error": ".."}`).
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorBody {
    pub(crate) fn message(self) -> Option<String> {
        self.detail.or(self.error)
    }
}
