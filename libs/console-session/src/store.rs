use std::sync::Arc;

use console_security::{Identity, ScopeId, ScopeType};
use serde::{Deserialize, Serialize};

use crate::secret::TokenSecret;
use crate::storage::{DurableStorage, StorageError};

/// Storage key names. They match the keys existing browser sessions use.
pub mod keys {
    pub const ACCESS_TOKEN: &str = "accessToken";
    pub const REFRESH_TOKEN: &str = "refreshToken";
    pub const USER: &str = "user";
    pub const ACTIVE_SCOPE_ID: &str = "activeScopeId";
    /// Legacy combined record `{mode, scope_type, scope_id, label}`.
    pub const ACTIVE: &str = "active";

    pub const ALL: [&str; 5] = [ACCESS_TOKEN, REFRESH_TOKEN, USER, ACTIVE_SCOPE_ID, ACTIVE];
}

const SCOPE_MODE: &str = "SCOPE";

/// Access and refresh tokens; `None` means the token is absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tokens {
    pub access_token: Option<TokenSecret>,
    pub refresh_token: Option<TokenSecret>,
}

impl Tokens {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.access_token.is_none() && self.refresh_token.is_none()
    }
}

/// Legacy combined active-scope record.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ActiveRecord {
    mode: String,
    scope_type: String,
    scope_id: serde_json::Value,
    label: String,
}

/// Durable session state: tokens, cached identity and the active scope.
///
/// The store has no network side effects. Reads never fail: a missing or
/// malformed value reads as absent.
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn DurableStorage>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore").finish_non_exhaustive()
    }
}

impl SessionStore {
    pub fn new(storage: Arc<dyn DurableStorage>) -> Self {
        Self { storage }
    }

    /// Store backed by [`MemoryStorage`](crate::MemoryStorage).
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(crate::storage::MemoryStorage::new()))
    }

    #[must_use]
    pub fn tokens(&self) -> Tokens {
        Tokens {
            access_token: self.read_non_empty(keys::ACCESS_TOKEN).map(TokenSecret::new),
            refresh_token: self.read_non_empty(keys::REFRESH_TOKEN).map(TokenSecret::new),
        }
    }

    /// Synchronous token-presence check.
    #[must_use]
    pub fn has_access_token(&self) -> bool {
        self.read_non_empty(keys::ACCESS_TOKEN).is_some()
    }

    /// Update tokens. A `None` argument leaves that token unchanged, which
    /// supports refresh responses that only rotate the access token.
    ///
    /// # Errors
    /// Returns [`StorageError`] if the storage backend fails to persist.
    pub fn set_tokens(
        &self,
        access: Option<&str>,
        refresh: Option<&str>,
    ) -> Result<(), StorageError> {
        if let Some(access) = access {
            self.storage.set(keys::ACCESS_TOKEN, access)?;
        }
        if let Some(refresh) = refresh {
            self.storage.set(keys::REFRESH_TOKEN, refresh)?;
        }
        Ok(())
    }

    /// Remove both tokens and every cached identity/scope value.
    ///
    /// Idempotent. Every key is attempted even if an earlier removal fails;
    /// the first failure is returned.
    ///
    /// # Errors
    /// Returns the first [`StorageError`] hit while removing keys.
    pub fn clear_tokens(&self) -> Result<(), StorageError> {
        let mut first_err = None;
        for key in keys::ALL {
            if let Err(e) = self.storage.remove(key) {
                tracing::warn!(key, error = %e, "failed to clear session key");
                if first_err.is_none() {
                    first_err = Some(e);
                }
            }
        }
        first_err.map_or(Ok(()), Err)
    }

    /// Active scope id. The explicit key wins; the legacy combined record is
    /// only consulted when the explicit key is absent.
    #[must_use]
    pub fn active_scope_id(&self) -> Option<ScopeId> {
        if let Some(id) = self.read_non_empty(keys::ACTIVE_SCOPE_ID) {
            return Some(ScopeId::new(id));
        }
        let raw = self.storage.get(keys::ACTIVE)?;
        let record: serde_json::Value = match serde_json::from_str(&raw) {
            Ok(v) => v,
            Err(e) => {
                tracing::debug!(error = %e, "ignoring unparsable legacy active-scope record");
                return None;
            }
        };
        record.get("scope_id").and_then(ScopeId::from_json)
    }

    /// Persist the active scope under both the explicit key and the legacy
    /// combined record so either reader succeeds.
    ///
    /// If the legacy write fails the explicit key is restored, so the two keys
    /// never disagree.
    ///
    /// # Errors
    /// Returns [`StorageError`] if either write fails.
    pub fn set_active_scope_id(
        &self,
        scope_id: &ScopeId,
        scope_type: ScopeType,
        label: &str,
    ) -> Result<(), StorageError> {
        let record = ActiveRecord {
            mode: SCOPE_MODE.to_owned(),
            scope_type: scope_type.as_str().to_owned(),
            scope_id: scope_id.to_json(),
            label: label.to_owned(),
        };
        let encoded = serde_json::to_string(&record)?;

        let previous = self.storage.get(keys::ACTIVE_SCOPE_ID);
        self.storage.set(keys::ACTIVE_SCOPE_ID, scope_id.as_str())?;
        if let Err(e) = self.storage.set(keys::ACTIVE, &encoded) {
            let restored = match &previous {
                Some(old) => self.storage.set(keys::ACTIVE_SCOPE_ID, old),
                None => self.storage.remove(keys::ACTIVE_SCOPE_ID),
            };
            if let Err(rollback) = restored {
                tracing::warn!(error = %rollback, "failed to restore active scope id");
            }
            return Err(e);
        }
        Ok(())
    }

    /// Identity cached at login, if any and if it still parses.
    #[must_use]
    pub fn cached_user(&self) -> Option<Identity> {
        let raw = self.storage.get(keys::USER)?;
        serde_json::from_str(&raw).ok()
    }

    /// # Errors
    /// Returns [`StorageError`] if the identity cannot be encoded or persisted.
    pub fn set_cached_user(&self, identity: &Identity) -> Result<(), StorageError> {
        let encoded = serde_json::to_string(identity)?;
        self.storage.set(keys::USER, &encoded)
    }

    fn read_non_empty(&self, key: &str) -> Option<String> {
        self.storage.get(key).filter(|v| !v.trim().is_empty())
    }
}
