//! Active scope tracking.
//!
//! The stored active scope id is read once at construction. A switch persists
//! before the in-memory value changes, then bumps the scope epoch so that
//! anything keyed on the old scope knows to reload.

use console_security::{ScopeId, ScopeType};
use console_session::{SessionStore, StorageError};
use parking_lot::RwLock;
use tokio::sync::watch;

/// Outcome of [`ScopeContext::switch_scope`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeSwitch {
    pub scope_id: ScopeId,
    /// Epoch after the switch; strictly greater than before it.
    pub epoch: u64,
    /// Every scope-dependent view must be rebuilt from scratch. Always `true`:
    /// permissions, scopes and cached lists all belong to the old scope.
    pub reload_required: bool,
}

pub struct ScopeContext {
    store: SessionStore,
    active: RwLock<Option<ScopeId>>,
    epoch: watch::Sender<u64>,
}

impl std::fmt::Debug for ScopeContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScopeContext")
            .field("active", &*self.active.read())
            .field("epoch", &*self.epoch.borrow())
            .finish_non_exhaustive()
    }
}

impl ScopeContext {
    #[must_use]
    pub fn new(store: SessionStore) -> Self {
        let active = store.active_scope_id();
        let (epoch, _) = watch::channel(0);
        Self {
            store,
            active: RwLock::new(active),
            epoch,
        }
    }

    #[must_use]
    pub fn active_scope_id(&self) -> Option<ScopeId> {
        self.active.read().clone()
    }

    #[must_use]
    pub fn epoch(&self) -> u64 {
        *self.epoch.borrow()
    }

    /// Receiver that observes every scope switch.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.epoch.subscribe()
    }

    /// Make `scope_id` the active scope.
    ///
    /// Both the explicit key and the combined `{mode, scope_type, scope_id, label}`
    /// record are written before the in-memory value changes. No permission or
    /// scope re-fetch happens here.
    ///
    /// # Errors
    /// Returns [`StorageError`] if persisting fails; the active scope is then unchanged.
    pub fn switch_scope(
        &self,
        scope_id: impl Into<ScopeId>,
        scope_type: ScopeType,
        label: &str,
    ) -> Result<ScopeSwitch, StorageError> {
        let scope_id = scope_id.into();
        self.store.set_active_scope_id(&scope_id, scope_type, label)?;
        *self.active.write() = Some(scope_id.clone());

        self.epoch.send_modify(|epoch| *epoch += 1);
        let epoch = self.epoch();
        tracing::info!(scope_id = %scope_id, scope_type = %scope_type, epoch, "active scope switched");

        Ok(ScopeSwitch {
            scope_id,
            epoch,
            reload_required: true,
        })
    }

    /// Persist a scope chosen by the session check. Same storage effect as a
    /// switch but without an epoch bump: nothing scope-dependent exists yet.
    pub(crate) fn adopt(
        &self,
        scope_id: &ScopeId,
        scope_type: ScopeType,
        label: &str,
    ) -> Result<(), StorageError> {
        self.store.set_active_scope_id(scope_id, scope_type, label)?;
        *self.active.write() = Some(scope_id.clone());
        tracing::debug!(scope_id = %scope_id, "active scope selected");
        Ok(())
    }

    /// In-memory only; used when the server names a scope whose type is unknown locally.
    pub(crate) fn adopt_transient(&self, scope_id: ScopeId) {
        *self.active.write() = Some(scope_id);
    }

    /// Forget the active scope in memory. Storage is cleared by the auth logout path.
    pub(crate) fn reset(&self) {
        *self.active.write() = None;
    }
}
