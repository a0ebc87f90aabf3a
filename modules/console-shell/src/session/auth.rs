//! Authentication state.
//!
//! Status starts as [`AuthStatus::Loading`] and resolves exactly once per
//! [`AuthContext::check_auth`] to `Authenticated` or `Unauthenticated`. Any
//! failure while resolving the session lands on `Unauthenticated`; only a
//! permission fetch failure is tolerated (empty map, policy decides).

use std::sync::Arc;
use std::time::Duration;

use console_api::ConsoleApi;
use console_security::{
    AccessContext, AvailableScope, Identity, Membership, ModulePermissions, PermissionPolicy,
    ScopeId, ScopeType,
};
use console_session::SessionStore;
use parking_lot::RwLock;
use tokio::sync::watch;

use crate::error::ShellError;
use crate::session::scope::ScopeContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStatus {
    Loading,
    Authenticated,
    Unauthenticated,
}

impl AuthStatus {
    #[must_use]
    pub fn is_resolved(self) -> bool {
        !matches!(self, Self::Loading)
    }
}

#[derive(Debug, Clone, Default)]
struct AuthState {
    user: Option<Identity>,
    memberships: Vec<Membership>,
    available_scopes: Vec<AvailableScope>,
    highest_level: Option<ScopeType>,
    permissions: ModulePermissions,
}

pub struct AuthContext {
    api: Arc<dyn ConsoleApi>,
    store: SessionStore,
    scope: Arc<ScopeContext>,
    policy: PermissionPolicy,
    check_timeout: Option<Duration>,
    state: RwLock<AuthState>,
    status: watch::Sender<AuthStatus>,
}

impl std::fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthContext")
            .field("status", &self.status())
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl AuthContext {
    #[must_use]
    pub fn new(
        api: Arc<dyn ConsoleApi>,
        store: SessionStore,
        scope: Arc<ScopeContext>,
        policy: PermissionPolicy,
    ) -> Self {
        let (status, _) = watch::channel(AuthStatus::Loading);
        Self {
            api,
            store,
            scope,
            policy,
            check_timeout: None,
            state: RwLock::new(AuthState::default()),
            status,
        }
    }

    /// Bound the session check; on expiry the status resolves to `Unauthenticated`.
    #[must_use]
    pub fn with_check_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.check_timeout = timeout;
        self
    }

    #[must_use]
    pub fn status(&self) -> AuthStatus {
        *self.status.borrow()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.status() == AuthStatus::Authenticated
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.status() == AuthStatus::Loading
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AuthStatus> {
        self.status.subscribe()
    }

    /// Wait until the status leaves `Loading`.
    pub async fn wait_resolved(&self) -> AuthStatus {
        let mut rx = self.subscribe();
        match rx.wait_for(|s| s.is_resolved()).await {
            Ok(status) => *status,
            // Sender lives in `self`, so this arm is only reachable during teardown.
            Err(_) => self.status(),
        }
    }

    #[must_use]
    pub fn user(&self) -> Option<Identity> {
        self.state.read().user.clone()
    }

    #[must_use]
    pub fn is_superuser(&self) -> bool {
        self.state.read().user.as_ref().is_some_and(|u| u.is_superuser)
    }

    #[must_use]
    pub fn memberships(&self) -> Vec<Membership> {
        self.state.read().memberships.clone()
    }

    #[must_use]
    pub fn available_scopes(&self) -> Vec<AvailableScope> {
        self.state.read().available_scopes.clone()
    }

    #[must_use]
    pub fn highest_level(&self) -> Option<ScopeType> {
        self.state.read().highest_level
    }

    #[must_use]
    pub fn permissions(&self) -> ModulePermissions {
        self.state.read().permissions.clone()
    }

    /// Immutable snapshot for navigation and permission checks.
    #[must_use]
    pub fn access_context(&self) -> AccessContext {
        let state = self.state.read();
        let mut builder = AccessContext::builder()
            .memberships(state.memberships.clone())
            .available_scopes(state.available_scopes.clone())
            .active_scope_id(self.scope.active_scope_id())
            .permissions(state.permissions.clone())
            .policy(self.policy);
        if let Some(user) = &state.user {
            builder = builder.identity(user.clone());
        }
        builder.build()
    }

    /// Resolve the stored session against the API.
    ///
    /// Without a stored token this makes no network call.
    pub async fn check_auth(&self) -> AuthStatus {
        self.status.send_replace(AuthStatus::Loading);

        let outcome = match self.check_timeout {
            Some(limit) => tokio::time::timeout(limit, self.resolve_session())
                .await
                .unwrap_or_else(|_| Err(ShellError::AuthCheckTimedOut(limit))),
            None => self.resolve_session().await,
        };

        let status = match outcome {
            Ok(()) => AuthStatus::Authenticated,
            Err(e) => {
                if e.is_unauthenticated() {
                    tracing::debug!(reason = %e, "no usable session");
                } else {
                    tracing::warn!(error = %e, "session check failed");
                }
                *self.state.write() = AuthState::default();
                AuthStatus::Unauthenticated
            }
        };
        self.status.send_replace(status);
        status
    }

    async fn resolve_session(&self) -> Result<(), ShellError> {
        if !self.api.is_authenticated() {
            return Err(ShellError::NoSession);
        }

        let me = self.api.get_me().await?;
        self.select_restored_scope(me.active_scope_id.as_ref(), &me.memberships)?;
        {
            let mut state = self.state.write();
            state.user = Some(me.user);
            state.memberships = me.memberships;
        }

        let scopes = self.api.get_available_scopes().await?;
        self.reconcile_active_scope(&scopes.scopes)?;
        {
            let mut state = self.state.write();
            state.available_scopes = scopes.scopes;
            state.highest_level = scopes.highest_level;
        }

        self.refresh_permissions().await;
        Ok(())
    }

    /// Stored choice first, then the server's, then the first membership.
    fn select_restored_scope(
        &self,
        server_choice: Option<&ScopeId>,
        memberships: &[Membership],
    ) -> Result<(), ShellError> {
        if self.scope.active_scope_id().is_some() {
            return Ok(());
        }
        self.select_login_scope(server_choice, memberships)
    }

    /// The explicit choice if any, otherwise the first membership.
    fn select_login_scope(
        &self,
        explicit: Option<&ScopeId>,
        memberships: &[Membership],
    ) -> Result<(), ShellError> {
        if let Some(id) = explicit {
            match memberships.iter().find(|m| &m.scope_id == id) {
                Some(m) => self.scope.adopt(id, m.scope_type, &m.label())?,
                None => self.scope.adopt_transient(id.clone()),
            }
            return Ok(());
        }

        if let Some(first) = memberships.first() {
            self.scope
                .adopt(&first.scope_id, first.scope_type, &first.label())?;
        }
        Ok(())
    }

    /// Keep the active scope inside the available set once that set is known.
    fn reconcile_active_scope(&self, available: &[AvailableScope]) -> Result<(), ShellError> {
        let Some(first) = available.first() else {
            return Ok(());
        };

        let current = self.scope.active_scope_id();
        let still_available = current
            .as_ref()
            .and_then(|id| available.iter().find(|s| &s.id == id));

        if let Some(scope) = still_available {
            if self.store.active_scope_id().as_ref() != Some(&scope.id) {
                self.scope.adopt(&scope.id, scope.scope_type, &scope.label())?;
            }
            return Ok(());
        }

        if let Some(stale) = &current {
            tracing::info!(scope_id = %stale, fallback = %first.id, "active scope no longer available");
        }
        self.scope.adopt(&first.id, first.scope_type, &first.label())?;
        Ok(())
    }

    /// Record a completed credential exchange.
    ///
    /// Does not fetch scopes or permissions; call [`Self::refresh_scopes`] and
    /// [`Self::refresh_permissions`] afterwards.
    pub fn login(
        &self,
        identity: Identity,
        memberships: Vec<Membership>,
        active_scope_id: Option<&ScopeId>,
    ) {
        if let Err(e) = self.store.set_cached_user(&identity) {
            tracing::warn!(error = %e, "failed to cache signed-in user");
        }
        if let Err(e) = self.select_login_scope(active_scope_id, &memberships) {
            tracing::warn!(error = %e, "failed to persist active scope at login");
        }

        tracing::info!(username = %identity.username, memberships = memberships.len(), "signed in");
        {
            let mut state = self.state.write();
            *state = AuthState {
                user: Some(identity),
                memberships,
                ..AuthState::default()
            };
        }
        self.status.send_replace(AuthStatus::Authenticated);
    }

    /// Drop the session everywhere. Safe to call repeatedly.
    pub fn logout(&self) {
        self.api.logout();
        if let Err(e) = self.store.clear_tokens() {
            tracing::warn!(error = %e, "failed to clear stored session");
        }
        self.scope.reset();
        *self.state.write() = AuthState::default();
        if self.status.send_replace(AuthStatus::Unauthenticated) == AuthStatus::Authenticated {
            tracing::info!("signed out");
        }
    }

    /// Re-fetch the available scopes. A failure leaves an empty set, which
    /// reads as "no scope access".
    pub async fn refresh_scopes(&self) {
        let (scopes, highest) = match self.api.get_available_scopes().await {
            Ok(resp) => {
                if let Err(e) = self.reconcile_active_scope(&resp.scopes) {
                    tracing::warn!(error = %e, "failed to persist reconciled scope");
                }
                (resp.scopes, resp.highest_level)
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to load available scopes");
                (Vec::new(), None)
            }
        };
        let mut state = self.state.write();
        state.available_scopes = scopes;
        state.highest_level = highest;
    }

    /// Re-fetch module permissions for the active scope. A failure leaves an
    /// empty map and the configured policy decides visibility.
    pub async fn refresh_permissions(&self) {
        let permissions = match self.api.get_module_permissions().await {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!(error = %e, policy = ?self.policy, "failed to load module permissions");
                ModulePermissions::new()
            }
        };
        self.state.write().permissions = permissions;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::testing::{MockApi, membership, scope};
    use console_security::{Module, ModulePermission};

    fn context(api: &Arc<MockApi>) -> (AuthContext, Arc<ScopeContext>) {
        let scope_ctx = Arc::new(ScopeContext::new(api.store.clone()));
        let auth = AuthContext::new(
            api.clone(),
            api.store.clone(),
            scope_ctx.clone(),
            PermissionPolicy::FailOpen,
        );
        (auth, scope_ctx)
    }

    #[tokio::test]
    async fn starts_loading_and_resolves_unauthenticated_without_token() {
        let api = Arc::new(MockApi::new());
        let (auth, _) = context(&api);
        assert_eq!(auth.status(), AuthStatus::Loading);

        assert_eq!(auth.check_auth().await, AuthStatus::Unauthenticated);
        assert_eq!(api.calls(), 0);
    }

    #[tokio::test]
    async fn first_membership_becomes_default_scope() {
        let api = Arc::new(MockApi::signed_in());
        api.set_memberships(vec![
            membership("7", ScopeType::Site, "Tower A"),
            membership("9", ScopeType::Site, "Tower B"),
        ]);
        api.set_scopes(vec![
            scope("7", ScopeType::Site, "Tower A"),
            scope("9", ScopeType::Site, "Tower B"),
        ]);
        let (auth, scope_ctx) = context(&api);

        assert_eq!(auth.check_auth().await, AuthStatus::Authenticated);
        assert_eq!(scope_ctx.active_scope_id(), Some(ScopeId::from("7")));
        assert_eq!(api.store.active_scope_id(), Some(ScopeId::from("7")));
        assert_eq!(auth.available_scopes().len(), 2);
    }

    #[tokio::test]
    async fn server_choice_applies_when_nothing_is_stored() {
        let api = Arc::new(MockApi::signed_in());
        api.set_memberships(vec![
            membership("7", ScopeType::Site, "Tower A"),
            membership("9", ScopeType::Site, "Tower B"),
        ]);
        api.set_server_active(Some(ScopeId::from("9")));
        api.set_scopes(vec![
            scope("7", ScopeType::Site, "Tower A"),
            scope("9", ScopeType::Site, "Tower B"),
        ]);
        let (auth, scope_ctx) = context(&api);

        auth.check_auth().await;
        assert_eq!(scope_ctx.active_scope_id(), Some(ScopeId::from("9")));
        assert_eq!(api.store.active_scope_id(), Some(ScopeId::from("9")));
    }

    #[tokio::test]
    async fn switched_scope_survives_reload_despite_server_choice() {
        let api = Arc::new(MockApi::signed_in());
        api.set_memberships(vec![
            membership("7", ScopeType::Site, "Tower A"),
            membership("9", ScopeType::Site, "Tower B"),
        ]);
        api.set_server_active(Some(ScopeId::from("7")));
        api.set_scopes(vec![
            scope("7", ScopeType::Site, "Tower A"),
            scope("9", ScopeType::Site, "Tower B"),
        ]);

        let (auth, scope_ctx) = context(&api);
        auth.check_auth().await;
        assert_eq!(scope_ctx.active_scope_id(), Some(ScopeId::from("7")));
        scope_ctx
            .switch_scope("9", ScopeType::Site, "Tower B (SITE)")
            .unwrap();

        let (reloaded, reloaded_scope) = context(&api);
        assert_eq!(reloaded.check_auth().await, AuthStatus::Authenticated);
        assert_eq!(reloaded_scope.active_scope_id(), Some(ScopeId::from("9")));
        assert_eq!(api.store.active_scope_id(), Some(ScopeId::from("9")));
    }

    #[tokio::test]
    #[tracing_test::traced_test]
    async fn stale_stored_scope_falls_back_to_first_available() {
        let api = Arc::new(MockApi::signed_in());
        api.store
            .set_active_scope_id(&ScopeId::from("99"), ScopeType::Site, "Gone (SITE)")
            .unwrap();
        api.set_memberships(vec![membership("7", ScopeType::Site, "Tower A")]);
        api.set_scopes(vec![scope("7", ScopeType::Site, "Tower A")]);
        let (auth, scope_ctx) = context(&api);

        auth.check_auth().await;
        assert_eq!(scope_ctx.active_scope_id(), Some(ScopeId::from("7")));
        assert_eq!(api.store.active_scope_id(), Some(ScopeId::from("7")));
        assert!(logs_contain("active scope no longer available"));
    }

    #[tokio::test]
    async fn identity_failure_resolves_unauthenticated() {
        let api = Arc::new(MockApi::signed_in());
        api.fail_me();
        let (auth, _) = context(&api);

        assert_eq!(auth.check_auth().await, AuthStatus::Unauthenticated);
        assert!(auth.user().is_none());
    }

    #[tokio::test]
    async fn permission_failure_is_not_fatal() {
        let api = Arc::new(MockApi::signed_in());
        api.set_memberships(vec![membership("7", ScopeType::Site, "Tower A")]);
        api.set_scopes(vec![scope("7", ScopeType::Site, "Tower A")]);
        api.fail_permissions();
        let (auth, _) = context(&api);

        assert_eq!(auth.check_auth().await, AuthStatus::Authenticated);
        assert!(auth.permissions().is_empty());
        // Fail-open: empty map shows every module.
        assert!(auth.access_context().evaluator().can_view(Some(&Module::Lease)));
    }

    #[tokio::test]
    async fn permissions_are_loaded_into_snapshot() {
        let api = Arc::new(MockApi::signed_in());
        api.set_memberships(vec![membership("7", ScopeType::Site, "Tower A")]);
        api.set_scopes(vec![scope("7", ScopeType::Site, "Tower A")]);
        api.set_permissions(
            ModulePermissions::new().with(Module::Lease, ModulePermission::view_only()),
        );
        let (auth, _) = context(&api);

        auth.check_auth().await;
        let ctx = auth.access_context();
        assert!(ctx.evaluator().can_view(Some(&Module::Lease)));
        assert!(!ctx.evaluator().can_view(Some(&Module::Revenue)));
        assert_eq!(ctx.active_scope_id(), Some(&ScopeId::from("7")));
    }

    #[tokio::test]
    async fn scope_fetch_failure_on_refresh_empties_set() {
        let api = Arc::new(MockApi::signed_in());
        api.set_memberships(vec![membership("7", ScopeType::Site, "Tower A")]);
        api.set_scopes(vec![scope("7", ScopeType::Site, "Tower A")]);
        let (auth, _) = context(&api);
        auth.check_auth().await;
        assert!(auth.access_context().has_scope_access());

        api.fail_scopes();
        auth.refresh_scopes().await;
        assert!(auth.available_scopes().is_empty());
        assert!(!auth.access_context().has_scope_access());
    }

    #[tokio::test]
    async fn logout_is_idempotent() {
        let api = Arc::new(MockApi::signed_in());
        api.set_memberships(vec![membership("7", ScopeType::Site, "Tower A")]);
        api.set_scopes(vec![scope("7", ScopeType::Site, "Tower A")]);
        let (auth, scope_ctx) = context(&api);
        auth.check_auth().await;

        auth.logout();
        auth.logout();

        assert_eq!(auth.status(), AuthStatus::Unauthenticated);
        assert!(auth.user().is_none());
        assert!(scope_ctx.active_scope_id().is_none());
        assert!(api.store.tokens().is_empty());
        assert!(api.store.active_scope_id().is_none());
    }

    #[tokio::test]
    async fn login_sets_identity_synchronously() {
        let api = Arc::new(MockApi::new());
        let (auth, scope_ctx) = context(&api);
        let who = api.identity();

        auth.login(
            who.clone(),
            vec![membership("4", ScopeType::Entity, "North")],
            None,
        );

        assert_eq!(auth.status(), AuthStatus::Authenticated);
        assert_eq!(auth.user(), Some(who.clone()));
        assert_eq!(api.store.cached_user(), Some(who));
        assert_eq!(scope_ctx.active_scope_id(), Some(ScopeId::from("4")));
    }

    #[tokio::test]
    async fn login_ignores_scope_left_by_an_earlier_session() {
        let api = Arc::new(MockApi::new());
        api.store
            .set_active_scope_id(&ScopeId::from("9"), ScopeType::Site, "Tower B (SITE)")
            .unwrap();
        let (auth, scope_ctx) = context(&api);
        assert_eq!(scope_ctx.active_scope_id(), Some(ScopeId::from("9")));

        auth.login(
            api.identity(),
            vec![
                membership("7", ScopeType::Site, "Tower A"),
                membership("9", ScopeType::Site, "Tower B"),
            ],
            None,
        );

        assert_eq!(scope_ctx.active_scope_id(), Some(ScopeId::from("7")));
        assert_eq!(api.store.active_scope_id(), Some(ScopeId::from("7")));
    }

    #[tokio::test]
    async fn login_prefers_explicit_scope() {
        let api = Arc::new(MockApi::new());
        let (auth, scope_ctx) = context(&api);

        auth.login(
            api.identity(),
            vec![
                membership("7", ScopeType::Site, "Tower A"),
                membership("9", ScopeType::Site, "Tower B"),
            ],
            Some(&ScopeId::from("9")),
        );

        assert_eq!(scope_ctx.active_scope_id(), Some(ScopeId::from("9")));
        assert_eq!(api.store.active_scope_id(), Some(ScopeId::from("9")));
    }

    #[tokio::test(start_paused = true)]
    async fn slow_identity_check_times_out() {
        let api = Arc::new(MockApi::signed_in());
        api.set_me_delay(Duration::from_secs(30));
        let (auth, _) = context(&api);
        let auth = auth.with_check_timeout(Some(Duration::from_secs(5)));

        assert_eq!(auth.check_auth().await, AuthStatus::Unauthenticated);
    }
}
