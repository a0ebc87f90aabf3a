//! Session composition root.
//!
//! [`ConsoleSession`] owns one API client, one session store and the contexts
//! built on them. Everything scope-dependent hangs off it, so a scope switch
//! followed by [`ConsoleSession::reload`] rebuilds the whole console state.

pub mod auth;
pub mod scope;
#[cfg(test)]
pub mod testing;

use std::sync::Arc;

use console_api::ConsoleApi;
use console_security::{AccessContext, ScopeId};
use console_session::SessionStore;

use crate::badge::PendingApprovalsBadge;
use crate::config::ShellConfig;
use crate::error::{RouteTableError, ShellError};
use crate::nav::{
    IconTheme, LucideIcons, NavCatalog, NavMode, SidebarState, SidebarView, TopbarView,
    render_sidebar, render_topbar,
};
use crate::routes::{RouteResolution, RouteTable};

pub use auth::{AuthContext, AuthStatus};
pub use scope::{ScopeContext, ScopeSwitch};

pub struct ConsoleSession {
    api: Arc<dyn ConsoleApi>,
    store: SessionStore,
    config: ShellConfig,
    scope: Arc<ScopeContext>,
    auth: AuthContext,
    routes: RouteTable,
    nav: NavCatalog,
    icons: Arc<dyn IconTheme>,
}

impl std::fmt::Debug for ConsoleSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleSession")
            .field("auth", &self.auth)
            .field("scope", &self.scope)
            .field("routes", &self.routes)
            .finish_non_exhaustive()
    }
}

impl ConsoleSession {
    /// # Errors
    /// Returns [`RouteTableError`] if the built-in route tree is inconsistent.
    pub fn new(
        api: Arc<dyn ConsoleApi>,
        store: SessionStore,
        config: ShellConfig,
    ) -> Result<Self, RouteTableError> {
        let scope = Arc::new(ScopeContext::new(store.clone()));
        let auth = AuthContext::new(
            api.clone(),
            store.clone(),
            scope.clone(),
            config.permission_policy,
        )
        .with_check_timeout(config.auth_check_timeout);

        Ok(Self {
            api,
            store,
            config,
            scope,
            auth,
            routes: RouteTable::standard()?,
            nav: NavCatalog::standard(),
            icons: Arc::new(LucideIcons),
        })
    }

    #[must_use]
    pub fn with_icons(mut self, icons: Arc<dyn IconTheme>) -> Self {
        self.icons = icons;
        self
    }

    #[must_use]
    pub fn auth(&self) -> &AuthContext {
        &self.auth
    }

    #[must_use]
    pub fn scope(&self) -> &ScopeContext {
        &self.scope
    }

    #[must_use]
    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    #[must_use]
    pub fn nav(&self) -> &NavCatalog {
        &self.nav
    }

    #[must_use]
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    #[must_use]
    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    #[must_use]
    pub fn access_context(&self) -> AccessContext {
        self.auth.access_context()
    }

    /// Initial session check.
    pub async fn start(&self) -> AuthStatus {
        self.auth.check_auth().await
    }

    /// Rebuild all scope-dependent state; what a full reload does after a scope switch.
    pub async fn reload(&self) -> AuthStatus {
        self.auth.check_auth().await
    }

    /// Exchange credentials, then load scopes and permissions for the new session.
    ///
    /// # Errors
    /// Returns [`ShellError::Api`] if the credential exchange is rejected.
    pub async fn sign_in(&self, username: &str, password: &str) -> Result<AuthStatus, ShellError> {
        let resp = self.api.login(username, password).await?;
        self.auth
            .login(resp.user, resp.memberships, resp.active_scope_id.as_ref());
        self.auth.refresh_scopes().await;
        self.auth.refresh_permissions().await;
        Ok(self.auth.status())
    }

    pub fn sign_out(&self) {
        self.auth.logout();
    }

    /// Switch to one of the loaded available scopes.
    ///
    /// # Errors
    /// Returns [`ShellError::UnknownScope`] if `scope_id` is not in the available
    /// set and [`ShellError::Storage`] if persisting fails.
    pub fn switch_scope(&self, scope_id: impl Into<ScopeId>) -> Result<ScopeSwitch, ShellError> {
        let scope_id = scope_id.into();
        let target = self
            .auth
            .available_scopes()
            .into_iter()
            .find(|s| s.id == scope_id)
            .ok_or(ShellError::UnknownScope(scope_id))?;
        Ok(self
            .scope
            .switch_scope(target.id.clone(), target.scope_type, &target.label())?)
    }

    #[must_use]
    pub fn navigate(&self, path: &str) -> RouteResolution {
        self.routes.resolve(path, self.auth.status())
    }

    /// Auto-expand for `path`, then render.
    pub fn sidebar(&self, state: &mut SidebarState, path: &str) -> SidebarView {
        let ctx = self.auth.access_context();
        state.on_navigate(&self.nav, NavMode::for_context(&ctx), path);
        render_sidebar(&self.nav, &ctx, state, path, self.icons.as_ref())
    }

    #[must_use]
    pub fn topbar(&self, path: &str, pending_approvals: Option<u32>) -> TopbarView {
        let ctx = self.auth.access_context();
        let route = match self.navigate(path) {
            RouteResolution::Render(m) => Some(m),
            RouteResolution::Redirect { .. } | RouteResolution::Pending => None,
        };
        render_topbar(&self.nav, &ctx, route.as_ref(), path, pending_approvals)
    }

    /// Start the approvals badge poller for this session.
    #[must_use]
    pub fn spawn_approvals_badge(&self) -> PendingApprovalsBadge {
        PendingApprovalsBadge::spawn(self.api.clone(), self.config.approvals_poll_interval)
    }
}
