//! Scriptable `ConsoleApi` for unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use console_api::{ApiError, AvailableScopesResponse, ConsoleApi, LoginResponse, MeResponse};
use console_security::{
    AvailableScope, Identity, Membership, ModulePermissions, ScopeId, ScopeType,
};
use console_session::SessionStore;
use parking_lot::Mutex;

pub fn membership(id: &str, scope_type: ScopeType, name: &str) -> Membership {
    Membership {
        scope_id: ScopeId::from(id),
        scope_type,
        scope_name: name.to_owned(),
        role_name: "Agent".to_owned(),
    }
}

pub fn scope(id: &str, scope_type: ScopeType, name: &str) -> AvailableScope {
    AvailableScope {
        id: ScopeId::from(id),
        name: name.to_owned(),
        scope_type,
    }
}

#[allow(clippy::struct_excessive_bools)]
#[derive(Default)]
struct Script {
    superuser: bool,
    me_fails: bool,
    me_delay: Option<Duration>,
    memberships: Vec<Membership>,
    server_active: Option<ScopeId>,
    scopes_fail: bool,
    scopes: Vec<AvailableScope>,
    permissions_fail: bool,
    permissions: ModulePermissions,
    pending: u32,
}

pub struct MockApi {
    pub store: SessionStore,
    script: Mutex<Script>,
    calls: AtomicUsize,
}

impl MockApi {
    pub fn new() -> Self {
        Self {
            store: SessionStore::in_memory(),
            script: Mutex::new(Script::default()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn signed_in() -> Self {
        let api = Self::new();
        api.store.set_tokens(Some("acc"), Some("ref")).unwrap();
        api
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn identity(&self) -> Identity {
        Identity {
            id: serde_json::json!(5),
            username: "bob".to_owned(),
            email: "bob@example.com".to_owned(),
            is_superuser: self.script.lock().superuser,
        }
    }

    pub fn set_superuser(&self) {
        self.script.lock().superuser = true;
    }

    pub fn set_memberships(&self, memberships: Vec<Membership>) {
        self.script.lock().memberships = memberships;
    }

    pub fn set_server_active(&self, id: Option<ScopeId>) {
        self.script.lock().server_active = id;
    }

    pub fn set_scopes(&self, scopes: Vec<AvailableScope>) {
        let mut s = self.script.lock();
        s.scopes = scopes;
        s.scopes_fail = false;
    }

    pub fn set_permissions(&self, permissions: ModulePermissions) {
        self.script.lock().permissions = permissions;
    }

    pub fn set_pending(&self, count: u32) {
        self.script.lock().pending = count;
    }

    pub fn set_me_delay(&self, delay: Duration) {
        self.script.lock().me_delay = Some(delay);
    }

    pub fn fail_me(&self) {
        self.script.lock().me_fails = true;
    }

    pub fn fail_scopes(&self) {
        self.script.lock().scopes_fail = true;
    }

    pub fn fail_permissions(&self) {
        self.script.lock().permissions_fail = true;
    }

    fn tick(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl ConsoleApi for MockApi {
    fn is_authenticated(&self) -> bool {
        self.store.has_access_token()
    }

    async fn login(&self, _username: &str, _password: &str) -> Result<LoginResponse, ApiError> {
        self.tick();
        self.store.set_tokens(Some("acc"), Some("ref"))?;
        let s = self.script.lock();
        Ok(LoginResponse {
            access: "acc".to_owned(),
            refresh: Some("ref".to_owned()),
            user: Identity {
                id: serde_json::json!(5),
                username: "bob".to_owned(),
                email: "bob@example.com".to_owned(),
                is_superuser: s.superuser,
            },
            memberships: s.memberships.clone(),
            active_scope_id: s.server_active.clone(),
        })
    }

    fn logout(&self) {
        let _ = self.store.clear_tokens();
    }

    async fn get_me(&self) -> Result<MeResponse, ApiError> {
        self.tick();
        let delay = self.script.lock().me_delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.script.lock().me_fails {
            return Err(ApiError::Unauthorized);
        }
        let user = self.identity();
        let s = self.script.lock();
        Ok(MeResponse {
            user,
            memberships: s.memberships.clone(),
            active_scope_id: s.server_active.clone(),
        })
    }

    async fn get_available_scopes(&self) -> Result<AvailableScopesResponse, ApiError> {
        self.tick();
        let s = self.script.lock();
        if s.scopes_fail {
            return Err(ApiError::status(500, "scopes unavailable"));
        }
        Ok(AvailableScopesResponse {
            scopes: s.scopes.clone(),
            highest_level: s.scopes.iter().map(|sc| sc.scope_type).min_by_key(|t| t.level()),
        })
    }

    async fn get_module_permissions(&self) -> Result<ModulePermissions, ApiError> {
        self.tick();
        let s = self.script.lock();
        if s.permissions_fail {
            return Err(ApiError::status(500, "permissions unavailable"));
        }
        Ok(s.permissions.clone())
    }

    async fn get_pending_approvals_count(&self) -> Result<u32, ApiError> {
        self.tick();
        Ok(self.script.lock().pending)
    }
}
