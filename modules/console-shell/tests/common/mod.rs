//! Shared fixtures for console shell integration tests.

#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use async_trait::async_trait;
use console_api::{ApiError, AvailableScopesResponse, ConsoleApi, LoginResponse, MeResponse};
use console_security::{
    AvailableScope, Identity, Membership, ModulePermissions, ScopeId, ScopeType,
};
use console_session::{MemoryStorage, SessionStore};
use parking_lot::Mutex;

pub fn membership(id: u64, scope_type: ScopeType, name: &str) -> Membership {
    Membership {
        scope_id: ScopeId::from(id),
        scope_type,
        scope_name: name.to_owned(),
        role_name: "Manager".to_owned(),
    }
}

pub fn available(id: u64, scope_type: ScopeType, name: &str) -> AvailableScope {
    AvailableScope {
        id: ScopeId::from(id),
        name: name.to_owned(),
        scope_type,
    }
}

/// In-memory platform: one identity, fixed memberships and scopes.
pub struct FakePlatform {
    pub storage: Arc<MemoryStorage>,
    pub store: SessionStore,
    pub superuser: bool,
    pub memberships: Vec<Membership>,
    pub scopes: Mutex<Option<Vec<AvailableScope>>>,
    pub permissions: Mutex<ModulePermissions>,
}

impl FakePlatform {
    pub fn new(memberships: Vec<Membership>, scopes: Vec<AvailableScope>) -> Self {
        let storage = Arc::new(MemoryStorage::new());
        let store = SessionStore::new(storage.clone());
        Self {
            storage,
            store,
            superuser: false,
            memberships,
            scopes: Mutex::new(Some(scopes)),
            permissions: Mutex::new(ModulePermissions::new()),
        }
    }

    pub fn superuser() -> Self {
        let mut platform = Self::new(Vec::new(), Vec::new());
        platform.superuser = true;
        platform
    }

    pub fn with_token(self) -> Self {
        self.store.set_tokens(Some("access"), Some("refresh")).unwrap();
        self
    }

    pub fn fail_scopes(&self) {
        *self.scopes.lock() = None;
    }

    fn identity(&self) -> Identity {
        Identity {
            id: serde_json::json!(11),
            username: "lee".to_owned(),
            email: "lee@example.com".to_owned(),
            is_superuser: self.superuser,
        }
    }
}

#[async_trait]
impl ConsoleApi for FakePlatform {
    fn is_authenticated(&self) -> bool {
        self.store.has_access_token()
    }

    async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ApiError> {
        if username != "lee" || password != "secret" {
            return Err(ApiError::status(400, "Invalid credentials"));
        }
        self.store.set_tokens(Some("access"), Some("refresh"))?;
        Ok(LoginResponse {
            access: "access".to_owned(),
            refresh: Some("refresh".to_owned()),
            user: self.identity(),
            memberships: self.memberships.clone(),
            active_scope_id: None,
        })
    }

    fn logout(&self) {
        let _ = self.store.clear_tokens();
    }

    async fn get_me(&self) -> Result<MeResponse, ApiError> {
        Ok(MeResponse {
            user: self.identity(),
            memberships: self.memberships.clone(),
            active_scope_id: None,
        })
    }

    async fn get_available_scopes(&self) -> Result<AvailableScopesResponse, ApiError> {
        match self.scopes.lock().clone() {
            Some(scopes) => Ok(AvailableScopesResponse {
                scopes,
                highest_level: None,
            }),
            None => Err(ApiError::status(502, "upstream unavailable")),
        }
    }

    async fn get_module_permissions(&self) -> Result<ModulePermissions, ApiError> {
        Ok(self.permissions.lock().clone())
    }

    async fn get_pending_approvals_count(&self) -> Result<u32, ApiError> {
        Ok(2)
    }
}
