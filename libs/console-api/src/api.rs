//! `ConsoleApi` trait definition.
//!
//! This is the contract the session core depends on. Every async method is
//! fallible and a rejected call is the only error signal; there are no
//! partial-success shapes.

use async_trait::async_trait;
use console_security::ModulePermissions;

use crate::errors::ApiError;
use crate::models::{AvailableScopesResponse, LoginResponse, MeResponse};

#[async_trait]
pub trait ConsoleApi: Send + Sync {
    /// Synchronous token-presence check; performs no network call.
    fn is_authenticated(&self) -> bool;

    /// Exchange credentials for tokens. Implementations persist the returned
    /// tokens before resolving.
    async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ApiError>;

    /// Drop the local tokens. Never fails toward the caller.
    fn logout(&self);

    /// Identity, memberships and the server-side active scope, if any.
    async fn get_me(&self) -> Result<MeResponse, ApiError>;

    async fn get_available_scopes(&self) -> Result<AvailableScopesResponse, ApiError>;

    /// Module permissions for the active scope and the identity's role in it.
    async fn get_module_permissions(&self) -> Result<ModulePermissions, ApiError>;

    /// Count of approval requests waiting on the current identity.
    async fn get_pending_approvals_count(&self) -> Result<u32, ApiError>;
}
