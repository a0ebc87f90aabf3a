//! `reqwest`-backed implementation of [`ConsoleApi`].
//!
//! Tokens live in the shared [`SessionStore`]: every authenticated request
//! reads the current access token and active scope from it, and a `401`
//! triggers exactly one refresh-and-retry before the session is dropped.

use async_trait::async_trait;
use console_security::ModulePermissions;
use console_session::SessionStore;
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::api::ConsoleApi;
use crate::config::ApiConfig;
use crate::errors::ApiError;
use crate::models::{
    AvailableScopesResponse, ErrorBody, LoginRequest, LoginResponse, MeResponse,
    PendingApprovalsResponse, RefreshRequest, RefreshResponse,
};

/// Endpoint paths relative to the configured base URL.
pub mod endpoints {
    pub const LOGIN: &str = "auth/login/";
    pub const REFRESH: &str = "auth/token/refresh/";
    pub const ME: &str = "auth/me/";
    pub const AVAILABLE_SCOPES: &str = "auth/scopes/available/";
    pub const MY_PERMISSIONS: &str = "auth/me/permissions/";
    pub const PENDING_APPROVALS: &str = "approvals/pending/count/";
}

pub struct HttpConsoleApi {
    client: reqwest::Client,
    base_url: Url,
    scope_header: String,
    store: SessionStore,
}

impl std::fmt::Debug for HttpConsoleApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpConsoleApi")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl HttpConsoleApi {
    /// # Errors
    /// Returns [`ApiError::InvalidConfig`] for an unusable base URL and
    /// [`ApiError::Transport`] if the HTTP client cannot be built.
    pub fn new(config: &ApiConfig, store: SessionStore) -> Result<Self, ApiError> {
        let base_url = config.normalized_base_url()?;
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("leasing-console/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url,
            scope_header: config.scope_header.clone(),
            store,
        })
    }

    #[must_use]
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    fn url(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|e| ApiError::InvalidConfig(format!("invalid endpoint path '{path}': {e}")))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.send_authorized(Method::GET, path).await?;
        decode(response).await
    }

    /// Send with the current bearer token; on `401` refresh once and retry.
    async fn send_authorized(
        &self,
        method: Method,
        path: &str,
    ) -> Result<reqwest::Response, ApiError> {
        let response = self.send_once(method.clone(), path).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        tracing::debug!(path, "access token rejected, attempting refresh");
        if let Err(e) = self.refresh_access_token().await {
            tracing::info!(error = %e, "token refresh failed, clearing session");
            self.logout();
            return Err(ApiError::Unauthorized);
        }

        let retried = self.send_once(method, path).await?;
        if retried.status() == StatusCode::UNAUTHORIZED {
            self.logout();
            return Err(ApiError::Unauthorized);
        }
        Ok(retried)
    }

    async fn send_once(&self, method: Method, path: &str) -> Result<reqwest::Response, ApiError> {
        let tokens = self.store.tokens();
        let access = tokens.access_token.ok_or(ApiError::Unauthorized)?;

        let mut request = self
            .client
            .request(method, self.url(path)?)
            .bearer_auth(access.expose());
        if let Some(scope_id) = self.store.active_scope_id() {
            request = request.header(self.scope_header.as_str(), scope_id.as_str());
        }
        Ok(request.send().await?)
    }

    async fn post_public<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let response = self.client.post(self.url(path)?).json(body).send().await?;
        decode(response).await
    }

    async fn refresh_access_token(&self) -> Result<(), ApiError> {
        let refresh = self
            .store
            .tokens()
            .refresh_token
            .ok_or(ApiError::Unauthorized)?;

        let rotated: RefreshResponse = self
            .post_public(
                endpoints::REFRESH,
                &RefreshRequest {
                    refresh: refresh.expose(),
                },
            )
            .await?;

        self.store
            .set_tokens(Some(&rotated.access), rotated.refresh.as_deref())?;
        tracing::debug!("access token refreshed");
        Ok(())
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let status = response.status();
    if status.is_success() {
        let bytes = response.bytes().await?;
        return serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()));
    }

    let bytes = response.bytes().await.unwrap_or_default();
    let message = serde_json::from_slice::<ErrorBody>(&bytes)
        .ok()
        .and_then(ErrorBody::message)
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_owned());

    Err(match status {
        StatusCode::UNAUTHORIZED => ApiError::Unauthorized,
        StatusCode::FORBIDDEN => ApiError::Forbidden(message),
        _ => ApiError::status(status.as_u16(), message),
    })
}

#[async_trait]
impl ConsoleApi for HttpConsoleApi {
    fn is_authenticated(&self) -> bool {
        self.store.has_access_token()
    }

    async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let response: LoginResponse = self
            .post_public(endpoints::LOGIN, &LoginRequest { username, password })
            .await?;

        self.store
            .set_tokens(Some(&response.access), response.refresh.as_deref())?;
        tracing::info!(username, "credential exchange succeeded");
        Ok(response)
    }

    fn logout(&self) {
        if let Err(e) = self.store.clear_tokens() {
            tracing::warn!(error = %e, "failed to clear stored session");
        }
    }

    async fn get_me(&self) -> Result<MeResponse, ApiError> {
        self.get_json(endpoints::ME).await
    }

    async fn get_available_scopes(&self) -> Result<AvailableScopesResponse, ApiError> {
        self.get_json(endpoints::AVAILABLE_SCOPES).await
    }

    async fn get_module_permissions(&self) -> Result<ModulePermissions, ApiError> {
        self.get_json(endpoints::MY_PERMISSIONS).await
    }

    async fn get_pending_approvals_count(&self) -> Result<u32, ApiError> {
        let body: PendingApprovalsResponse = self.get_json(endpoints::PENDING_APPROVALS).await?;
        Ok(body.count)
    }
}
