//! Integration tests for `HttpConsoleApi` against a mock platform API.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use console_api::{ApiConfig, ApiError, ConsoleApi, HttpConsoleApi};
use console_security::{Module, ScopeId, ScopeType};
use console_session::SessionStore;
use httpmock::prelude::*;
use serde_json::json;
use url::Url;

fn api_for(server: &MockServer, store: &SessionStore) -> HttpConsoleApi {
    let config = ApiConfig {
        base_url: Url::parse(&server.url("/api")).unwrap(),
        ..ApiConfig::default()
    };
    HttpConsoleApi::new(&config, store.clone()).unwrap()
}

const ME_BODY: &str = r#"{
    "user": {"id": 5, "username": "bob", "email": "bob@example.com", "is_superuser": false},
    "memberships": [{"scope_id": 7, "scope_type": "SITE", "scope_name": "Tower A", "role_name": "Agent"}]
}"#;

#[tokio::test]
async fn login_persists_tokens() {
    let server = MockServer::start();
    let login = server.mock(|when, then| {
        when.method(POST)
            .path("/api/auth/login/")
            .json_body(json!({"username": "bob", "password": "pw"}));
        then.status(200)
            .header("content-type", "application/json")
            .body(
                r#"{"access": "acc-1", "refresh": "ref-1",
                    "user": {"id": 5, "username": "bob"},
                    "memberships": [], "active_scope_id": null}"#,
            );
    });

    let store = SessionStore::in_memory();
    let api = api_for(&server, &store);
    assert!(!api.is_authenticated());

    let resp = api.login("bob", "pw").await.unwrap();

    login.assert_calls(1);
    assert_eq!(resp.user.username, "bob");
    assert!(api.is_authenticated());
    assert_eq!(store.tokens().refresh_token.unwrap().expose(), "ref-1");
}

#[tokio::test]
async fn authorized_calls_carry_bearer_and_scope_header() {
    let server = MockServer::start();
    let me = server.mock(|when, then| {
        when.method(GET)
            .path("/api/auth/me/")
            .header("authorization", "Bearer acc-1")
            .header("x-scope-id", "7");
        then.status(200)
            .header("content-type", "application/json")
            .body(ME_BODY);
    });

    let store = SessionStore::in_memory();
    store.set_tokens(Some("acc-1"), Some("ref-1")).unwrap();
    store
        .set_active_scope_id(&ScopeId::from(7_u64), ScopeType::Site, "Tower A")
        .unwrap();

    let api = api_for(&server, &store);
    let resp = api.get_me().await.unwrap();

    me.assert_calls(1);
    assert_eq!(resp.memberships[0].scope_name, "Tower A");
}

#[tokio::test]
async fn expired_access_token_is_refreshed_once_and_retried() {
    let server = MockServer::start();
    let stale = server.mock(|when, then| {
        when.method(GET)
            .path("/api/auth/me/permissions/")
            .header("authorization", "Bearer old");
        then.status(401).body(r#"{"detail": "Token expired"}"#);
    });
    let refresh = server.mock(|when, then| {
        when.method(POST)
            .path("/api/auth/token/refresh/")
            .json_body(json!({"refresh": "ref-1"}));
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"access": "new"}"#);
    });
    let fresh = server.mock(|when, then| {
        when.method(GET)
            .path("/api/auth/me/permissions/")
            .header("authorization", "Bearer new");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"LEASE": {"can_view": true}}"#);
    });

    let store = SessionStore::in_memory();
    store.set_tokens(Some("old"), Some("ref-1")).unwrap();
    let api = api_for(&server, &store);

    let perms = api.get_module_permissions().await.unwrap();

    stale.assert_calls(1);
    refresh.assert_calls(1);
    fresh.assert_calls(1);
    assert!(perms.get(&Module::Lease).unwrap().can_view);
    assert_eq!(store.tokens().access_token.unwrap().expose(), "new");
    assert_eq!(store.tokens().refresh_token.unwrap().expose(), "ref-1");
}

#[tokio::test]
async fn failed_refresh_clears_session() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/auth/scopes/available/");
        then.status(401);
    });
    server.mock(|when, then| {
        when.method(POST).path("/api/auth/token/refresh/");
        then.status(401).body(r#"{"detail": "Token is blacklisted"}"#);
    });

    let store = SessionStore::in_memory();
    store.set_tokens(Some("old"), Some("revoked")).unwrap();
    store
        .set_active_scope_id(&ScopeId::from(3_u64), ScopeType::Org, "Acme")
        .unwrap();
    let api = api_for(&server, &store);

    let err = api.get_available_scopes().await.unwrap_err();

    assert!(err.is_auth_failure());
    assert!(!api.is_authenticated());
    assert!(store.active_scope_id().is_none());
}

#[tokio::test]
async fn missing_token_fails_without_network_call() {
    let server = MockServer::start();
    let me = server.mock(|when, then| {
        when.method(GET).path("/api/auth/me/");
        then.status(200).body(ME_BODY);
    });

    let api = api_for(&server, &SessionStore::in_memory());
    let err = api.get_me().await.unwrap_err();

    assert!(matches!(err, ApiError::Unauthorized));
    me.assert_calls(0);
}

#[tokio::test]
async fn server_errors_keep_status_and_detail() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/approvals/pending/count/");
        then.status(503)
            .header("content-type", "application/json")
            .body(r#"{"detail": "approvals service unavailable"}"#);
    });

    let store = SessionStore::in_memory();
    store.set_tokens(Some("acc"), None).unwrap();
    let api = api_for(&server, &store);

    match api.get_pending_approvals_count().await.unwrap_err() {
        ApiError::Status { status, message } => {
            assert_eq!(status, 503);
            assert_eq!(message, "approvals service unavailable");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn pending_approvals_count_decodes() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/approvals/pending/count/");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"count": 4}"#);
    });

    let store = SessionStore::in_memory();
    store.set_tokens(Some("acc"), None).unwrap();
    let api = api_for(&server, &store);

    assert_eq!(api.get_pending_approvals_count().await.unwrap(), 4);
}
