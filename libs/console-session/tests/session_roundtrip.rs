#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use console_security::{ScopeId, ScopeType};
use console_session::{DurableStorage, FileStorage, SessionStore, keys};

fn file_store(dir: &tempfile::TempDir) -> SessionStore {
    let storage = FileStorage::open(dir.path().join("session.json")).unwrap();
    SessionStore::new(Arc::new(storage))
}

#[test]
fn active_scope_reads_back_as_string_for_numeric_and_string_input() {
    let store = SessionStore::in_memory();

    store
        .set_active_scope_id(&ScopeId::from(44_u64), ScopeType::Entity, "North Entity")
        .unwrap();
    assert_eq!(store.active_scope_id().unwrap().as_str(), "44");

    store
        .set_active_scope_id(&ScopeId::from("site-9"), ScopeType::Site, "Tower B")
        .unwrap();
    assert_eq!(store.active_scope_id().unwrap().as_str(), "site-9");
}

#[test]
fn session_survives_reload_from_disk() {
    let dir = tempfile::tempdir().unwrap();

    let store = file_store(&dir);
    store.set_tokens(Some("access-1"), Some("refresh-1")).unwrap();
    store
        .set_active_scope_id(&ScopeId::from(12_u64), ScopeType::Company, "Beta Co")
        .unwrap();
    drop(store);

    let reloaded = file_store(&dir);
    assert!(reloaded.has_access_token());
    assert_eq!(reloaded.tokens().refresh_token.unwrap().expose(), "refresh-1");
    assert_eq!(reloaded.active_scope_id(), Some(ScopeId::from("12")));
}

#[test]
fn clear_on_disk_session_twice() {
    let dir = tempfile::tempdir().unwrap();
    let store = file_store(&dir);
    store.set_tokens(Some("a"), Some("r")).unwrap();
    store
        .set_active_scope_id(&ScopeId::from(3_u64), ScopeType::Org, "Acme")
        .unwrap();

    store.clear_tokens().unwrap();
    store.clear_tokens().unwrap();

    let reloaded = file_store(&dir);
    assert!(reloaded.tokens().is_empty());
    assert!(reloaded.active_scope_id().is_none());
}

#[test]
fn legacy_only_session_is_still_readable() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::open(dir.path().join("session.json")).unwrap();
    storage
        .set(
            keys::ACTIVE,
            r#"{"mode":"SCOPE","scope_type":"SITE","scope_id":"7","label":"Tower A"}"#,
        )
        .unwrap();

    let store = SessionStore::new(Arc::new(storage));
    assert_eq!(store.active_scope_id(), Some(ScopeId::from(7_u64)));
}
