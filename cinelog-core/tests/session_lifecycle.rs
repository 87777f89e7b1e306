//! Session persistence over the SQLite key-value store.
//!
//! Exercises: open_db, SqliteKvStore, SessionStore restore/login/register/
//! logout, corrupt-record healing, and the watch subscription.

mod common;

use cinelog_core::db::{self, SqliteKvStore};
use cinelog_core::error::ApiError;
use cinelog_core::kv::{KvStore, MemoryKvStore};
use cinelog_core::session::{SessionStore, SESSION_KEY};
use cinelog_core::types::{LoginPayload, RegisterPayload};
use common::{session, ScriptedApi, PASSWORD};

fn temp_db_path() -> String {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.keep().join("test.db");
    path.to_string_lossy().to_string()
}

fn login(username: &str, password: &str) -> LoginPayload {
    LoginPayload { username: username.into(), password: password.into() }
}

#[test]
fn open_db_creates_versioned_wal_schema() {
    let path = temp_db_path();
    let conn = db::open_db(&path).unwrap();

    let version: i64 = conn
        .query_row("SELECT MAX(version) FROM schema_version", [], |r| r.get(0))
        .unwrap();
    assert_eq!(version, 1, "schema_version should be 1");

    let journal: String = conn.query_row("PRAGMA journal_mode", [], |r| r.get(0)).unwrap();
    assert_eq!(journal, "wal", "journal_mode should be wal");

    let rows: i64 = conn.query_row("SELECT COUNT(*) FROM kv", [], |r| r.get(0)).unwrap();
    assert_eq!(rows, 0, "kv table should exist and be empty");

    drop(conn);
    // Re-opening must not re-run the v1 migration.
    let conn = db::open_db(&path).unwrap();
    let versions: i64 = conn
        .query_row("SELECT COUNT(*) FROM schema_version", [], |r| r.get(0))
        .unwrap();
    assert_eq!(versions, 1);
}

#[test]
fn kv_store_upserts_and_removes() {
    let mut store = SqliteKvStore::open(temp_db_path()).unwrap();
    assert_eq!(store.get("k").unwrap(), None);
    store.set("k", b"one").unwrap();
    store.set("k", b"two").unwrap();
    assert_eq!(store.get("k").unwrap().as_deref(), Some(&b"two"[..]));
    store.remove("k").unwrap();
    store.remove("k").unwrap();
    assert_eq!(store.get("k").unwrap(), None);
}

#[tokio::test]
async fn login_survives_restart_and_logout_does_not() {
    let path = temp_db_path();
    let api = ScriptedApi::new().with_account(session(7, "ana"));

    let mut store = SessionStore::restore_on_startup(Box::new(SqliteKvStore::open(&path).unwrap()));
    assert!(!store.is_authenticated());
    let signed_in = store.login(&api, &login("ana", PASSWORD)).await.unwrap();
    assert_eq!(signed_in.id, 7);
    drop(store);

    let mut store = SessionStore::restore_on_startup(Box::new(SqliteKvStore::open(&path).unwrap()));
    assert_eq!(store.current(), Some(session(7, "ana")));

    store.logout();
    assert!(!store.is_authenticated());
    drop(store);

    let store = SessionStore::restore_on_startup(Box::new(SqliteKvStore::open(&path).unwrap()));
    assert!(store.current().is_none());
    assert_eq!(store.storage().get(SESSION_KEY).unwrap(), None);
}

#[test]
fn record_missing_token_is_removed_on_restore() {
    let path = temp_db_path();
    let mut kv = SqliteKvStore::open(&path).unwrap();
    kv.set(SESSION_KEY, br#"{"id":7,"username":"ana","email":"ana@example.com"}"#)
        .unwrap();

    let store = SessionStore::restore_on_startup(Box::new(kv));
    assert!(store.current().is_none());
    assert!(!store.is_authenticated());
    assert_eq!(store.storage().get(SESSION_KEY).unwrap(), None);
}

#[test]
fn garbage_bytes_are_removed_on_restore() {
    let kv = MemoryKvStore::new().with_entry(SESSION_KEY, &b"\xff\xfe not json"[..]);
    let store = SessionStore::restore_on_startup(Box::new(kv));
    assert!(store.current().is_none());
    assert_eq!(store.storage().get(SESSION_KEY).unwrap(), None);
}

#[tokio::test]
async fn failed_login_keeps_the_current_session() {
    let api = ScriptedApi::new()
        .with_account(session(7, "ana"))
        .with_account(session(8, "bob"));
    let mut store = SessionStore::new(Box::new(MemoryKvStore::new()));
    store.login(&api, &login("ana", PASSWORD)).await.unwrap();

    let err = store.login(&api, &login("bob", "wrong")).await.unwrap_err();
    assert_eq!(err.user_message(), "Bad credentials");
    assert_eq!(store.current().map(|s| s.id), Some(7));

    api.set_offline(true);
    let err = store.login(&api, &login("bob", PASSWORD)).await.unwrap_err();
    assert!(err.is_transport());
    assert_eq!(store.current().map(|s| s.id), Some(7));
}

#[tokio::test]
async fn validation_failures_never_reach_the_network() {
    let api = ScriptedApi::new();
    let mut store = SessionStore::new(Box::new(MemoryKvStore::new()));

    let err = store.login(&api, &login("", PASSWORD)).await.unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
    let err = store
        .register(
            &api,
            &RegisterPayload { username: "cy".into(), email: "cy".into(), password: "pw".into() },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn register_publishes_to_subscribers() {
    let api = ScriptedApi::new().with_account(session(7, "ana"));
    let mut store = SessionStore::new(Box::new(MemoryKvStore::new()));
    let mut rx = store.subscribe();

    let payload = RegisterPayload {
        username: "cy".into(),
        email: "cy@example.com".into(),
        password: "pw".into(),
    };
    let created = store.register(&api, &payload).await.unwrap();
    rx.changed().await.unwrap();
    assert_eq!(rx.borrow_and_update().as_ref(), Some(&created));

    let err = store.register(&api, &payload).await.unwrap_err();
    assert_eq!(err.user_message(), "Username already taken");

    store.logout();
    rx.changed().await.unwrap();
    assert!(rx.borrow_and_update().is_none());
}
