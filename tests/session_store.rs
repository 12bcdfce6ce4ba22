mod common;

use auction_admin::session::{SessionError, SessionStore};
use common::admin_session;

#[test]
fn test_missing_file_means_signed_out() {
    let dir = tempfile::TempDir::new().unwrap();
    let store = SessionStore::new(dir.path().join("session.json"));
    assert!(store.load().unwrap().is_none());
}

/// Save creates parent directories; load returns the same session.
#[test]
fn test_save_then_load_restores_session() {
    let dir = tempfile::TempDir::new().unwrap();
    let store = SessionStore::new(dir.path().join("nested").join("session.json"));
    let session = admin_session();

    store.save(&session).unwrap();
    let restored = store.load().unwrap().expect("session");
    assert_eq!(restored, session);
    assert_eq!(restored.credential().header_value(), "Bearer test-token");
}

/// A second save fully replaces the first, even when shorter.
#[test]
fn test_save_truncates_previous_contents() {
    let dir = tempfile::TempDir::new().unwrap();
    let store = SessionStore::new(dir.path().join("session.json"));
    let mut long = admin_session();
    long.user.name = "A".repeat(200);
    store.save(&long).unwrap();

    let short = admin_session();
    store.save(&short).unwrap();
    assert_eq!(store.load().unwrap(), Some(short));
}

#[test]
fn test_clear_is_idempotent() {
    let dir = tempfile::TempDir::new().unwrap();
    let store = SessionStore::new(dir.path().join("session.json"));
    store.save(&admin_session()).unwrap();

    store.clear().unwrap();
    store.clear().unwrap();
    assert!(store.load().unwrap().is_none());
}

#[test]
fn test_corrupt_file_is_reported() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("session.json");
    std::fs::write(&path, "{not json").unwrap();

    let store = SessionStore::new(path.clone());
    match store.load().unwrap_err() {
        SessionError::Corrupt { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("Expected Corrupt, got {:?}", other),
    }
}

#[test]
fn test_default_path_is_under_app_dir() {
    assert!(SessionStore::default_path().ends_with("auction-admin/session.json"));
}
