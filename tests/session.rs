use loadwatch::models::TokenPair;
use loadwatch::session::Session;

#[test]
fn test_lifecycle() {
    let session = Session::in_memory();
    assert!(!session.is_authenticated());

    session.acquire(TokenPair::new("access-1", "refresh-1"));
    assert!(session.is_authenticated());
    assert_eq!(session.access_token().as_deref(), Some("access-1"));

    session.update_access("access-2".to_string());
    assert_eq!(session.access_token().as_deref(), Some("access-2"));
    assert_eq!(session.refresh_token().as_deref(), Some("refresh-1"));

    session.clear();
    assert!(!session.is_authenticated());
    assert_eq!(session.refresh_token(), None);
}

#[test]
fn test_clones_share_tokens() {
    let session = Session::in_memory();
    let api_side = session.clone();
    api_side.acquire(TokenPair::new("access", "refresh"));
    assert!(session.is_authenticated());
}

#[test]
fn test_empty_access_token_is_not_a_session() {
    let session = Session::in_memory();
    session.acquire(TokenPair {
        access: String::new(),
        refresh: None,
    });
    assert!(!session.is_authenticated());
}

#[test]
fn test_persistent_session_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("loadwatch").join("session.json");

    let session = Session::persistent(path.clone());
    session.acquire(TokenPair::new("access", "refresh"));
    assert!(path.exists());

    let restored = Session::persistent(path.clone());
    assert_eq!(restored.access_token().as_deref(), Some("access"));

    restored.clear();
    assert!(!path.exists());
    assert!(!Session::persistent(path).is_authenticated());
}

#[test]
fn test_corrupt_session_file_is_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    std::fs::write(&path, "not json").unwrap();

    let session = Session::persistent(path);
    assert!(!session.is_authenticated());
}
