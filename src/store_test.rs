// Unit tests for the cookie store

use super::*;
use crate::token::SESSION_COOKIE_NAME;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

const SECRET: &str = "test-secret";

fn sample_token() -> SessionToken {
    SessionToken {
        name: SESSION_COOKIE_NAME.to_string(),
        value: "AQEDAxxxx".to_string(),
        domain: ".linkedin.com".to_string(),
        path: "/".to_string(),
        expiry: Some(1_900_000_000),
        secure: true,
        http_only: true,
        same_site: Some("Lax".to_string()),
    }
}

fn store_in(dir: &TempDir, policy: PlaintextPolicy, secret: Option<&str>) -> CookieStore {
    CookieStore::new(
        dir.path().to_path_buf(),
        policy,
        secret.map(|s| s.to_string()),
    )
    .unwrap()
}

#[test]
fn test_read_absent() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir, PlaintextPolicy::Allow, None);
    assert!(store.read().is_none());
}

#[test]
fn test_write_then_read() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir, PlaintextPolicy::Allow, None);

    store.write(&sample_token());
    assert_eq!(store.read(), Some(sample_token()));
}

#[test]
fn test_read_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir, PlaintextPolicy::Allow, None);

    store.write(&sample_token());
    let first = store.read();
    let second = store.read();
    assert_eq!(first, second);
}

#[test]
fn test_deny_policy_skips_write() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir, PlaintextPolicy::Deny, None);

    store.write(&sample_token());
    assert!(!dir.path().join("cookies.json").exists());
    assert!(store.read().is_none());
}

#[test]
fn test_corrupt_plaintext_reads_as_absent() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("cookies.json"), "not json {").unwrap();

    let store = store_in(&dir, PlaintextPolicy::Allow, None);
    assert!(store.read().is_none());
}

#[test]
fn test_plaintext_without_session_cookie_reads_as_absent() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("cookies.json"),
        r#"{"saved_at": "2025-01-01T00:00:00Z"}"#,
    )
    .unwrap();

    let store = store_in(&dir, PlaintextPolicy::Allow, None);
    assert!(store.read().is_none());
}

#[test]
fn test_write_refuses_plaintext_when_encrypted_exists() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("cookies.json.encrypted"), "{}").unwrap();

    // Even an Allow policy must not downgrade to plaintext
    let store = store_in(&dir, PlaintextPolicy::Allow, None);
    store.write(&sample_token());

    assert!(!dir.path().join("cookies.json").exists());
}

#[test]
fn test_legacy_encrypted_name_blocks_plaintext_write() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("cookies.json.encrypt"), "{}").unwrap();

    let store = store_in(&dir, PlaintextPolicy::Allow, None);
    store.write(&sample_token());

    assert!(!dir.path().join("cookies.json").exists());
    assert!(store.has_encrypted_blob());
}

#[test]
fn test_seal_then_read() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir, PlaintextPolicy::Allow, Some(SECRET));

    store.write(&sample_token());
    store.seal(SECRET).unwrap();

    assert!(!dir.path().join("cookies.json").exists());
    assert!(dir.path().join("cookies.json.encrypted").exists());
    assert_eq!(store.read(), Some(sample_token()));
}

#[test]
fn test_encrypted_read_without_secret_is_absent() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir, PlaintextPolicy::Allow, Some(SECRET));
    store.write(&sample_token());
    store.seal(SECRET).unwrap();

    let no_secret = store_in(&dir, PlaintextPolicy::Allow, None);
    assert!(no_secret.read().is_none());
}

#[test]
fn test_encrypted_read_with_wrong_secret_is_absent() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir, PlaintextPolicy::Allow, Some(SECRET));
    store.write(&sample_token());
    store.seal(SECRET).unwrap();

    let wrong = store_in(&dir, PlaintextPolicy::Allow, Some("wrong"));
    assert!(wrong.read().is_none());
}

#[test]
fn test_seal_without_plaintext_errors() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir, PlaintextPolicy::Allow, Some(SECRET));
    assert!(store.seal(SECRET).is_err());
}

#[test]
fn test_seal_rejects_corrupt_plaintext() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("cookies.json"), "garbage").unwrap();

    let store = store_in(&dir, PlaintextPolicy::Allow, Some(SECRET));
    assert!(store.seal(SECRET).is_err());
    // The garbage file is left in place, never encrypted
    assert!(dir.path().join("cookies.json").exists());
    assert!(!dir.path().join("cookies.json.encrypted").exists());
}

#[test]
fn test_delete_is_best_effort() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir, PlaintextPolicy::Allow, None);

    // Nothing on disk: no panic, no error
    store.delete();

    store.write(&sample_token());
    store.delete();
    assert!(store.read().is_none());
}
