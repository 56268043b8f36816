// Unit tests for the login state machine's browser-free paths.
// Paths that need a live chromedriver are covered by the ignored
// integration test in tests/session_factory_test.rs.

use super::*;
use crate::browser::BrowserOptions;
use crate::store::PlaintextPolicy;
use tempfile::TempDir;

fn store_in(dir: &TempDir) -> CookieStore {
    CookieStore::new(dir.path().to_path_buf(), PlaintextPolicy::Allow, None).unwrap()
}

fn orchestrator_without_credentials(dir: &TempDir) -> LoginOrchestrator {
    LoginOrchestrator::new(
        Config::default(),
        store_in(dir),
        SessionFactory::new(BrowserOptions::new(true)),
    )
}

fn expired_token() -> SessionToken {
    SessionToken {
        name: SESSION_COOKIE_NAME.to_string(),
        value: "AQEDAxxxx".to_string(),
        domain: ".linkedin.com".to_string(),
        path: "/".to_string(),
        expiry: Some(1_000_000_000),
        secure: true,
        http_only: true,
        same_site: None,
    }
}

#[tokio::test]
async fn test_missing_credentials_without_token_fails_fast() {
    let dir = TempDir::new().unwrap();
    let orchestrator = orchestrator_without_credentials(&dir);

    // No token and no credentials: fatal, and no browser is ever launched
    let err = orchestrator.login().await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<LoginError>(),
        Some(LoginError::MissingCredentials)
    ));
    assert!(err.to_string().contains("missing EMAIL or PASSWORD"));
}

#[tokio::test]
async fn test_expired_token_is_deleted_before_credential_fallback() {
    let dir = TempDir::new().unwrap();
    store_in(&dir).write(&expired_token());
    assert!(dir.path().join("cookies.json").exists());

    let orchestrator = orchestrator_without_credentials(&dir);
    let err = orchestrator.login().await.unwrap_err();

    // The expired token is gone even though the fallback then failed
    assert!(matches!(
        err.downcast_ref::<LoginError>(),
        Some(LoginError::MissingCredentials)
    ));
    assert!(!dir.path().join("cookies.json").exists());
}

#[tokio::test]
async fn test_expired_token_never_reaches_cookie_injection() {
    // classify() gates the cookie path; an expired token must route to the
    // credential branch without any session being created
    let now = chrono::Utc::now().timestamp();
    let token = expired_token();
    assert_eq!(classify(Some(&token), now), TokenState::Expired);
}
