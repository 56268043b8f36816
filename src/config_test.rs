// Unit tests for configuration parsing

use super::*;

#[test]
fn test_is_truthy() {
    for value in ["1", "true", "yes", "y", "TRUE", "Yes", " y "] {
        assert!(is_truthy(value), "{:?} should be truthy", value);
    }
    for value in ["", "0", "false", "no", "n", "off", "maybe"] {
        assert!(!is_truthy(value), "{:?} should be falsy", value);
    }
}

#[test]
fn test_credentials_requires_both_halves() {
    let mut config = Config {
        headless: false,
        email: Some("user@example.com".to_string()),
        password: Some("hunter2".to_string()),
        decrypt_key: None,
    };
    assert_eq!(config.credentials(), Some(("user@example.com", "hunter2")));

    config.password = None;
    assert_eq!(config.credentials(), None);

    config.password = Some("hunter2".to_string());
    config.email = None;
    assert_eq!(config.credentials(), None);
}

#[test]
fn test_default_config_has_no_credentials() {
    let config = Config::default();
    assert!(!config.headless);
    assert_eq!(config.credentials(), None);
    assert!(config.decrypt_key.is_none());
}
