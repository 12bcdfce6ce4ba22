use auction_admin::config::{Config, ConfigError, ConfigStore, Credential};
use auction_admin::ui::pagination::PageSize;

/// Test that Config::default() produces the expected values.
#[test]
fn test_config_default_values() {
    let config = Config::default();

    assert_eq!(config.api.base_url, "http://localhost:4000");
    assert_eq!(config.api.timeout_seconds, 30);
    assert_eq!(config.api.connect_timeout_seconds, 5);
    assert_eq!(config.ui.default_page_size, 10);
    assert_eq!(config.ui.tick_rate_ms, 250);
    assert_eq!(config.ui.notice_ttl_seconds, 4);
    assert!(config.session.path.is_none());
    assert_eq!(config.default_page_size(), PageSize::Ten);
}

/// Test that Config::config_path() returns a path ending with the expected filename.
#[test]
fn test_config_path_ends_with_expected() {
    let path = Config::config_path();
    assert!(path.ends_with("auction-admin/config.toml"));
}

#[test]
fn test_validation_passes_for_default() {
    assert!(Config::default().validate().is_ok());
}

/// A base URL without a scheme is rejected.
#[test]
fn test_validation_fails_without_scheme() {
    let mut config = Config::default();
    config.api.base_url = "localhost:4000".to_string();

    match config.validate().unwrap_err() {
        ConfigError::ValidationError { message } => {
            assert!(message.contains("api.base_url"));
        }
        other => panic!("Expected ValidationError, got {:?}", other),
    }
}

/// Page sizes outside 5/10/15 are rejected.
#[test]
fn test_validation_fails_unknown_page_size() {
    let mut config = Config::default();
    config.ui.default_page_size = 20;

    match config.validate().unwrap_err() {
        ConfigError::ValidationError { message } => {
            assert!(message.contains("default_page_size"));
            assert!(message.contains("20"));
        }
        other => panic!("Expected ValidationError, got {:?}", other),
    }
}

#[test]
fn test_validation_fails_zero_tick_rate() {
    let mut config = Config::default();
    config.ui.tick_rate_ms = 0;
    assert!(config.validate().is_err());
}

/// Sections and keys left out fall back to their defaults.
#[test]
fn test_parse_partial_toml() {
    let toml_content = r#"
[api]
base_url = "https://admin.example.com"

[ui]
default_page_size = 15
"#;

    let config: Config = toml::from_str(toml_content).expect("Should parse valid TOML");

    assert_eq!(config.api.base_url, "https://admin.example.com");
    assert_eq!(config.api.timeout_seconds, 30);
    assert_eq!(config.default_page_size(), PageSize::Fifteen);
    assert_eq!(config.ui.notice_ttl_seconds, 4);
}

#[test]
fn test_parse_invalid_toml() {
    let result: Result<Config, _> = toml::from_str("this is not valid toml [[[");
    assert!(result.is_err());
}

/// A missing file means defaults, not an error.
#[test]
fn test_load_from_missing_file_uses_defaults() {
    let dir = tempfile::TempDir::new().unwrap();
    let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_load_from_reports_parse_errors_with_path() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[api\nbase_url = 1").unwrap();

    match Config::load_from(&path).unwrap_err() {
        ConfigError::ParseError { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("Expected ParseError, got {:?}", other),
    }
}

/// Loading validates, so a bad value in the file is caught up front.
#[test]
fn test_load_from_validates() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[ui]\ndefault_page_size = 7\n").unwrap();

    assert!(matches!(
        Config::load_from(&path),
        Err(ConfigError::ValidationError { .. })
    ));
}

#[test]
fn test_config_roundtrip() {
    let mut config = Config::default();
    config.api.base_url = "https://admin.example.com".to_string();
    config.ui.default_page_size = 5;

    let serialized = toml::to_string(&config).expect("serialize");
    let parsed: Config = toml::from_str(&serialized).expect("parse");
    assert_eq!(parsed, config);
}

/// Reload swaps in the new file contents for every clone of the store.
#[test]
fn test_store_reload_is_shared_between_clones() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[ui]\ndefault_page_size = 5\n").unwrap();

    let store = ConfigStore::new(Config::load_from(&path).unwrap(), path.clone());
    let other = store.clone();
    std::fs::write(&path, "[ui]\ndefault_page_size = 15\n").unwrap();
    store.reload().unwrap();

    assert_eq!(other.get().default_page_size(), PageSize::Fifteen);
    assert_eq!(other.path(), path.as_path());
}

/// Credentials render as a bearer header and never leak through Debug.
#[test]
fn test_credential_header_and_redaction() {
    let credential = Credential::new("secret-token");
    assert_eq!(credential.header_value(), "Bearer secret-token");
    assert!(!format!("{:?}", credential).contains("secret-token"));
}
