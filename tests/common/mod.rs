//! Shared test utilities and mock infrastructure.

#![allow(dead_code, unused_imports)]

pub mod mock_backend;

use auction_admin::api::ApiClient;
use auction_admin::config::{ApiConfig, Config, Credential};
use auction_admin::session::{Session, UserIdentity};
use serde_json::{json, Value};
use std::path::PathBuf;
use tempfile::TempDir;

pub fn admin_identity() -> UserIdentity {
    UserIdentity {
        id: "u-admin".to_string(),
        name: "Ada Admin".to_string(),
        email: "ada@example.com".to_string(),
        role: "admin".to_string(),
    }
}

pub fn admin_session() -> Session {
    Session::new("test-token", admin_identity())
}

pub fn credential() -> Credential {
    admin_session().credential()
}

pub fn client_for(base_url: &str) -> ApiClient {
    let config = ApiConfig {
        base_url: base_url.to_string(),
        timeout_seconds: 5,
        connect_timeout_seconds: 2,
    };
    ApiClient::new(&config).expect("client")
}

/// Body the login endpoint answers with.
pub fn login_body(role: &str) -> Value {
    json!({
        "token": "fresh-token",
        "user": {
            "_id": "u-admin",
            "name": "Ada Admin",
            "email": "ada@example.com",
            "role": role,
        }
    })
}

/// Config file pointing at `base_url` with the session kept inside the temp dir.
pub fn temp_config(base_url: &str) -> (TempDir, PathBuf, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("config.toml");
    let session_path = temp_dir.path().join("session.json");

    let content = format!(
        r#"[api]
base_url = "{}"
timeout_seconds = 5
connect_timeout_seconds = 2

[session]
path = "{}"
"#,
        base_url,
        session_path.display().to_string().replace('\\', "\\\\")
    );

    std::fs::write(&config_path, content).expect("Failed to write config");
    (temp_dir, config_path, session_path)
}
