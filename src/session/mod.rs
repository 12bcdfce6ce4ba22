//! Signed-in admin session.
//!
//! A [`Session`] is created by sign-in, persisted through a [`SessionStore`]
//! and handed to every controller that issues API calls.

mod store;

pub use store::{SessionError, SessionStore};

use serde::{Deserialize, Serialize};

use crate::config::{Credential, SecureString};

/// Identity of the signed-in admin as returned by the login endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserIdentity {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: String,
}

impl UserIdentity {
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

/// Token plus identity, the unit persisted across restarts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: SecureString,
    pub user: UserIdentity,
}

impl Session {
    pub fn new(token: impl Into<String>, user: UserIdentity) -> Self {
        Self {
            token: SecureString::new(token.into()),
            user,
        }
    }

    pub fn credential(&self) -> Credential {
        Credential::new(self.token.expose())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_reads_server_id_field() {
        let user: UserIdentity = serde_json::from_str(
            r#"{"_id":"u1","name":"Ada","email":"ada@example.com","role":"admin"}"#,
        )
        .unwrap();
        assert_eq!(user.id, "u1");
        assert!(user.is_admin());
    }

    #[test]
    fn credential_carries_token() {
        let session = Session::new("tok", UserIdentity {
            id: "u1".into(),
            name: "Ada".into(),
            email: String::new(),
            role: "admin".into(),
        });
        assert_eq!(session.credential().header_value(), "Bearer tok");
    }
}
