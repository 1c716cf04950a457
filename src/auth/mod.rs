//! Authentication — credential exchange, user profile, roles, routing.
//!
//! ## Flow
//!
//! 1. `POST /api/token` with a form-encoded `username`/`password` returns a
//!    bearer token.
//! 2. `GET /api/users/me` with that token returns the [`UserProfile`].
//! 3. The resulting [`Session`](crate::session::Session) is persisted and the
//!    caller is pointed at the [`Landing`] page for the user's [`Role`].
//!
//! Use `client.auth().restore()` on start-up to pick up a persisted session.

#[cfg(feature = "http")]
pub mod client;

pub mod routing;

use serde::{Deserialize, Serialize};

use crate::session::Session;

// ============================================================================
// Roles and landing pages
// ============================================================================

/// Role of an authenticated user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Landing page after login.
    pub fn landing(&self) -> Landing {
        match self {
            Self::Admin => Landing::Admin,
            Self::User => Landing::User,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "user" => Ok(Self::User),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

/// Top-level pages the front end navigates between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Landing {
    /// Login / entry page.
    Entry,
    Admin,
    User,
}

impl Landing {
    pub fn path(&self) -> &'static str {
        match self {
            Self::Entry => "/index.html",
            Self::Admin => "/admin/index.html",
            Self::User => "/user/index.html",
        }
    }
}

impl std::fmt::Display for Landing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path())
    }
}

// ============================================================================
// Login result
// ============================================================================

/// Result of a login attempt. Login never fails with an `Err`; a rejected
/// attempt carries the message to show the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    Authenticated { session: Session, landing: Landing },
    Rejected { message: String },
}

impl LoginOutcome {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }

    pub fn session(&self) -> Option<&Session> {
        match self {
            Self::Authenticated { session, .. } => Some(session),
            Self::Rejected { .. } => None,
        }
    }
}

// ============================================================================
// Wire types
// ============================================================================

/// Form body for `POST /api/token`.
#[derive(Debug, Clone, Serialize)]
pub struct TokenRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Response from `POST /api/token`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// Response from `GET /api/users/me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub id: Option<i64>,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    pub role: Role,
    #[serde(default)]
    pub full_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serde() {
        let admin: Role = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(admin, Role::Admin);
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
        assert!(serde_json::from_str::<Role>("\"root\"").is_err());
    }

    #[test]
    fn test_role_landing() {
        assert_eq!(Role::Admin.landing(), Landing::Admin);
        assert_eq!(Role::User.landing(), Landing::User);
        assert_eq!(Landing::Admin.path(), "/admin/index.html");
        assert_eq!(Landing::Entry.to_string(), "/index.html");
    }

    #[test]
    fn test_profile_without_id() {
        let profile: UserProfile = serde_json::from_str(
            r#"{"username":"alice","email":"alice","role":"user","full_name":null}"#,
        )
        .unwrap();
        assert_eq!(profile.id, None);
        assert_eq!(profile.role, Role::User);
    }

    #[test]
    fn test_token_request_form_encoding() {
        let body = serde_urlencoded::to_string(TokenRequest {
            username: "a b",
            password: "p&w=1",
        })
        .unwrap();
        assert_eq!(body, "username=a+b&password=p%26w%3D1");
    }
}
