//! Session domain model.
//!
//! The session is the single persisted record of who is signed in: the
//! opaque bearer token handed out by the API and the operator profile shown
//! in the workspace header. Both halves are written together.

use serde::{Deserialize, Serialize};
use version_migrate::DeriveQueryable as Queryable;

use crate::catalog::Role;

/// Profile of the signed-in operator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserProfile {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl UserProfile {
    /// Builds the locally synthesized admin profile used after login.
    ///
    /// The login endpoint only returns a token, so the profile is derived
    /// from the submitted email and the configured display name.
    pub fn local_admin(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: 1,
            name: name.into(),
            email: email.into(),
            role: Role::Admin,
        }
    }
}

/// Persisted session record.
///
/// # Fields
///
/// * `token` - Bearer token returned by `POST /auth/login`.
/// * `user` - Operator profile.
/// * `issued_at` - RFC 3339 timestamp of the login that produced the token.
///
/// A session is authenticated only when both `token` and `user` are present.
/// Either half alone is treated as signed out.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Queryable)]
#[queryable(entity = "admin_session")]
pub struct Session {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserProfile>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issued_at: Option<String>,
}

impl Session {
    /// Creates an empty (signed out) session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a signed-in session stamped with the current time.
    pub fn signed_in(token: impl Into<String>, user: UserProfile) -> Self {
        Self {
            token: Some(token.into()),
            user: Some(user),
            issued_at: Some(chrono::Utc::now().to_rfc3339()),
        }
    }

    /// True iff both the token and the profile are present.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some() && self.user.is_some()
    }

    /// Returns the bearer token, if any.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Returns the operator profile, if any.
    pub fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    /// Drops both halves of the session.
    pub fn clear(&mut self) {
        self.token = None;
        self.user = None;
        self.issued_at = None;
    }
}
