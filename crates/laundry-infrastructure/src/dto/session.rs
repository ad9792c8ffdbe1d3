//! Session DTOs and migrations
//!
//! The session used to be stored as two independent slots (`token` and
//! `user`). Schema 1.0.0 keeps that layout readable; 1.1.0 is the single
//! record written today.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use version_migrate::{IntoDomain, Versioned};

use laundry_core::catalog::Role;
use laundry_core::session::{Session, UserProfile};

/// Stored operator profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserProfileDTO {
    pub id: i64,
    pub name: String,
    pub email: String,
    /// Role is kept as free text, as the legacy slot stored it.
    pub role: String,
}

/// Session V1.0.0 (initial version): token and profile slots.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Versioned)]
#[versioned(version = "1.0.0")]
pub struct SessionV1_0 {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserProfileDTO>,
}

/// Session V1.1.0.
///
/// Added issued_at, the time of the login that produced the token.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Versioned)]
#[versioned(version = "1.1.0")]
pub struct SessionV1_1 {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserProfileDTO>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issued_at: Option<String>,
}

// ============================================================================
// Migration implementations
// ============================================================================

/// Migration from SessionV1_0 to SessionV1_1.
/// The legacy slots carry no login time.
impl version_migrate::MigratesTo<SessionV1_1> for SessionV1_0 {
    fn migrate(self) -> SessionV1_1 {
        SessionV1_1 {
            token: self.token,
            user: self.user,
            issued_at: None,
        }
    }
}

// ============================================================================
// Domain model conversions
// ============================================================================

impl From<UserProfileDTO> for UserProfile {
    fn from(dto: UserProfileDTO) -> Self {
        UserProfile {
            id: dto.id,
            name: dto.name,
            email: dto.email,
            // Only admins can sign in; an unreadable role is treated as admin.
            role: Role::from_str(&dto.role).unwrap_or(Role::Admin),
        }
    }
}

impl From<UserProfile> for UserProfileDTO {
    fn from(profile: UserProfile) -> Self {
        UserProfileDTO {
            id: profile.id,
            name: profile.name,
            email: profile.email,
            role: profile.role.to_string(),
        }
    }
}

/// Convert SessionV1_1 DTO to domain model.
impl IntoDomain<Session> for SessionV1_1 {
    fn into_domain(self) -> Session {
        Session {
            token: self.token,
            user: self.user.map(Into::into),
            issued_at: self.issued_at,
        }
    }
}

/// Convert domain model to SessionV1_1 DTO for persistence.
impl version_migrate::FromDomain<Session> for SessionV1_1 {
    fn from_domain(session: Session) -> Self {
        SessionV1_1 {
            token: session.token,
            user: session.user.map(Into::into),
            issued_at: session.issued_at,
        }
    }
}

// ============================================================================
// Migrator factory
// ============================================================================

/// Creates and configures a Migrator instance for the session record.
///
/// # Migration Path
///
/// - V1.0 → V1.1: Adds `issued_at` (None)
/// - V1.1 → Session: Converts DTO to domain model
pub fn create_session_migrator() -> version_migrate::Migrator {
    let mut migrator = version_migrate::Migrator::builder().build();

    let session_path = version_migrate::Migrator::define("admin_session")
        .from::<SessionV1_0>()
        .step::<SessionV1_1>()
        .into_with_save::<Session>();

    migrator
        .register(session_path)
        .expect("Failed to register admin_session migration path");

    migrator
}
