//! Authentication: credentials, the login API seam, and the auth gate.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::session::Session;

/// Entry point operators are sent to when access is denied.
pub const LOGIN_ROUTE: &str = "/admin/login";

/// Message shown when a login fails without a server-provided reason.
pub const LOGIN_FALLBACK_MESSAGE: &str = "Login failed. Please check your credentials.";

/// Email/password pair submitted to `POST /auth/login`.
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// Login endpoint of the external API.
///
/// The same client that performs the login carries the bearer token for
/// every later request, so the token is attached through this seam too.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Exchanges credentials for a bearer token.
    async fn login(&self, credentials: &Credentials) -> Result<String>;

    /// Sets (or clears) the bearer token sent with subsequent requests.
    fn attach_token(&self, token: Option<String>);
}

/// Outcome of evaluating the auth gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Granted,
    /// Send the operator to [`LOGIN_ROUTE`]; the requested destination is
    /// not remembered.
    RedirectToLogin,
}

impl AccessDecision {
    pub fn is_granted(&self) -> bool {
        matches!(self, AccessDecision::Granted)
    }
}

/// Gate evaluated before every protected view.
pub struct AuthGate;

impl AuthGate {
    /// Grants access iff the session holds both a token and a profile.
    pub fn check(session: &Session) -> AccessDecision {
        if session.is_authenticated() {
            AccessDecision::Granted
        } else {
            AccessDecision::RedirectToLogin
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::UserProfile;

    #[test]
    fn test_gate_grants_full_session() {
        let session = Session::signed_in(
            "tok",
            UserProfile::local_admin("Admin", "admin@laundry.com"),
        );
        assert_eq!(AuthGate::check(&session), AccessDecision::Granted);
    }

    #[test]
    fn test_gate_denies_partial_sessions() {
        assert_eq!(
            AuthGate::check(&Session::new()),
            AccessDecision::RedirectToLogin
        );

        let token_only = Session {
            token: Some("tok".into()),
            ..Session::default()
        };
        assert_eq!(AuthGate::check(&token_only), AccessDecision::RedirectToLogin);

        let user_only = Session {
            user: Some(UserProfile::local_admin("Admin", "admin@laundry.com")),
            ..Session::default()
        };
        assert!(!AuthGate::check(&user_only).is_granted());
    }

    #[test]
    fn test_credentials_debug_hides_password() {
        let credentials = Credentials::new("admin@laundry.com", "admin123");
        let printed = format!("{:?}", credentials);
        assert!(printed.contains("admin@laundry.com"));
        assert!(!printed.contains("admin123"));
    }
}
