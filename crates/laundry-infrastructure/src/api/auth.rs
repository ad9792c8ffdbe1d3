//! Login over `POST /auth/login`.

use async_trait::async_trait;
use laundry_core::auth::{AuthApi, Credentials, LOGIN_FALLBACK_MESSAGE};
use laundry_core::error::{AdminError, Result};
use reqwest::Method;
use serde::Deserialize;

use super::client::{ApiClient, Envelope};

/// `data` of a login answer: the bare token, or an object holding it.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LoginData {
    Token(String),
    Wrapped { token: String },
}

impl LoginData {
    fn into_token(self) -> String {
        match self {
            LoginData::Token(token) | LoginData::Wrapped { token } => token,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpAuthApi {
    client: ApiClient,
}

impl HttpAuthApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

/// Extracts the token from a decoded login envelope.
fn token_from(envelope: Envelope<LoginData>) -> Result<String> {
    let message = envelope.message.clone();
    let token = if envelope.is_success() {
        envelope.data.map(LoginData::into_token)
    } else {
        None
    };

    token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AdminError::Unauthorized(login_message(Some(message))))
}

fn login_message(server: Option<String>) -> String {
    server
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| LOGIN_FALLBACK_MESSAGE.to_string())
}

#[async_trait]
impl AuthApi for HttpAuthApi {
    async fn login(&self, credentials: &Credentials) -> Result<String> {
        tracing::info!("[Auth] Signing in as {}", credentials.email);

        let request = self
            .client
            .request(Method::POST, "/auth/login")
            .json(credentials);

        match self.client.send::<LoginData>(request).await {
            Ok(envelope) => token_from(envelope),
            Err(AdminError::Api { message, .. }) => {
                Err(AdminError::Unauthorized(login_message(Some(message))))
            }
            Err(AdminError::Network(detail)) => {
                tracing::warn!("[Auth] Login request failed: {}", detail);
                Err(AdminError::Unauthorized(login_message(None)))
            }
            Err(other) => Err(other),
        }
    }

    fn attach_token(&self, token: Option<String>) {
        self.client.set_token(token);
    }
}
