//! Shared HTTP client.
//!
//! Every API answer is wrapped in the same envelope:
//!
//! ```json
//! { "status": "success", "message": "...", "data": ... }
//! ```
//!
//! Non-2xx answers carry `{status, message}`; the message is surfaced as
//! [`AdminError::Api`]. Transport failures (connect, timeout, bad JSON)
//! become [`AdminError::Network`].

use std::sync::{Arc, RwLock};
use std::time::Duration;

use laundry_core::config::ApiConfig;
use laundry_core::error::{AdminError, Result};
use reqwest::{Client, Method, RequestBuilder};
use serde::Deserialize;
use serde::de::DeserializeOwned;

/// Value of `status` on a successful envelope.
pub const STATUS_SUCCESS: &str = "success";

#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn is_success(&self) -> bool {
        self.status.eq_ignore_ascii_case(STATUS_SUCCESS)
    }

    /// Returns `data`, failing when the server omitted it.
    pub fn into_data(self) -> Result<T> {
        self.data
            .ok_or_else(|| AdminError::serialization("JSON", "response envelope has no data"))
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// reqwest client bound to the configured base URL.
///
/// Cloning is cheap; clones share the connection pool and the token slot,
/// so a token attached after login is seen by every resource adapter.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Arc<RwLock<Option<String>>>,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()
            .map_err(|e| AdminError::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: Arc::new(RwLock::new(None)),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sets or clears the bearer token.
    pub fn set_token(&self, token: Option<String>) {
        if let Ok(mut slot) = self.token.write() {
            *slot = token;
        }
    }

    pub fn token(&self) -> Option<String> {
        self.token.read().ok().and_then(|slot| slot.clone())
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Starts a request, adding the bearer token when one is attached.
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.url(path);
        tracing::debug!("[Api] {} {}", method, url);

        let mut builder = self.client.request(method, url);
        if let Some(token) = self.token() {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    /// Sends the request and decodes the envelope.
    pub async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<Envelope<T>> {
        let response = builder.send().await.map_err(map_transport_error)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(map_transport_error)?;

        let result = decode_envelope(status, &body);
        if let Err(e) = &result {
            tracing::warn!("[Api] Request failed: {}", e);
        }
        result
    }
}

fn map_transport_error(err: reqwest::Error) -> AdminError {
    if err.is_timeout() {
        AdminError::network(format!("request timed out: {}", err))
    } else {
        AdminError::network(err.to_string())
    }
}

/// Decodes a response body given its HTTP status.
pub fn decode_envelope<T: DeserializeOwned>(status: u16, body: &str) -> Result<Envelope<T>> {
    if !(200..300).contains(&status) {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.message)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| default_status_message(status));
        return Err(AdminError::api(status, message));
    }

    if body.trim().is_empty() {
        return Ok(Envelope {
            status: STATUS_SUCCESS.to_string(),
            message: String::new(),
            data: None,
        });
    }

    serde_json::from_str(body)
        .map_err(|e| AdminError::network(format!("unexpected response body: {}", e)))
}

fn default_status_message(status: u16) -> String {
    reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|code| code.canonical_reason())
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {}", status))
}
