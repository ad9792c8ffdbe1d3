//! HTTP adapters for the laundry REST API.
//!
//! - `client`: shared reqwest client, bearer token slot and envelope decoding
//! - `auth`: `AuthApi` over `POST /auth/login`
//! - `catalog`: `CatalogApi` for the `/users` and `/services` resources

pub mod auth;
pub mod catalog;
pub mod client;

pub use auth::HttpAuthApi;
pub use catalog::HttpCatalogApi;
pub use client::ApiClient;
