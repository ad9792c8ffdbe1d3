//! Infrastructure layer of the laundry admin client.
//!
//! Concrete adapters for the traits defined in `laundry-core`: the
//! file-backed session store, the configuration file, the HTTP API and the
//! export file writers.

pub mod api;
pub mod config_service;
pub mod dto;
pub mod export;
pub mod paths;
pub mod session_repository;

pub use api::{ApiClient, HttpAuthApi, HttpCatalogApi};
pub use config_service::ConfigService;
pub use paths::{AdminPaths, ServiceType};
pub use session_repository::FileSessionRepository;
