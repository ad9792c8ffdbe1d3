//! Catalog domain module.
//!
//! Records owned by the external API that the admin screens list and edit:
//! users and laundry services.
//!
//! # Module Structure
//!
//! - `entity`: `CatalogEntity` trait shared by both record types
//! - `soft_delete`: archived/active marker decoded from `deleted_at`
//! - `user` / `service`: record and form models
//! - `api`: `CatalogApi` trait for the REST resource of an entity
//! - `table`: client-side search/sort/selection over loaded rows

pub mod api;
pub mod entity;
pub mod service;
pub mod soft_delete;
pub mod table;
pub mod user;

pub use api::{CatalogApi, ListQuery, Page, PageMeta, StatusFilter};
pub use entity::{CatalogEntity, CellValue};
pub use service::{Service, ServiceForm, ServiceStats};
pub use soft_delete::SoftDelete;
pub use table::{DataTable, SortDirection, SortOrder};
pub use user::{Role, User, UserForm, UserStats};
