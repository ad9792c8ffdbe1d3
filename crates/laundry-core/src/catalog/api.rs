//! REST resource interface for catalog entities.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::catalog::entity::CatalogEntity;
use crate::error::Result;

/// Server-side status filter for list requests.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum StatusFilter {
    /// Active and archived records
    #[default]
    All,
    Active,
    Archived,
}

/// Query parameters of a list request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ListQuery {
    pub status: StatusFilter,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl ListQuery {
    pub fn new(status: StatusFilter) -> Self {
        Self {
            status,
            ..Self::default()
        }
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Pagination metadata of a list response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub last_page: u32,
}

impl PageMeta {
    /// True when no page follows this one.
    pub fn is_last(&self) -> bool {
        self.page >= self.last_page
    }
}

/// One page of a list response.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<E> {
    pub items: Vec<E>,
    pub meta: PageMeta,
}

/// CRUD operations of one catalog resource.
///
/// Archive is the soft delete (`DELETE /{resource}/{id}`); permanent
/// deletion is a separate endpoint.
#[async_trait]
pub trait CatalogApi<E: CatalogEntity>: Send + Sync {
    async fn list(&self, query: &ListQuery) -> Result<Page<E>>;

    async fn get(&self, id: i64) -> Result<E>;

    async fn create(&self, form: &E::Form) -> Result<E>;

    async fn update(&self, id: i64, form: &E::Form) -> Result<E>;

    async fn archive(&self, id: i64) -> Result<()>;

    async fn restore(&self, id: i64) -> Result<()>;

    async fn delete_permanently(&self, id: i64) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_status_filter_strings() {
        assert_eq!(StatusFilter::default().to_string(), "all");
        assert_eq!(StatusFilter::from_str("Archived").unwrap(), StatusFilter::Archived);
    }

    #[test]
    fn test_list_query_serialization_skips_unset_paging() {
        let query = ListQuery::new(StatusFilter::All);
        let value = serde_json::to_value(&query).unwrap();
        assert_eq!(value, serde_json::json!({"status": "all"}));

        let query = ListQuery::new(StatusFilter::Active).with_page(2).with_limit(50);
        let value = serde_json::to_value(&query).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"status": "active", "page": 2, "limit": 50})
        );
    }

    #[test]
    fn test_page_meta_is_last() {
        let meta = PageMeta {
            total: 25,
            page: 1,
            limit: 10,
            last_page: 3,
        };
        assert!(!meta.is_last());
        assert!(PageMeta { page: 3, ..meta }.is_last());
        assert!(PageMeta::default().is_last());
    }
}
