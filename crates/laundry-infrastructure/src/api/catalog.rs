//! REST adapter for catalog resources.
//!
//! | Operation           | Request                        |
//! |---------------------|--------------------------------|
//! | list                | `GET /{resource}?status=..`    |
//! | get                 | `GET /{resource}/{id}`         |
//! | create              | `POST /{resource}`             |
//! | update              | `PUT /{resource}/{id}`         |
//! | archive             | `DELETE /{resource}/{id}`      |
//! | restore             | `POST /{resource}/{id}/restore`|
//! | delete_permanently  | `DELETE /{resource}/{id}/permanent` |

use std::marker::PhantomData;

use async_trait::async_trait;
use laundry_core::catalog::{CatalogApi, CatalogEntity, ListQuery, Page, PageMeta};
use laundry_core::error::Result;
use reqwest::Method;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::client::ApiClient;

/// `data` of a list answer. The array key is named after the resource.
#[derive(Debug, Deserialize)]
#[serde(bound = "E: DeserializeOwned")]
struct Collection<E> {
    #[serde(alias = "users", alias = "services", default = "Vec::new")]
    items: Vec<E>,
    #[serde(default)]
    meta: PageMeta,
}

impl<E> From<Collection<E>> for Page<E> {
    fn from(collection: Collection<E>) -> Self {
        Page {
            items: collection.items,
            meta: collection.meta,
        }
    }
}

pub struct HttpCatalogApi<E> {
    client: ApiClient,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for HttpCatalogApi<E> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E: CatalogEntity> HttpCatalogApi<E> {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            _entity: PhantomData,
        }
    }

    fn collection_path() -> String {
        format!("/{}", E::RESOURCE)
    }

    fn item_path(id: i64) -> String {
        format!("/{}/{}", E::RESOURCE, id)
    }

    async fn command(&self, method: Method, path: String) -> Result<()> {
        let request = self.client.request(method, &path);
        self.client.send::<Value>(request).await?;
        Ok(())
    }
}

#[async_trait]
impl<E: CatalogEntity> CatalogApi<E> for HttpCatalogApi<E> {
    async fn list(&self, query: &ListQuery) -> Result<Page<E>> {
        let request = self
            .client
            .request(Method::GET, &Self::collection_path())
            .query(query);
        let collection: Collection<E> = self.client.send(request).await?.into_data()?;
        tracing::debug!(
            "[Catalog] {} page {}/{}: {} rows",
            E::RESOURCE,
            collection.meta.page,
            collection.meta.last_page,
            collection.items.len()
        );
        Ok(collection.into())
    }

    async fn get(&self, id: i64) -> Result<E> {
        let request = self.client.request(Method::GET, &Self::item_path(id));
        self.client.send(request).await?.into_data()
    }

    async fn create(&self, form: &E::Form) -> Result<E> {
        let request = self
            .client
            .request(Method::POST, &Self::collection_path())
            .json(form);
        let created: E = self.client.send(request).await?.into_data()?;
        tracing::info!("[Catalog] Created {} {}", E::LABEL, created.id());
        Ok(created)
    }

    async fn update(&self, id: i64, form: &E::Form) -> Result<E> {
        let request = self
            .client
            .request(Method::PUT, &Self::item_path(id))
            .json(form);
        let updated: E = self.client.send(request).await?.into_data()?;
        tracing::info!("[Catalog] Updated {} {}", E::LABEL, id);
        Ok(updated)
    }

    async fn archive(&self, id: i64) -> Result<()> {
        self.command(Method::DELETE, Self::item_path(id)).await?;
        tracing::info!("[Catalog] Archived {} {}", E::LABEL, id);
        Ok(())
    }

    async fn restore(&self, id: i64) -> Result<()> {
        self.command(Method::POST, format!("{}/restore", Self::item_path(id)))
            .await?;
        tracing::info!("[Catalog] Restored {} {}", E::LABEL, id);
        Ok(())
    }

    async fn delete_permanently(&self, id: i64) -> Result<()> {
        self.command(Method::DELETE, format!("{}/permanent", Self::item_path(id)))
            .await?;
        tracing::info!("[Catalog] Permanently deleted {} {}", E::LABEL, id);
        Ok(())
    }
}
