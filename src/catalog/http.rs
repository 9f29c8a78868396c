use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use super::CatalogApi;
use crate::domain::{Product, ProductId, Stock};
use crate::error::CatalogError;

/// Catalog backed by the storefront's REST API.
///
/// No timeout is configured here; reqwest's defaults apply.
#[derive(Debug, Clone)]
pub struct HttpCatalog {
    base_url: String,
    client: reqwest::Client,
}

impl HttpCatalog {
    pub fn new(base_url: impl Into<String>) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| CatalogError::Transport(e.to_string()))?;
        Ok(Self::with_client(base_url, client))
    }

    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, client }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, CatalogError> {
        let url = format!("{}/{}", self.base_url, path);
        debug!(%url, "Sending request");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| CatalogError::Transport(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(path.to_string()));
        }
        if !status.is_success() {
            return Err(CatalogError::Status {
                status: status.as_u16(),
                url,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| CatalogError::Decode(e.to_string()))
    }
}

#[async_trait]
impl CatalogApi for HttpCatalog {
    #[instrument(skip(self))]
    async fn products(&self) -> Result<Vec<Product>, CatalogError> {
        self.get_json("products").await
    }

    #[instrument(skip(self))]
    async fn product(&self, id: ProductId) -> Result<Product, CatalogError> {
        self.get_json(&format!("products/{id}")).await
    }

    #[instrument(skip(self))]
    async fn stock(&self, id: ProductId) -> Result<Stock, CatalogError> {
        self.get_json(&format!("stock/{id}")).await
    }
}
