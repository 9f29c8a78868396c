//! Read access to the storefront API: product records and stock levels.

mod http;

pub use http::HttpCatalog;

use async_trait::async_trait;

use crate::domain::{Product, ProductId, Stock};
use crate::error::CatalogError;

#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// `GET products`
    async fn products(&self) -> Result<Vec<Product>, CatalogError>;

    /// `GET products/{id}`
    async fn product(&self, id: ProductId) -> Result<Product, CatalogError>;

    /// `GET stock/{id}`
    async fn stock(&self, id: ProductId) -> Result<Stock, CatalogError>;
}
