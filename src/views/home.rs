use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, instrument};

use super::format_price;
use crate::catalog::CatalogApi;
use crate::clients::CartClient;
use crate::domain::{Product, ProductId};
use crate::error::{CartError, ViewError};
use crate::messages::MutationOutcome;

/// A catalog product as shown on the home page.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductListing {
    pub product: Product,
    pub price_formatted: String,
    /// Units of this product already in the cart.
    pub cart_quantity: u32,
}

/// Quantity per product id.
pub fn cart_items_amount(cart: &[Product]) -> HashMap<ProductId, u32> {
    cart.iter().map(|product| (product.id, product.amount)).collect()
}

pub fn listings(products: Vec<Product>, cart: &[Product]) -> Vec<ProductListing> {
    let amounts = cart_items_amount(cart);
    products
        .into_iter()
        .map(|product| ProductListing {
            price_formatted: format_price(product.price),
            cart_quantity: amounts.get(&product.id).copied().unwrap_or(0),
            product,
        })
        .collect()
}

/// The product listing page.
#[derive(Clone)]
pub struct HomePage {
    catalog: Arc<dyn CatalogApi>,
    cart: CartClient,
}

impl HomePage {
    pub fn new(catalog: Arc<dyn CatalogApi>, cart: CartClient) -> Self {
        Self { catalog, cart }
    }

    #[instrument(skip(self))]
    pub async fn load(&self) -> Result<Vec<ProductListing>, ViewError> {
        let products = self.catalog.products().await?;
        let cart = self.cart.cart().await?;
        debug!(products = products.len(), "Loaded home page");
        Ok(listings(products, &cart))
    }

    pub async fn add_product(&self, product_id: ProductId) -> Result<MutationOutcome, CartError> {
        self.cart.add_product(product_id).await
    }
}
