use tracing::debug;

use super::format_price;
use crate::clients::CartClient;
use crate::domain::{Product, ProductId};
use crate::error::CartError;
use crate::messages::{MutationOutcome, UpdateProductAmount};

#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub product: Product,
    pub price_formatted: String,
    pub subtotal: f64,
    pub subtotal_formatted: String,
    /// The decrement button is disabled at one unit.
    pub can_decrement: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CartSummary {
    pub lines: Vec<CartLine>,
    pub total: f64,
    pub total_formatted: String,
}

impl CartSummary {
    pub fn from_cart(cart: &[Product]) -> Self {
        let lines: Vec<CartLine> = cart
            .iter()
            .map(|product| {
                let subtotal = product.subtotal();
                CartLine {
                    price_formatted: format_price(product.price),
                    subtotal,
                    subtotal_formatted: format_price(subtotal),
                    can_decrement: product.amount > 1,
                    product: product.clone(),
                }
            })
            .collect();
        let total: f64 = lines.iter().map(|line| line.subtotal).sum();

        Self {
            lines,
            total,
            total_formatted: format_price(total),
        }
    }
}

/// The cart page: quantities, subtotals, and the controls around them.
#[derive(Clone)]
pub struct CartPage {
    cart: CartClient,
}

impl CartPage {
    pub fn new(cart: CartClient) -> Self {
        Self { cart }
    }

    pub async fn summary(&self) -> Result<CartSummary, CartError> {
        let cart = self.cart.cart().await?;
        Ok(CartSummary::from_cart(&cart))
    }

    pub async fn increment(&self, product: &Product) -> Result<MutationOutcome, CartError> {
        self.cart
            .update_product_amount(UpdateProductAmount {
                product_id: product.id,
                amount: i64::from(product.amount) + 1,
            })
            .await
    }

    /// `None` when the entry is already at one unit; nothing is dispatched.
    pub async fn decrement(&self, product: &Product) -> Result<Option<MutationOutcome>, CartError> {
        if product.amount <= 1 {
            debug!(product_id = product.id, "Decrement disabled at one unit");
            return Ok(None);
        }
        self.cart
            .update_product_amount(UpdateProductAmount {
                product_id: product.id,
                amount: i64::from(product.amount) - 1,
            })
            .await
            .map(Some)
    }

    pub async fn remove(&self, product_id: ProductId) -> Result<MutationOutcome, CartError> {
        self.cart.remove_product(product_id).await
    }
}
