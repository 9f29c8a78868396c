use crate::clients::CartClient;
use crate::domain::Product;
use crate::error::CartError;

/// Number of distinct products in the cart, regardless of quantities.
pub fn cart_size(cart: &[Product]) -> usize {
    cart.len()
}

pub fn cart_size_label(size: usize) -> String {
    match size {
        1 => "1 item".to_string(),
        n => format!("{n} items"),
    }
}

/// The cart counter in the page header.
#[derive(Clone)]
pub struct Header {
    cart: CartClient,
}

impl Header {
    pub fn new(cart: CartClient) -> Self {
        Self { cart }
    }

    pub async fn cart_size_label(&self) -> Result<String, CartError> {
        let cart = self.cart.cart().await?;
        Ok(cart_size_label(cart_size(&cart)))
    }
}
