use serde::{Deserialize, Serialize};

pub type ProductId = u64;

/// A product as served by the catalog, or held as a cart entry.
///
/// Catalog records carry no `amount`, so it decodes as 0. Inside a cart the
/// amount is the quantity the user intends to buy and is always at least 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub price: f64,
    pub image: String,
    #[serde(default)]
    pub amount: u32,
}

impl Product {
    pub fn new(id: ProductId, title: impl Into<String>, price: f64, image: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            price,
            image: image.into(),
            amount: 0,
        }
    }

    pub fn with_amount(mut self, amount: u32) -> Self {
        self.amount = amount;
        self
    }

    pub fn subtotal(&self) -> f64 {
        self.price * f64::from(self.amount)
    }
}

/// Stock snapshot: the most units of a product that can be bought right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
    pub id: ProductId,
    pub amount: u32,
}
