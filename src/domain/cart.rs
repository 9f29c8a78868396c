//! The cart value and its transitions.
//!
//! Every transition borrows the current cart and returns a new one, so a
//! rejected request can never leave a half-applied cart behind.

use std::collections::HashSet;

use serde::de::Error as _;
use serde::{Deserialize, Serialize};

use super::product::{Product, ProductId};

/// Why a transition was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartRejection {
    OutOfStock { requested: u32, available: u32 },
    NotInCart(ProductId),
}

/// Ordered list of cart entries, unique by product id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<Product>,
}

impl Cart {
    pub fn new(items: Vec<Product>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[Product] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, product_id: ProductId) -> Option<&Product> {
        self.items.iter().find(|product| product.id == product_id)
    }

    /// Quantity held for `product_id`, 0 when it is not in the cart.
    pub fn amount_of(&self, product_id: ProductId) -> u32 {
        self.get(product_id).map_or(0, |product| product.amount)
    }

    /// One more unit of `product_id`.
    ///
    /// An entry already in the cart is bumped in place. A new entry is built
    /// from `fetched` with amount 1 and appended; without a fetched record a
    /// new entry cannot be built and the request is refused as `NotInCart`.
    pub fn with_added(
        &self,
        product_id: ProductId,
        available: u32,
        fetched: Option<Product>,
    ) -> Result<Cart, CartRejection> {
        let requested = self.amount_of(product_id).saturating_add(1);
        if requested > available {
            return Err(CartRejection::OutOfStock { requested, available });
        }

        let mut items = self.items.clone();
        match items.iter_mut().find(|product| product.id == product_id) {
            Some(existing) => existing.amount = requested,
            None => {
                let mut product = fetched.ok_or(CartRejection::NotInCart(product_id))?;
                product.id = product_id;
                product.amount = 1;
                items.push(product);
            }
        }
        Ok(Cart { items })
    }

    /// Sets the quantity of an entry. The stock check comes first, so an
    /// oversized request for an unknown product reports `OutOfStock`.
    pub fn with_amount(
        &self,
        product_id: ProductId,
        amount: u32,
        available: u32,
    ) -> Result<Cart, CartRejection> {
        debug_assert!(amount >= 1, "cart entries hold at least one unit");
        if amount > available {
            return Err(CartRejection::OutOfStock {
                requested: amount,
                available,
            });
        }

        let mut items = self.items.clone();
        let existing = items
            .iter_mut()
            .find(|product| product.id == product_id)
            .ok_or(CartRejection::NotInCart(product_id))?;
        existing.amount = amount;
        Ok(Cart { items })
    }

    pub fn without(&self, product_id: ProductId) -> Result<Cart, CartRejection> {
        let index = self
            .items
            .iter()
            .position(|product| product.id == product_id)
            .ok_or(CartRejection::NotInCart(product_id))?;
        let mut items = self.items.clone();
        items.remove(index);
        Ok(Cart { items })
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parses a saved cart. Entries without units or with a repeated id
    /// make the whole value invalid.
    pub fn from_json(raw: &str) -> Result<Cart, serde_json::Error> {
        let cart: Cart = serde_json::from_str(raw)?;
        let mut seen = HashSet::with_capacity(cart.items.len());
        for product in &cart.items {
            if product.amount == 0 {
                return Err(serde_json::Error::custom(format!(
                    "cart entry {} holds no units",
                    product.id
                )));
            }
            if !seen.insert(product.id) {
                return Err(serde_json::Error::custom(format!(
                    "cart entry {} appears more than once",
                    product.id
                )));
            }
        }
        Ok(cart)
    }
}
