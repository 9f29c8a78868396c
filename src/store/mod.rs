//! Durable key-value storage for the serialized cart.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use tracing::{debug, warn};

use crate::domain::Cart;
use crate::error::StoreError;

/// Synchronous get/set storage, the shape of browser-local storage.
pub trait CartStore: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Reads the cart saved under `key`. Anything missing, unreadable or
/// unparseable yields an empty cart.
pub fn load_cart(store: &dyn CartStore, key: &str) -> Cart {
    match store.get_item(key) {
        Ok(Some(raw)) => match Cart::from_json(&raw) {
            Ok(cart) => {
                debug!(key, items = cart.len(), "Loaded saved cart");
                cart
            }
            Err(e) => {
                warn!(key, error = %e, "Saved cart is malformed, starting empty");
                Cart::default()
            }
        },
        Ok(None) => {
            debug!(key, "No saved cart, starting empty");
            Cart::default()
        }
        Err(e) => {
            warn!(key, error = %e, "Saved cart could not be read, starting empty");
            Cart::default()
        }
    }
}

/// Overwrites the entry under `key` with the whole cart.
pub fn save_cart(store: &dyn CartStore, key: &str, cart: &Cart) -> Result<(), StoreError> {
    let raw = cart.to_json()?;
    store.set_item(key, &raw)
}
