//! Messages understood by the cart service, each carrying a oneshot channel
//! for its reply.

use tokio::sync::oneshot;

use crate::domain::{Product, ProductId, Stock};
use crate::error::CatalogError;

pub type ServiceResponse<T> = oneshot::Sender<T>;

/// Request to set an entry's quantity. `amount` is signed so that
/// non-positive requests can be expressed, and ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateProductAmount {
    pub product_id: ProductId,
    pub amount: i64,
}

/// How a mutating call ended. Only `Applied` changed the cart and wrote it
/// through to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome {
    Applied,
    /// Update with a non-positive amount; nothing happened.
    Ignored,
    OutOfStock { requested: u64, available: u32 },
    NotInCart,
    Failed(String),
}

/// Catalog data gathered for an add before it is checked against the cart.
#[derive(Debug, Clone)]
pub struct AddLookup {
    pub stock: Stock,
    /// Only fetched when the product was not in the cart at dispatch.
    pub product: Option<Product>,
}

#[derive(Debug)]
pub enum CartRequest {
    GetCart {
        respond_to: ServiceResponse<Vec<Product>>,
    },
    AddProduct {
        product_id: ProductId,
        respond_to: ServiceResponse<MutationOutcome>,
    },
    RemoveProduct {
        product_id: ProductId,
        respond_to: ServiceResponse<MutationOutcome>,
    },
    UpdateProductAmount {
        update: UpdateProductAmount,
        respond_to: ServiceResponse<MutationOutcome>,
    },
    /// Posted back by the service's own lookup task.
    AddLookupFinished {
        product_id: ProductId,
        lookup: Result<AddLookup, CatalogError>,
        respond_to: ServiceResponse<MutationOutcome>,
    },
    /// Posted back by the service's own lookup task.
    UpdateLookupFinished {
        update: UpdateProductAmount,
        stock: Result<Stock, CatalogError>,
        respond_to: ServiceResponse<MutationOutcome>,
    },
    Shutdown,
}
