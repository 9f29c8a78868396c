use tokio::sync::{mpsc, oneshot};
use tracing::{debug, instrument};

use crate::domain::{Product, ProductId};
use crate::error::CartError;
use crate::messages::{CartRequest, MutationOutcome, UpdateProductAmount};

// =============================================================================
// CLIENT METHOD MACRO
// =============================================================================

/// Generate client methods with oneshot channel boilerplate and automatic tracing.
/// The only errors are mailbox failures; cart rejections arrive as outcomes.
macro_rules! client_method {
    ($client:ty => fn $method:ident($($param:ident: $param_type:ty),*) -> $return_type:ty as $request:ident::$variant:ident) => {
        impl $client {
            #[instrument(skip(self))]
            pub async fn $method(&self, $($param: $param_type),*) -> Result<$return_type, CartError> {
                debug!("Sending request");
                let (respond_to, response) = oneshot::channel();
                self.sender
                    .send($request::$variant {
                        $($param,)*
                        respond_to,
                    })
                    .await
                    .map_err(|_| CartError::ServiceClosed)?;

                response.await.map_err(|_| CartError::ServiceDropped)
            }
        }
    };
}

// =============================================================================
// CART CLIENT
// =============================================================================

/// Handle to the cart service. Cheap to clone; hand one to every component
/// that reads or changes the cart.
#[derive(Clone, Debug)]
pub struct CartClient {
    sender: mpsc::Sender<CartRequest>,
}

impl CartClient {
    pub(crate) fn new(sender: mpsc::Sender<CartRequest>) -> Self {
        Self { sender }
    }

    #[instrument(skip(self))]
    pub async fn shutdown(&self) -> Result<(), CartError> {
        debug!("Sending shutdown request");
        self.sender
            .send(CartRequest::Shutdown)
            .await
            .map_err(|_| CartError::ServiceClosed)
    }

    /// Shorthand for [`CartClient::update_product_amount`].
    pub async fn set_amount(&self, product_id: ProductId, amount: i64) -> Result<MutationOutcome, CartError> {
        self.update_product_amount(UpdateProductAmount { product_id, amount })
            .await
    }
}

client_method!(CartClient => fn cart() -> Vec<Product> as CartRequest::GetCart);
client_method!(CartClient => fn add_product(product_id: ProductId) -> MutationOutcome as CartRequest::AddProduct);
client_method!(CartClient => fn remove_product(product_id: ProductId) -> MutationOutcome as CartRequest::RemoveProduct);
client_method!(CartClient => fn update_product_amount(update: UpdateProductAmount) -> MutationOutcome as CartRequest::UpdateProductAmount);
