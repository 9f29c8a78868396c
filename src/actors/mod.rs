use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument, warn, Instrument};

use crate::catalog::CatalogApi;
use crate::clients::CartClient;
use crate::config::{CartConfig, NotificationMessages};
use crate::domain::{Cart, CartRejection, ProductId, Stock};
use crate::error::CatalogError;
use crate::messages::{AddLookup, CartRequest, MutationOutcome, ServiceResponse, UpdateProductAmount};
use crate::notify::{Notification, NotificationKind, Notifier};
use crate::store::{load_cart, save_cart, CartStore};

// =============================================================================
// CART SERVICE
// =============================================================================

/// Owns the cart for the lifetime of the session and applies every change
/// to it.
///
/// **Lookups run beside the mailbox.** Adds and updates need the catalog, so
/// the handler spawns a task for the network calls and returns to the
/// mailbox at once. When the task is done it posts the result back, and the
/// service checks it against the cart as it stands *then*. Two calls on the
/// same product can therefore overlap; whichever finishes last wins.
///
/// **Write-through.** A new cart replaces the held one only after it has
/// been written to the store. Every other ending leaves both untouched.
pub struct CartService {
    receiver: mpsc::Receiver<CartRequest>,
    mailbox: mpsc::WeakSender<CartRequest>,
    cart: Cart,
    catalog: Arc<dyn CatalogApi>,
    store: Arc<dyn CartStore>,
    notifier: Arc<dyn Notifier>,
    storage_key: String,
    messages: NotificationMessages,
}

impl CartService {
    /// Loads the saved cart once and returns the service with its client.
    pub fn new(
        config: &CartConfig,
        catalog: Arc<dyn CatalogApi>,
        store: Arc<dyn CartStore>,
        notifier: Arc<dyn Notifier>,
    ) -> (Self, CartClient) {
        let (sender, receiver) = mpsc::channel(config.mailbox_size.max(1));
        let cart = load_cart(store.as_ref(), &config.storage_key);
        let service = Self {
            receiver,
            mailbox: sender.downgrade(),
            cart,
            catalog,
            store,
            notifier,
            storage_key: config.storage_key.clone(),
            messages: config.messages.clone(),
        };
        (service, CartClient::new(sender))
    }

    #[instrument(name = "cart_service", skip(self))]
    pub async fn run(mut self) {
        info!(items = self.cart.len(), "CartService starting");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                CartRequest::GetCart { respond_to } => {
                    let _ = respond_to.send(self.cart.items().to_vec());
                }
                CartRequest::AddProduct { product_id, respond_to } => {
                    self.handle_add_product(product_id, respond_to);
                }
                CartRequest::RemoveProduct { product_id, respond_to } => {
                    self.handle_remove_product(product_id, respond_to);
                }
                CartRequest::UpdateProductAmount { update, respond_to } => {
                    self.handle_update_product_amount(update, respond_to);
                }
                CartRequest::AddLookupFinished {
                    product_id,
                    lookup,
                    respond_to,
                } => {
                    self.handle_add_lookup(product_id, lookup, respond_to);
                }
                CartRequest::UpdateLookupFinished {
                    update,
                    stock,
                    respond_to,
                } => {
                    self.handle_update_lookup(update, stock, respond_to);
                }
                CartRequest::Shutdown => {
                    info!("CartService shutting down");
                    break;
                }
            }
        }

        info!("CartService stopped");
    }

    #[instrument(skip(self, respond_to))]
    fn handle_add_product(&self, product_id: ProductId, respond_to: ServiceResponse<MutationOutcome>) {
        debug!("Processing add_product request");

        let Some(mailbox) = self.mailbox.upgrade() else {
            self.finish(
                MutationOutcome::Failed("cart service is shutting down".to_string()),
                NotificationKind::AddFailed,
                respond_to,
            );
            return;
        };

        let in_cart = self.cart.amount_of(product_id);
        let catalog = Arc::clone(&self.catalog);
        tokio::spawn(
            async move {
                let lookup = lookup_for_add(catalog.as_ref(), product_id, in_cart).await;
                let _ = mailbox
                    .send(CartRequest::AddLookupFinished {
                        product_id,
                        lookup,
                        respond_to,
                    })
                    .await;
            }
            .in_current_span(),
        );
    }

    #[instrument(skip(self, lookup, respond_to))]
    fn handle_add_lookup(
        &mut self,
        product_id: ProductId,
        lookup: Result<AddLookup, CatalogError>,
        respond_to: ServiceResponse<MutationOutcome>,
    ) {
        let outcome = match lookup {
            Err(e) => {
                error!(error = %e, "Catalog lookup failed");
                MutationOutcome::Failed(e.to_string())
            }
            Ok(AddLookup { stock, product }) => {
                match self.cart.with_added(product_id, stock.amount, product) {
                    Ok(next) => self.commit(next),
                    Err(CartRejection::OutOfStock { requested, available }) => {
                        warn!(requested, available, "Not enough stock to add product");
                        MutationOutcome::OutOfStock {
                            requested: u64::from(requested),
                            available,
                        }
                    }
                    Err(CartRejection::NotInCart(_)) => {
                        // Left the cart while its stock was being fetched.
                        debug!("Product left the cart during lookup, fetching its record");
                        return self.fetch_record_for_add(product_id, stock, respond_to);
                    }
                }
            }
        };

        self.finish(outcome, NotificationKind::AddFailed, respond_to);
    }

    /// Second leg of an add whose product was in the cart at dispatch but is
    /// gone by the time stock arrives. The fetched record is posted back with
    /// the stock already known and goes through `handle_add_lookup` again.
    fn fetch_record_for_add(
        &self,
        product_id: ProductId,
        stock: Stock,
        respond_to: ServiceResponse<MutationOutcome>,
    ) {
        let Some(mailbox) = self.mailbox.upgrade() else {
            self.finish(
                MutationOutcome::Failed("cart service is shutting down".to_string()),
                NotificationKind::AddFailed,
                respond_to,
            );
            return;
        };

        let catalog = Arc::clone(&self.catalog);
        tokio::spawn(
            async move {
                let lookup = catalog.product(product_id).await.map(|product| AddLookup {
                    stock,
                    product: Some(product),
                });
                let _ = mailbox
                    .send(CartRequest::AddLookupFinished {
                        product_id,
                        lookup,
                        respond_to,
                    })
                    .await;
            }
            .in_current_span(),
        );
    }

    /// Needs no lookup, so it is decided on the spot.
    #[instrument(skip(self, respond_to))]
    fn handle_remove_product(&mut self, product_id: ProductId, respond_to: ServiceResponse<MutationOutcome>) {
        debug!("Processing remove_product request");

        let outcome = match self.cart.without(product_id) {
            Ok(next) => self.commit(next),
            Err(_) => {
                warn!("Product not in cart");
                MutationOutcome::NotInCart
            }
        };

        self.finish(outcome, NotificationKind::RemoveFailed, respond_to);
    }

    #[instrument(fields(product_id = update.product_id, amount = update.amount), skip(self, update, respond_to))]
    fn handle_update_product_amount(
        &self,
        update: UpdateProductAmount,
        respond_to: ServiceResponse<MutationOutcome>,
    ) {
        debug!("Processing update_product_amount request");

        if update.amount <= 0 {
            debug!("Ignoring non-positive amount");
            let _ = respond_to.send(MutationOutcome::Ignored);
            return;
        }

        let Some(mailbox) = self.mailbox.upgrade() else {
            self.finish(
                MutationOutcome::Failed("cart service is shutting down".to_string()),
                NotificationKind::UpdateFailed,
                respond_to,
            );
            return;
        };

        let catalog = Arc::clone(&self.catalog);
        tokio::spawn(
            async move {
                let stock = catalog.stock(update.product_id).await;
                let _ = mailbox
                    .send(CartRequest::UpdateLookupFinished {
                        update,
                        stock,
                        respond_to,
                    })
                    .await;
            }
            .in_current_span(),
        );
    }

    #[instrument(fields(product_id = update.product_id, amount = update.amount), skip(self, update, stock, respond_to))]
    fn handle_update_lookup(
        &mut self,
        update: UpdateProductAmount,
        stock: Result<Stock, CatalogError>,
        respond_to: ServiceResponse<MutationOutcome>,
    ) {
        let outcome = match stock {
            Err(e) => {
                error!(error = %e, "Stock lookup failed");
                MutationOutcome::Failed(e.to_string())
            }
            Ok(stock) => match u32::try_from(update.amount) {
                Err(_) => MutationOutcome::OutOfStock {
                    requested: update.amount.unsigned_abs(),
                    available: stock.amount,
                },
                Ok(amount) => match self.cart.with_amount(update.product_id, amount, stock.amount) {
                    Ok(next) => self.commit(next),
                    Err(CartRejection::OutOfStock { requested, available }) => {
                        warn!(requested, available, "Not enough stock for amount");
                        MutationOutcome::OutOfStock {
                            requested: u64::from(requested),
                            available,
                        }
                    }
                    Err(CartRejection::NotInCart(_)) => {
                        warn!("Product not in cart");
                        MutationOutcome::NotInCart
                    }
                },
            },
        };

        self.finish(outcome, NotificationKind::UpdateFailed, respond_to);
    }

    /// Writes `next` through to the store, then makes it the held cart.
    fn commit(&mut self, next: Cart) -> MutationOutcome {
        match save_cart(self.store.as_ref(), &self.storage_key, &next) {
            Ok(()) => {
                self.cart = next;
                info!(items = self.cart.len(), "Cart updated");
                MutationOutcome::Applied
            }
            Err(e) => {
                error!(error = %e, "Cart write-through failed, keeping previous cart");
                MutationOutcome::Failed(e.to_string())
            }
        }
    }

    /// Raises the notification that matches `outcome` and replies.
    /// `failure` is the operation's own error notification.
    fn finish(
        &self,
        outcome: MutationOutcome,
        failure: NotificationKind,
        respond_to: ServiceResponse<MutationOutcome>,
    ) {
        let kind = match &outcome {
            MutationOutcome::Applied | MutationOutcome::Ignored => None,
            MutationOutcome::OutOfStock { .. } => Some(NotificationKind::OutOfStock),
            MutationOutcome::NotInCart | MutationOutcome::Failed(_) => Some(failure),
        };
        if let Some(kind) = kind {
            self.notifier.notify(Notification {
                kind,
                message: self.messages.message_for(kind).to_string(),
            });
        }
        let _ = respond_to.send(outcome);
    }
}

/// Stock first; the product record only when the product is new to the
/// cart and the stock can cover one unit.
async fn lookup_for_add(
    catalog: &dyn CatalogApi,
    product_id: ProductId,
    in_cart: u32,
) -> Result<AddLookup, CatalogError> {
    let stock = catalog.stock(product_id).await?;
    let product = if in_cart == 0 && stock.amount >= 1 {
        Some(catalog.product(product_id).await?)
    } else {
        None
    };
    Ok(AddLookup { stock, product })
}
