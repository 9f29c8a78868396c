//! # Mock Framework
//!
//! Utilities for testing the cart in isolation.
//!
//! - [`create_mock_client`] hands out a [`CartClient`] whose requests land on
//!   a receiver the test controls; helpers like [`expect_add_product`] pull
//!   them off and let the test answer. Use it to check what a view dispatches.
//! - [`FakeCatalog`], [`RecordingStore`] and [`RecordingNotifier`] stand in
//!   for the network, storage and notification collaborators of a real
//!   [`CartService`].

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::{mpsc, oneshot};

use crate::actors::CartService;
use crate::catalog::CatalogApi;
use crate::clients::CartClient;
use crate::config::{CartConfig, DEFAULT_STORAGE_KEY};
use crate::domain::{Cart, Product, ProductId, Stock};
use crate::error::{CatalogError, StoreError};
use crate::messages::{CartRequest, MutationOutcome, UpdateProductAmount};
use crate::notify::{Notification, Notifier};
use crate::store::CartStore;

// =============================================================================
// MOCK CLIENT
// =============================================================================

/// Creates a mock client and a receiver for asserting requests.
pub fn create_mock_client(buffer_size: usize) -> (CartClient, mpsc::Receiver<CartRequest>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (CartClient::new(sender), receiver)
}

/// Helper to verify that the next message is a GetCart request
pub async fn expect_get_cart(receiver: &mut mpsc::Receiver<CartRequest>) -> Option<oneshot::Sender<Vec<Product>>> {
    match receiver.recv().await {
        Some(CartRequest::GetCart { respond_to }) => Some(respond_to),
        _ => None,
    }
}

/// Helper to verify that the next message is an AddProduct request
pub async fn expect_add_product(
    receiver: &mut mpsc::Receiver<CartRequest>,
) -> Option<(ProductId, oneshot::Sender<MutationOutcome>)> {
    match receiver.recv().await {
        Some(CartRequest::AddProduct { product_id, respond_to }) => Some((product_id, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a RemoveProduct request
pub async fn expect_remove_product(
    receiver: &mut mpsc::Receiver<CartRequest>,
) -> Option<(ProductId, oneshot::Sender<MutationOutcome>)> {
    match receiver.recv().await {
        Some(CartRequest::RemoveProduct { product_id, respond_to }) => Some((product_id, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is an UpdateProductAmount request
pub async fn expect_update_product_amount(
    receiver: &mut mpsc::Receiver<CartRequest>,
) -> Option<(UpdateProductAmount, oneshot::Sender<MutationOutcome>)> {
    match receiver.recv().await {
        Some(CartRequest::UpdateProductAmount { update, respond_to }) => Some((update, respond_to)),
        _ => None,
    }
}

// =============================================================================
// FAKE CATALOG
// =============================================================================

/// In-memory catalog. Unknown ids answer `NotFound`, like the real API's 404.
#[derive(Default)]
pub struct FakeCatalog {
    products: Mutex<Vec<Product>>,
    stock: Mutex<HashMap<ProductId, Result<Stock, CatalogError>>>,
    stock_delays: Mutex<HashMap<ProductId, VecDeque<Duration>>>,
    stock_calls: Mutex<Vec<ProductId>>,
    product_calls: Mutex<Vec<ProductId>>,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_product(mut self, product: Product) -> Self {
        self.products.get_mut().push(product);
        self
    }

    pub fn with_stock(self, id: ProductId, amount: u32) -> Self {
        self.with_stock_record(id, Stock { id, amount })
    }

    /// Serve `stock` for `id` verbatim, even when its own id differs.
    pub fn with_stock_record(mut self, id: ProductId, stock: Stock) -> Self {
        self.stock.get_mut().insert(id, Ok(stock));
        self
    }

    pub fn with_stock_error(mut self, id: ProductId, error: CatalogError) -> Self {
        self.stock.get_mut().insert(id, Err(error));
        self
    }

    /// Successive stock lookups for `id` sleep for these durations in turn.
    pub fn with_stock_delays(mut self, id: ProductId, delays: impl IntoIterator<Item = Duration>) -> Self {
        self.stock_delays.get_mut().insert(id, delays.into_iter().collect());
        self
    }

    pub fn stock_calls(&self) -> Vec<ProductId> {
        self.stock_calls.lock().clone()
    }

    pub fn product_calls(&self) -> Vec<ProductId> {
        self.product_calls.lock().clone()
    }
}

#[async_trait]
impl CatalogApi for FakeCatalog {
    async fn products(&self) -> Result<Vec<Product>, CatalogError> {
        Ok(self.products.lock().clone())
    }

    async fn product(&self, id: ProductId) -> Result<Product, CatalogError> {
        self.product_calls.lock().push(id);
        self.products
            .lock()
            .iter()
            .find(|product| product.id == id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(format!("products/{id}")))
    }

    async fn stock(&self, id: ProductId) -> Result<Stock, CatalogError> {
        self.stock_calls.lock().push(id);
        let delay = self
            .stock_delays
            .lock()
            .get_mut(&id)
            .and_then(|delays| delays.pop_front());
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.stock
            .lock()
            .get(&id)
            .cloned()
            .unwrap_or_else(|| Err(CatalogError::NotFound(format!("stock/{id}"))))
    }
}

// =============================================================================
// RECORDING STORE AND NOTIFIER
// =============================================================================

/// Memory store that remembers every write and can be told to fail them.
#[derive(Default)]
pub struct RecordingStore {
    entries: Mutex<HashMap<String, String>>,
    writes: Mutex<Vec<(String, String)>>,
    fail_writes: AtomicBool,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: &str, value: &str) -> Self {
        let store = Self::new();
        store.entries.lock().insert(key.to_string(), value.to_string());
        store
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn writes(&self) -> Vec<(String, String)> {
        self.writes.lock().clone()
    }

    pub fn last_write(&self) -> Option<(String, String)> {
        self.writes.lock().last().cloned()
    }
}

impl CartStore for RecordingStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Io(std::io::Error::other("disk full")));
        }
        self.writes.lock().push((key.to_string(), value.to_string()));
        self.entries.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    notifications: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.lock().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.notifications
            .lock()
            .iter()
            .map(|notification| notification.message.clone())
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.notifications.lock().push(notification);
    }
}

// =============================================================================
// FIXTURES
// =============================================================================

pub fn initial_cart() -> Vec<Product> {
    vec![
        Product::new(1, "Sk Arch Fit - Vibrant Step Navy", 219.9, "public/assets/archfit.jpg").with_amount(2),
        Product::new(2, "Max Protect - Fast Track", 115.0, "public/assets/237304_BLYL.jpg").with_amount(1),
    ]
}

/// A store already holding [`initial_cart`] under the default key.
pub fn seeded_store() -> RecordingStore {
    let raw = Cart::new(initial_cart()).to_json().unwrap();
    RecordingStore::with_entry(DEFAULT_STORAGE_KEY, &raw)
}

/// Spawns a cart service with the given fakes and default configuration.
pub fn start_service(catalog: Arc<FakeCatalog>, store: Arc<RecordingStore>) -> (CartClient, Arc<RecordingNotifier>) {
    start_service_with(&CartConfig::default(), catalog, store)
}

pub fn start_service_with(
    config: &CartConfig,
    catalog: Arc<FakeCatalog>,
    store: Arc<RecordingStore>,
) -> (CartClient, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::new());
    let (service, client) = CartService::new(config, catalog, store, Arc::clone(&notifier) as Arc<dyn Notifier>);
    tokio::spawn(service.run());
    (client, notifier)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_client() {
        let (client, mut receiver) = create_mock_client(10);

        let add_task = tokio::spawn(async move { client.add_product(3).await });

        let (product_id, responder) = expect_add_product(&mut receiver).await.expect("Expected AddProduct request");
        assert_eq!(product_id, 3);
        responder.send(MutationOutcome::Applied).unwrap();

        let result = add_task.await.unwrap();
        assert_eq!(result, Ok(MutationOutcome::Applied));
    }

    #[tokio::test]
    async fn fake_catalog_answers_not_found_for_unknown_ids() {
        let catalog = FakeCatalog::new().with_stock(1, 2);
        assert_eq!(catalog.stock(1).await, Ok(Stock { id: 1, amount: 2 }));
        assert_eq!(
            catalog.stock(4).await,
            Err(CatalogError::NotFound("stock/4".to_string()))
        );
        assert!(catalog.product(4).await.is_err());
        assert_eq!(catalog.stock_calls(), vec![1, 4]);
    }
}
