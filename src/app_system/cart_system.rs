use std::sync::Arc;

use tracing::{error, info, instrument};

use crate::actors::CartService;
use crate::catalog::{CatalogApi, HttpCatalog};
use crate::clients::CartClient;
use crate::config::CartConfig;
use crate::error::CartError;
use crate::notify::{Notifier, TracingNotifier};
use crate::store::{CartStore, FileStore, MemoryStore};

/// Owns the cart service for the lifetime of the application.
///
/// Built once at startup; components get the cart through clones of
/// `cart_client`. Call [`CartSystem::shutdown`] at the end.
pub struct CartSystem {
    pub cart_client: CartClient,
    catalog: Arc<dyn CatalogApi>,
    handle: tokio::task::JoinHandle<()>,
}

impl CartSystem {
    /// Start the cart service with explicit collaborators.
    ///
    /// Must be called inside a tokio runtime.
    #[instrument(name = "cart_system", skip_all)]
    pub fn new(
        config: &CartConfig,
        catalog: Arc<dyn CatalogApi>,
        store: Arc<dyn CartStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        info!("Starting cart system");

        let (service, cart_client) =
            CartService::new(config, Arc::clone(&catalog), store, notifier);
        let handle = tokio::spawn(service.run());

        info!("Cart system started successfully");

        Self {
            cart_client,
            catalog,
            handle,
        }
    }

    /// Start against the HTTP catalog, persisting to `storage_dir` when set
    /// and to memory otherwise. Notifications go to the log.
    pub fn from_config(config: &CartConfig) -> Result<Self, CartError> {
        config.validate()?;

        let catalog: Arc<dyn CatalogApi> = Arc::new(HttpCatalog::new(&config.api_base_url)?);
        let store: Arc<dyn CartStore> = match &config.storage_dir {
            Some(dir) => Arc::new(FileStore::open(dir.clone())?),
            None => Arc::new(MemoryStore::new()),
        };

        Ok(Self::new(config, catalog, store, Arc::new(TracingNotifier)))
    }

    pub fn catalog(&self) -> Arc<dyn CatalogApi> {
        Arc::clone(&self.catalog)
    }

    /// Stop the service and wait for it to finish. Lookups still in flight
    /// are abandoned; their callers see `CartError::ServiceDropped`.
    #[instrument(skip(self))]
    pub async fn shutdown(self) -> Result<(), CartError> {
        info!("Shutting down cart system");

        // Already gone is fine; the handle tells us how it ended.
        let _ = self.cart_client.shutdown().await;

        if let Err(e) = self.handle.await {
            error!(error = ?e, "Service shutdown error");
            return Err(CartError::ServiceFailed(e.to_string()));
        }

        info!("Cart system shutdown complete");
        Ok(())
    }
}
