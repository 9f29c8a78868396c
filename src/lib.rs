//! # Cart State
//!
//! The shopping cart of a storefront session: a list of products with
//! quantities, checked against the catalog's stock and written through to
//! persistent storage on every change.
//!
//! ## Terminology Note
//!
//! - **Service** ([`CartService`]) = the actor that owns the cart
//! - **Client** ([`CartClient`]) = a cheap handle for reading and changing it
//!
//! ## Ingredients
//!
//! - **Foundation**
//!     - **Domain types** - Products, stock records and the cart itself → [`Product`], [`Stock`], [`Cart`]
//!     - **Messages** - Typed requests with oneshot replies → [`CartRequest`], [`MutationOutcome`]
//! - **Collaborators**
//!     - **Catalog** - Product and stock lookups over HTTP → [`CatalogApi`], [`HttpCatalog`]
//!     - **Store** - Key/value persistence of the serialized cart → [`CartStore`], [`FileStore`], [`MemoryStore`]
//!     - **Notifier** - User-facing messages for rejected changes → [`Notifier`], [`TracingNotifier`]
//! - **Service and client**
//!     - **Background lookups** - Catalog calls run beside the mailbox and post back → [`CartService`]
//!     - **Generated clients** - `client_method!` wraps each request → [`CartClient`]
//! - **System concerns**
//!     - **System coordinator** - Startup from config, shutdown → [`CartSystem`]
//!     - **Tracing setup** → [`setup_tracing`]
//!     - **Views** - What the header, home page and cart page derive from the cart → [`views`]
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! # use cart_state::{CartConfig, CartSystem};
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let system = CartSystem::from_config(&CartConfig::from_env()?)?;
//!
//! let outcome = system.cart_client.add_product(3).await?;
//! let cart = system.cart_client.cart().await?;
//!
//! system.shutdown().await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Expected Tracing Output
//!
//! ```text
//! INFO cart_system: Starting cart system
//! INFO cart_service: CartService starting items=2
//! DEBUG add_product{product_id=3}: Sending request
//! DEBUG cart_service:handle_add_product{product_id=3}: Processing add_product request
//! DEBUG cart_service:handle_add_product{product_id=3}:stock{id=3}: Sending request url=http://localhost:3333/stock/3
//! INFO cart_service:handle_add_lookup{product_id=3}: Cart updated items=3
//! ```

pub mod actors;
pub mod app_system;
pub mod catalog;
pub mod clients;
pub mod config;
pub mod domain;
pub mod error;
pub mod messages;
pub mod notify;
pub mod store;
pub mod views;

#[cfg(test)]
mod mock_framework;

pub use actors::CartService;
pub use app_system::{setup_tracing, CartSystem};
pub use catalog::{CatalogApi, HttpCatalog};
pub use clients::CartClient;
pub use config::{CartConfig, NotificationMessages};
pub use domain::{Cart, CartRejection, Product, ProductId, Stock};
pub use error::{CartError, CatalogError, ConfigError, StoreError, ViewError};
pub use messages::{CartRequest, MutationOutcome, UpdateProductAmount};
pub use notify::{ChannelNotifier, Notification, NotificationKind, Notifier, TracingNotifier};
pub use store::{CartStore, FileStore, MemoryStore};
