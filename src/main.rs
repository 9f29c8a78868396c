use tracing::{error, info, warn, Instrument};

use cart_state::views::{CartPage, Header, HomePage};
use cart_state::{setup_tracing, CartConfig, CartSystem, MutationOutcome};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_tracing();

    let config = CartConfig::from_env()?;
    info!(api = %config.api_base_url, storage = ?config.storage_dir, "Starting cart demo");

    let system = CartSystem::from_config(&config)?;
    let home = HomePage::new(system.catalog(), system.cart_client.clone());
    let header = Header::new(system.cart_client.clone());
    let cart_page = CartPage::new(system.cart_client.clone());

    let span = tracing::info_span!("home_page");
    let listings = async {
        info!("Loading products");
        home.load().await
    }
    .instrument(span)
    .await;

    match listings {
        Ok(listings) => {
            for listing in &listings {
                info!(
                    id = listing.product.id,
                    title = %listing.product.title,
                    price = %listing.price_formatted,
                    in_cart = listing.cart_quantity,
                    "Product"
                );
            }

            if let Some(first) = listings.first() {
                let span = tracing::info_span!("add_to_cart", product_id = first.product.id);
                let outcome = async { home.add_product(first.product.id).await }
                    .instrument(span)
                    .await?;
                match outcome {
                    MutationOutcome::Applied => info!("Product added"),
                    other => warn!(outcome = ?other, "Product not added"),
                }
            }
        }
        Err(e) => error!(error = %e, "Catalog unavailable"),
    }

    info!(label = %header.cart_size_label().await?, "Header");

    let summary = cart_page.summary().await?;
    for line in &summary.lines {
        info!(
            title = %line.product.title,
            amount = line.product.amount,
            subtotal = %line.subtotal_formatted,
            "Cart line"
        );
    }
    info!(total = %summary.total_formatted, "Cart total");

    system.shutdown().await?;

    info!("Cart demo completed");
    Ok(())
}
