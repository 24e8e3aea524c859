//! Startup: environment, logging, configuration, composition, walkthrough.

use anyhow::Result;
use entity_bridge_adapters::infrastructure::AdapterConfig;
use entity_bridge_domain::{Order, PageRequest, Sort};
use entity_bridge_ports::outbound::PagingAndSortingRepository;
use rust_decimal::Decimal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::composition::{new_catalog_state, CatalogState, Product};

pub async fn run() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "entity_bridge=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Entity Bridge");

    let config = AdapterConfig::from_env()?;
    tracing::debug!(?config, "Loaded adapter configuration");

    let state = new_catalog_state(&config).await?;
    walkthrough(&state).await?;

    tracing::info!("Entity Bridge finished");
    Ok(())
}

/// Exercise the adapted catalogue once end to end
async fn walkthrough(state: &CatalogState) -> Result<()> {
    let products = &state.products;

    let saved = products
        .save_all(vec![
            Product::new("Desk lamp", Decimal::new(3450, 2)),
            Product::new("Bookshelf", Decimal::new(12900, 2)),
            Product::new("Side table", Decimal::new(7500, 2)),
        ])
        .await?;
    tracing::info!(count = saved.len(), "Saved products");

    if let Some(mut lamp) = saved.into_iter().next() {
        lamp.price = Decimal::new(2999, 2);
        let lamp = products.save(lamp).await?;
        tracing::info!(id = ?lamp.id, version = ?lamp.version, "Repriced product");
    }

    let by_price = products
        .find_all_sorted(&Sort::by([Order::desc("price")]))
        .await?;
    for product in &by_price {
        tracing::info!(id = ?product.id, name = %product.name, price = %product.price, "Product");
    }

    let page = products
        .find_page(&PageRequest::sorted(0, 2, Sort::by_properties(["name"]))?)
        .await?;
    tracing::info!(
        shown = page.content().len(),
        total = page.total_elements(),
        pages = page.total_pages(),
        "First page by name"
    );

    let pattern = products.escape_character().escape("50%_off");
    tracing::info!(%pattern, lazy = ?products.lazy_operations(), "Adapter surface");

    tracing::info!(
        pending = state.factory.pending().await,
        found = products.find_by_id(-1).await?.is_some(),
        stored = state.store.snapshot().await.len(),
        "Negative ids have no stored counterpart"
    );
    Ok(())
}
