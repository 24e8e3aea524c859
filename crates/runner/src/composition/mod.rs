//! Composition root: builds the collaborators, the adapter factory and the
//! catalogue adapter, then runs the readiness check.

mod catalog;

use std::sync::Arc;

use entity_bridge_adapters::infrastructure::{AdapterConfig, RepositoryRegistration, RepositoryRegistry};
use entity_bridge_app::application::services::{
    AdapterDefaults, AdapterDependencies, AdapterFactory, EntityAdapter,
};
use entity_bridge_domain::EntityDescriptor;
use uuid::Uuid;

pub use catalog::{Product, ProductRecord, ProductStore};

/// Everything the walkthrough needs, validated and ready
pub struct CatalogState {
    pub factory: AdapterFactory,
    pub products: Arc<EntityAdapter<Product, i64>>,
    pub store: Arc<ProductStore>,
}

/// Configuration defaults as seen by the adapter factory
pub fn adapter_defaults(config: &AdapterConfig) -> AdapterDefaults {
    AdapterDefaults {
        escape_character: config.escape_character,
        map_id: config.map_id.clone(),
        convert_body: config.convert_body,
        convert_id: config.convert_id,
        use_conversion_service: config.use_conversion_service,
    }
}

pub async fn new_catalog_state(config: &AdapterConfig) -> anyhow::Result<CatalogState> {
    let store = catalog::product_store();
    let repositories = RepositoryRegistry::new().with(RepositoryRegistration::typed::<
        ProductStore,
        ProductRecord,
        Uuid,
    >("products", Arc::clone(&store)));

    let dependencies = AdapterDependencies::new(
        Arc::new(catalog::product_mapper()),
        Arc::new(repositories),
        Arc::new(catalog::product_metadata()),
    )
    .with_conversion(Arc::new(catalog::product_converters()));

    let factory = AdapterFactory::new(dependencies, adapter_defaults(config));
    let products = factory
        .create::<Product, i64>(EntityDescriptor::builder::<Product, ProductRecord>())
        .await;

    let validated = factory.validate_after_refresh().await?;
    tracing::info!(adapters = validated, "Composition complete");

    Ok(CatalogState {
        factory,
        products,
        store,
    })
}
