//! E2E tests for adapter wiring and the readiness check.
//!
//! Tests verify:
//! - Missing and ambiguous backing repositories fail validation
//! - Repository selectors pick one of several candidates
//! - Configuration defaults reach every adapter
//! - Adapters created after startup wait for the next readiness check

use std::sync::Arc;

use entity_bridge_adapters::infrastructure::RepositoryRegistry;
use entity_bridge_domain::{RepositorySelector, TypeKey};
use entity_bridge_ports::outbound::PagingAndSortingRepository;
use rust_decimal_macros::dec;
use uuid::Uuid;

use super::{
    dependencies, order_descriptor, order_registration, order_store, Order, OrderEntity,
    OrderStore, OrderTestContext,
};
use crate::application::services::{AdapterDefaults, AdapterFactory};
use crate::application::ConfigurationError;

#[tokio::test]
async fn test_missing_repository_fails_validation() {
    let factory = AdapterFactory::new(dependencies(RepositoryRegistry::new()), AdapterDefaults::default());
    let orders = factory.create::<Order, i64>(order_descriptor()).await;

    let err = factory
        .validate_after_refresh()
        .await
        .expect_err("No store is registered for OrderEntity");
    assert_eq!(
        err,
        ConfigurationError::MissingRepository {
            backing: TypeKey::of::<OrderEntity>()
        }
    );
    assert!(!orders.is_validated().await);
    assert!(orders.count().await.is_err(), "Unvalidated adapters refuse calls");
}

fn two_stores() -> (Arc<OrderStore>, Arc<OrderStore>, RepositoryRegistry) {
    let live = order_store();
    let archive = order_store();
    let repositories = RepositoryRegistry::new()
        .with(order_registration("orders", &live))
        .with(order_registration("orders-archive", &archive));
    (live, archive, repositories)
}

#[tokio::test]
async fn test_ambiguous_repository_fails_validation() {
    let (_, _, repositories) = two_stores();
    let factory = AdapterFactory::new(dependencies(repositories), AdapterDefaults::default());
    factory.create::<Order, i64>(order_descriptor()).await;

    let err = factory
        .validate_after_refresh()
        .await
        .expect_err("Two stores manage OrderEntity");
    assert_eq!(
        err,
        ConfigurationError::AmbiguousRepository {
            backing: TypeKey::of::<OrderEntity>(),
            candidates: vec!["orders".to_string(), "orders-archive".to_string()],
        }
    );
    assert!(err.to_string().contains("Found 2 repositories"));
}

#[tokio::test]
async fn test_selector_picks_the_named_repository() {
    let (live, archive, repositories) = two_stores();
    let factory = AdapterFactory::new(dependencies(repositories), AdapterDefaults::default());
    let archived = factory
        .create::<Order, i64>(
            order_descriptor().repository_selector(RepositorySelector::name("orders-archive")),
        )
        .await;
    factory
        .validate_after_refresh()
        .await
        .expect("Selector resolves one store");

    archived
        .save(Order::new(dec!(8)))
        .await
        .expect("Save should succeed");

    assert!(live.snapshot().await.is_empty());
    assert_eq!(archive.snapshot().await.len(), 1);
}

#[tokio::test]
async fn test_selector_by_type_that_matches_both_fails() {
    let (_, _, repositories) = two_stores();
    let factory = AdapterFactory::new(dependencies(repositories), AdapterDefaults::default());
    factory
        .create::<Order, i64>(
            order_descriptor().repository_selector(RepositorySelector::repository_type::<OrderStore>()),
        )
        .await;

    let err = factory
        .validate_after_refresh()
        .await
        .expect_err("Both stores share a type");
    assert!(matches!(err, ConfigurationError::SelectorNotUnique { count: 2, .. }));
}

#[tokio::test]
async fn test_id_conversion_can_be_disabled_by_default() {
    let store = order_store();
    let factory = AdapterFactory::new(
        dependencies(RepositoryRegistry::new().with(order_registration("orders", &store))),
        AdapterDefaults {
            convert_id: false,
            ..Default::default()
        },
    );
    factory.create::<Order, i64>(order_descriptor()).await;

    let err = factory
        .validate_after_refresh()
        .await
        .expect_err("The mapper cannot translate ids on its own");
    assert_eq!(
        err,
        ConfigurationError::NoMapping {
            src: TypeKey::of::<i64>(),
            dest: TypeKey::of::<Uuid>()
        }
    );
}

#[tokio::test]
async fn test_unknown_map_id_falls_back_to_unscoped_mapping() {
    let store = order_store();
    let factory = AdapterFactory::new(
        dependencies(RepositoryRegistry::new().with(order_registration("orders", &store))),
        AdapterDefaults {
            map_id: Some("legacy".to_string()),
            ..Default::default()
        },
    );
    let orders = factory.create::<Order, i64>(order_descriptor()).await;
    factory
        .validate_after_refresh()
        .await
        .expect("Unscoped mapping serves the legacy context");

    assert_eq!(orders.descriptor().map_id(), Some("legacy"));
    let saved = orders.save(Order::new(dec!(2.5))).await.expect("Save should succeed");
    assert_eq!(saved.id, Some(1));
    // no class map is declared in the legacy context
    assert_eq!(orders.backing_property("total").await.expect("Validated"), "total");
}

#[tokio::test]
async fn test_late_adapters_join_the_next_validation() {
    let ctx = OrderTestContext::setup().await.expect("Setup should succeed");
    assert_eq!(ctx.factory.pending().await, 0);
    let ids = ctx.seed([(12.0, "seeded")]).await;

    let reporting = ctx.factory.create::<Order, i64>(order_descriptor()).await;
    assert_eq!(ctx.factory.pending().await, 1);
    assert!(!reporting.is_validated().await);

    let validated = ctx
        .factory
        .validate_after_refresh()
        .await
        .expect("Validation should succeed");
    assert_eq!(validated, 1);

    let found = reporting
        .find_by_id(ids[0])
        .await
        .expect("Lookup should succeed")
        .expect("Seeded order should be found");
    assert_eq!(found.id, Some(ids[0]));
}
