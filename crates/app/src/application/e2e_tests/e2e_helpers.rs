//! E2E test helpers: the order model and a fully wired adapter stack.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use entity_bridge_adapters::infrastructure::{
    ClassMapping, ClassMappingRegistry, ConverterRegistry, InMemoryRepository,
    PersistentEntities, PropertyAccess, PropertyValue, RepositoryRegistration, RepositoryRegistry,
};
use entity_bridge_domain::{
    EntityDescriptor, EntityDescriptorBuilder, MappingError, Persistable, PersistentEntity, TypeKey,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::application::services::{
    AdapterDefaults, AdapterDependencies, AdapterFactory, EntityAdapter,
};

// =============================================================================
// Model
// =============================================================================

/// Facade entity exposed to callers
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Order {
    pub id: Option<i64>,
    pub total: Decimal,
    pub version: Option<i64>,
}

impl Order {
    pub fn new(total: Decimal) -> Self {
        Self {
            total,
            ..Default::default()
        }
    }
}

impl Persistable for Order {
    type Id = i64;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }
}

/// Stored entity; `audit` has no facade counterpart
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderEntity {
    pub id: Option<Uuid>,
    pub amount: f64,
    pub version: u32,
    pub audit: String,
}

impl PropertyAccess for OrderEntity {
    fn property(&self, name: &str) -> Option<PropertyValue> {
        match name {
            "id" => Some(self.id.into()),
            "amount" => Some(self.amount.into()),
            "version" => Some(self.version.into()),
            "audit" => Some(self.audit.as_str().into()),
            _ => None,
        }
    }
}

pub fn order_key(id: i64) -> Result<Uuid, String> {
    u64::try_from(id)
        .map(|id| Uuid::from_u64_pair(0, id))
        .map_err(|_| format!("order id {id} is negative"))
}

pub fn order_id(key: &Uuid) -> Result<i64, String> {
    match key.as_u64_pair() {
        (0, low) => i64::try_from(low).map_err(|e| e.to_string()),
        _ => Err(format!("{key} is not an order key")),
    }
}

fn mapping_failed(reason: String) -> MappingError {
    MappingError::failed(TypeKey::of::<Order>(), TypeKey::of::<OrderEntity>(), reason)
}

// =============================================================================
// Wiring
// =============================================================================

pub type OrderStore = InMemoryRepository<OrderEntity, Uuid>;

/// Store generating sequential order keys and bumping the version on save
pub fn order_store() -> Arc<OrderStore> {
    let next = Arc::new(AtomicU64::new(1));
    Arc::new(
        OrderStore::new(|entity: &OrderEntity| entity.id)
            .with_id_generator(move |entity: &mut OrderEntity| {
                entity.id = Some(Uuid::from_u64_pair(0, next.fetch_add(1, Ordering::SeqCst)));
            })
            .with_save_hook(|entity: &mut OrderEntity| entity.version += 1),
    )
}

pub fn order_mapper() -> ClassMappingRegistry {
    let mapping = ClassMapping::<Order, OrderEntity>::between()
        .field("total", "amount")
        .forward(|order: &Order, entity: &mut OrderEntity| {
            entity.id = order.id.map(order_key).transpose().map_err(mapping_failed)?;
            entity.amount = order
                .total
                .to_f64()
                .ok_or_else(|| mapping_failed(format!("total {} out of range", order.total)))?;
            Ok(())
        })
        .backward(|entity: &OrderEntity, order: &mut Order| {
            order.id = entity
                .id
                .as_ref()
                .map(order_id)
                .transpose()
                .map_err(mapping_failed)?;
            order.total = Decimal::try_from(entity.amount).map_err(|e| mapping_failed(e.to_string()))?;
            order.version = Some(i64::from(entity.version));
            Ok(())
        });
    ClassMappingRegistry::builder().mapping(mapping).build()
}

pub fn order_converters() -> ConverterRegistry {
    ConverterRegistry::with_default_converters()
        .with_converter(|id: &i64| order_key(*id))
        .with_converter(order_id)
}

pub fn order_metadata() -> PersistentEntities {
    PersistentEntities::new()
        .with(
            PersistentEntity::persistable::<Order>()
                .version(|o: &Order| o.version, |o: &mut Order, v| o.version = Some(v))
                .build(),
        )
        .with(
            PersistentEntity::with_id(|e: &OrderEntity| e.id)
                .version(|e: &OrderEntity| Some(e.version), |e: &mut OrderEntity, v| e.version = v)
                .build(),
        )
}

pub fn order_registration(name: &str, store: &Arc<OrderStore>) -> RepositoryRegistration {
    RepositoryRegistration::typed::<OrderStore, OrderEntity, Uuid>(name, Arc::clone(store))
}

pub fn dependencies(repositories: RepositoryRegistry) -> AdapterDependencies {
    AdapterDependencies::new(
        Arc::new(order_mapper()),
        Arc::new(repositories),
        Arc::new(order_metadata()),
    )
    .with_conversion(Arc::new(order_converters()))
}

pub fn order_descriptor() -> EntityDescriptorBuilder {
    EntityDescriptor::builder::<Order, OrderEntity>()
}

// =============================================================================
// Test Context
// =============================================================================

/// One order store behind a validated adapter
pub struct OrderTestContext {
    pub store: Arc<OrderStore>,
    pub factory: AdapterFactory,
    pub orders: Arc<EntityAdapter<Order, i64>>,
}

impl OrderTestContext {
    pub async fn setup() -> Result<Self, crate::application::ConfigurationError> {
        let store = order_store();
        let repositories = RepositoryRegistry::new().with(order_registration("orders", &store));
        let factory = AdapterFactory::new(dependencies(repositories), AdapterDefaults::default());
        let orders = factory.create::<Order, i64>(order_descriptor()).await;
        factory.validate_after_refresh().await?;
        Ok(Self {
            store,
            factory,
            orders,
        })
    }

    /// Store entities directly, bypassing the adapter
    pub async fn seed(&self, entities: impl IntoIterator<Item = (f64, &str)>) -> Vec<i64> {
        use entity_bridge_ports::outbound::PagingAndSortingRepository;

        let mut ids = Vec::new();
        for (amount, audit) in entities {
            let stored = self
                .store
                .save(OrderEntity {
                    amount,
                    audit: audit.to_string(),
                    ..Default::default()
                })
                .await
                .expect("Seeding should succeed");
            let key = stored.id.expect("Store assigns keys");
            ids.push(order_id(&key).expect("Generated keys are order keys"));
        }
        ids
    }
}
