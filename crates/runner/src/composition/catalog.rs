//! Catalogue model: `Product` facade over `ProductRecord` storage.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use entity_bridge_adapters::infrastructure::{
    ClassMapping, ClassMappingRegistry, ConverterRegistry, InMemoryRepository,
    PersistentEntities, PropertyAccess, PropertyValue,
};
use entity_bridge_domain::{MappingError, Persistable, PersistentEntity, TypeKey};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use uuid::Uuid;

/// What callers see
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Product {
    pub id: Option<i64>,
    pub name: String,
    pub price: Decimal,
    pub version: Option<i64>,
}

impl Product {
    pub fn new(name: impl Into<String>, price: Decimal) -> Self {
        Self {
            name: name.into(),
            price,
            ..Default::default()
        }
    }
}

impl Persistable for Product {
    type Id = i64;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }
}

/// What the store keeps
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductRecord {
    pub id: Option<Uuid>,
    pub title: String,
    pub unit_price: f64,
    pub revision: u32,
    pub created_at: Option<DateTime<Utc>>,
}

impl PropertyAccess for ProductRecord {
    fn property(&self, name: &str) -> Option<PropertyValue> {
        match name {
            "id" => Some(self.id.into()),
            "title" => Some(self.title.as_str().into()),
            "unit_price" => Some(self.unit_price.into()),
            "revision" => Some(self.revision.into()),
            "created_at" => Some(self.created_at.into()),
            _ => None,
        }
    }
}

pub type ProductStore = InMemoryRepository<ProductRecord, Uuid>;

fn product_key(id: i64) -> Result<Uuid, String> {
    u64::try_from(id)
        .map(|id| Uuid::from_u64_pair(0, id))
        .map_err(|_| format!("product id {id} is negative"))
}

fn product_id(key: &Uuid) -> Result<i64, String> {
    match key.as_u64_pair() {
        (0, low) => i64::try_from(low).map_err(|e| e.to_string()),
        _ => Err(format!("{key} is not a catalogue key")),
    }
}

fn copy_failed(src: TypeKey, dest: TypeKey) -> impl Fn(String) -> MappingError {
    move |reason| MappingError::failed(src, dest, reason)
}

/// Sequential keys; every save bumps the revision and stamps creation once
pub fn product_store() -> Arc<ProductStore> {
    let next = Arc::new(AtomicU64::new(1));
    Arc::new(
        ProductStore::new(|record: &ProductRecord| record.id)
            .with_id_generator(move |record: &mut ProductRecord| {
                record.id = Some(Uuid::from_u64_pair(0, next.fetch_add(1, Ordering::SeqCst)));
            })
            .with_save_hook(|record: &mut ProductRecord| {
                record.revision += 1;
                record.created_at.get_or_insert_with(Utc::now);
            }),
    )
}

pub fn product_mapper() -> ClassMappingRegistry {
    let to_record = copy_failed(TypeKey::of::<Product>(), TypeKey::of::<ProductRecord>());
    let to_product = copy_failed(TypeKey::of::<ProductRecord>(), TypeKey::of::<Product>());

    let mapping = ClassMapping::<Product, ProductRecord>::between()
        .field("name", "title")
        .field("price", "unit_price")
        .forward(move |product: &Product, record: &mut ProductRecord| {
            record.id = product.id.map(product_key).transpose().map_err(&to_record)?;
            record.title = product.name.clone();
            record.unit_price = product
                .price
                .to_f64()
                .ok_or_else(|| to_record(format!("price {} out of range", product.price)))?;
            Ok(())
        })
        .backward(move |record: &ProductRecord, product: &mut Product| {
            product.id = record
                .id
                .as_ref()
                .map(product_id)
                .transpose()
                .map_err(&to_product)?;
            product.name = record.title.clone();
            product.price = Decimal::try_from(record.unit_price).map_err(|e| to_product(e.to_string()))?;
            product.version = Some(i64::from(record.revision));
            Ok(())
        });

    ClassMappingRegistry::builder().mapping(mapping).build()
}

/// Default converters plus the `i64 <-> Uuid` key fallback
pub fn product_converters() -> ConverterRegistry {
    ConverterRegistry::with_default_converters()
        .with_converter(|id: &i64| product_key(*id))
        .with_converter(product_id)
}

pub fn product_metadata() -> PersistentEntities {
    PersistentEntities::new()
        .with(
            PersistentEntity::persistable::<Product>()
                .version(|p: &Product| p.version, |p: &mut Product, v| p.version = Some(v))
                .build(),
        )
        .with(
            PersistentEntity::with_id(|r: &ProductRecord| r.id)
                .version(|r: &ProductRecord| Some(r.revision), |r: &mut ProductRecord, v| r.revision = v)
                .build(),
        )
}
