//! Type-erased paging and sorting CRUD over backing entities.

use anyhow::Result;
use async_trait::async_trait;
use entity_bridge_domain::{DynValue, Page, PageRequest, Sort};

/// Paging and sorting CRUD operations on one backing entity type.
///
/// Entities and identifiers are passed as [`DynValue`]; implementations
/// reject values of the wrong concrete type with an error.
///
/// # Used By
/// - `EntityAdapter` - every adapted CRUD operation delegates here
/// - `MappingValidator` - resolved once per adapted entity at readiness
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait BackingRepository: Send + Sync {
    /// All entities in storage order
    async fn find_all(&self) -> Result<Vec<DynValue>>;

    /// All entities ordered by backing property names
    async fn find_all_sorted(&self, sort: &Sort) -> Result<Vec<DynValue>>;

    /// One page of entities
    async fn find_page(&self, request: &PageRequest) -> Result<Page<DynValue>>;

    /// Get an entity by ID
    async fn find_by_id(&self, id: DynValue) -> Result<Option<DynValue>>;

    async fn exists_by_id(&self, id: DynValue) -> Result<bool>;

    /// Entities for every ID that exists; unknown IDs are skipped
    async fn find_all_by_id(&self, ids: Vec<DynValue>) -> Result<Vec<DynValue>>;

    /// Insert or update, returning the persisted entity with its assigned ID
    async fn save(&self, entity: DynValue) -> Result<DynValue>;

    async fn save_all(&self, entities: Vec<DynValue>) -> Result<Vec<DynValue>>;

    async fn count(&self) -> Result<u64>;

    async fn delete_by_id(&self, id: DynValue) -> Result<()>;

    /// Delete the given entities (matched by ID)
    async fn delete_all_entities(&self, entities: Vec<DynValue>) -> Result<()>;

    /// Delete everything
    async fn delete_all(&self) -> Result<()>;
}
