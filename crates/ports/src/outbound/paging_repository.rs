//! Typed paging and sorting CRUD, and its bridge onto [`BackingRepository`].

use std::any::Any;
use std::marker::PhantomData;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use entity_bridge_domain::{downcast_value, DynValue, Page, PageRequest, Sort};

use super::BackingRepository;

/// Paging and sorting CRUD on entities of type `T` keyed by `ID`.
///
/// Implemented by concrete stores and by the entity adapter, which exposes
/// a facade type over a differently shaped backing store.
#[async_trait]
pub trait PagingAndSortingRepository<T, ID>: Send + Sync
where
    T: Send + Sync + 'static,
    ID: Send + Sync + 'static,
{
    async fn find_all(&self) -> Result<Vec<T>>;

    async fn find_all_sorted(&self, sort: &Sort) -> Result<Vec<T>>;

    async fn find_page(&self, request: &PageRequest) -> Result<Page<T>>;

    async fn find_by_id(&self, id: ID) -> Result<Option<T>>;

    async fn exists_by_id(&self, id: ID) -> Result<bool>;

    async fn find_all_by_id(&self, ids: Vec<ID>) -> Result<Vec<T>>;

    /// Persist `entity` and return it with any store-assigned state applied
    async fn save(&self, entity: T) -> Result<T>;

    async fn save_all(&self, entities: Vec<T>) -> Result<Vec<T>>;

    async fn count(&self) -> Result<u64>;

    async fn delete_by_id(&self, id: ID) -> Result<()>;

    async fn delete(&self, entity: &T) -> Result<()>;

    async fn delete_all_entities(&self, entities: &[T]) -> Result<()>;

    async fn delete_all(&self) -> Result<()>;
}

/// Exposes a typed repository through the erased [`BackingRepository`] port
pub struct TypedRepository<R, T, ID> {
    inner: Arc<R>,
    _marker: PhantomData<fn() -> (T, ID)>,
}

impl<R, T, ID> TypedRepository<R, T, ID> {
    pub fn new(inner: Arc<R>) -> Self {
        Self {
            inner,
            _marker: PhantomData,
        }
    }

    pub fn inner(&self) -> &Arc<R> {
        &self.inner
    }
}

fn erase<T: Any + Send + Sync>(value: T) -> DynValue {
    Box::new(value)
}

fn downcast_all<T: Any>(values: Vec<DynValue>) -> Result<Vec<T>> {
    values
        .into_iter()
        .map(|value| downcast_value::<T>(value).map_err(anyhow::Error::from))
        .collect()
}

#[async_trait]
impl<R, T, ID> BackingRepository for TypedRepository<R, T, ID>
where
    R: PagingAndSortingRepository<T, ID> + 'static,
    T: Any + Send + Sync,
    ID: Any + Send + Sync,
{
    async fn find_all(&self) -> Result<Vec<DynValue>> {
        Ok(self.inner.find_all().await?.into_iter().map(erase).collect())
    }

    async fn find_all_sorted(&self, sort: &Sort) -> Result<Vec<DynValue>> {
        Ok(self
            .inner
            .find_all_sorted(sort)
            .await?
            .into_iter()
            .map(erase)
            .collect())
    }

    async fn find_page(&self, request: &PageRequest) -> Result<Page<DynValue>> {
        Ok(self.inner.find_page(request).await?.map(erase))
    }

    async fn find_by_id(&self, id: DynValue) -> Result<Option<DynValue>> {
        let id = downcast_value::<ID>(id)?;
        Ok(self.inner.find_by_id(id).await?.map(erase))
    }

    async fn exists_by_id(&self, id: DynValue) -> Result<bool> {
        let id = downcast_value::<ID>(id)?;
        self.inner.exists_by_id(id).await
    }

    async fn find_all_by_id(&self, ids: Vec<DynValue>) -> Result<Vec<DynValue>> {
        let ids = downcast_all::<ID>(ids)?;
        Ok(self
            .inner
            .find_all_by_id(ids)
            .await?
            .into_iter()
            .map(erase)
            .collect())
    }

    async fn save(&self, entity: DynValue) -> Result<DynValue> {
        let entity = downcast_value::<T>(entity)?;
        Ok(erase(self.inner.save(entity).await?))
    }

    async fn save_all(&self, entities: Vec<DynValue>) -> Result<Vec<DynValue>> {
        let entities = downcast_all::<T>(entities)?;
        Ok(self
            .inner
            .save_all(entities)
            .await?
            .into_iter()
            .map(erase)
            .collect())
    }

    async fn count(&self) -> Result<u64> {
        self.inner.count().await
    }

    async fn delete_by_id(&self, id: DynValue) -> Result<()> {
        let id = downcast_value::<ID>(id)?;
        self.inner.delete_by_id(id).await
    }

    async fn delete_all_entities(&self, entities: Vec<DynValue>) -> Result<()> {
        let entities = downcast_all::<T>(entities)?;
        self.inner.delete_all_entities(&entities).await
    }

    async fn delete_all(&self) -> Result<()> {
        self.inner.delete_all().await
    }
}
