//! `Vec`-backed implementation of the typed paging and sorting port.

use std::any::type_name;
use std::cmp::Ordering;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use entity_bridge_domain::{Page, PageRequest, Sort};
use entity_bridge_ports::outbound::PagingAndSortingRepository;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::debug;

use super::property::{PropertyAccess, PropertyValue};

/// Errors raised by the in-memory store itself
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("No property '{property}' found on {entity}")]
    UnknownProperty {
        property: String,
        entity: &'static str,
    },

    #[error("Entity {entity} has no identifier and no id generator is configured")]
    MissingIdentifier { entity: &'static str },
}

type IdOf<T, ID> = Arc<dyn Fn(&T) -> Option<ID> + Send + Sync>;
type Hook<T> = Arc<dyn Fn(&mut T) + Send + Sync>;

/// In-memory paging and sorting repository.
///
/// Entities keep insertion order; saving an entity whose identifier already
/// exists replaces it in place. Clones share the same storage.
pub struct InMemoryRepository<T, ID> {
    entities: Arc<RwLock<Vec<T>>>,
    id_of: IdOf<T, ID>,
    id_generator: Option<Hook<T>>,
    on_save: Option<Hook<T>>,
}

impl<T, ID> Clone for InMemoryRepository<T, ID> {
    fn clone(&self) -> Self {
        Self {
            entities: Arc::clone(&self.entities),
            id_of: Arc::clone(&self.id_of),
            id_generator: self.id_generator.clone(),
            on_save: self.on_save.clone(),
        }
    }
}

impl<T, ID> InMemoryRepository<T, ID>
where
    T: PropertyAccess + Clone + Send + Sync + 'static,
    ID: PartialEq + Send + Sync + 'static,
{
    /// Store whose entities are identified by `id_of`
    pub fn new(id_of: impl Fn(&T) -> Option<ID> + Send + Sync + 'static) -> Self {
        Self {
            entities: Arc::new(RwLock::new(Vec::new())),
            id_of: Arc::new(id_of),
            id_generator: None,
            on_save: None,
        }
    }

    /// Assigns an identifier to entities saved without one
    pub fn with_id_generator(mut self, generator: impl Fn(&mut T) + Send + Sync + 'static) -> Self {
        self.id_generator = Some(Arc::new(generator));
        self
    }

    /// Runs on every entity right before it is stored, e.g. to bump a version
    pub fn with_save_hook(mut self, hook: impl Fn(&mut T) + Send + Sync + 'static) -> Self {
        self.on_save = Some(Arc::new(hook));
        self
    }

    /// Current contents in storage order
    pub async fn snapshot(&self) -> Vec<T> {
        self.entities.read().await.clone()
    }

    fn has_id(&self, entity: &T, id: &ID) -> bool {
        (self.id_of)(entity).as_ref() == Some(id)
    }

    fn sorted(entities: Vec<T>, sort: &Sort) -> Result<Vec<T>, StoreError> {
        if sort.is_unsorted() {
            return Ok(entities);
        }

        let mut keyed = Vec::with_capacity(entities.len());
        for entity in entities {
            let keys = sort
                .iter()
                .map(|order| {
                    entity
                        .property(order.property())
                        .ok_or_else(|| StoreError::UnknownProperty {
                            property: order.property().to_string(),
                            entity: type_name::<T>(),
                        })
                })
                .collect::<Result<Vec<PropertyValue>, _>>()?;
            keyed.push((keys, entity));
        }

        keyed.sort_by(|(a, _), (b, _)| {
            sort.iter()
                .zip(a.iter().zip(b.iter()))
                .fold(Ordering::Equal, |acc, (order, (x, y))| {
                    acc.then_with(|| {
                        let ordering = x.compare(y, order.is_ignore_case());
                        if order.direction().is_ascending() {
                            ordering
                        } else {
                            ordering.reverse()
                        }
                    })
                })
        });

        Ok(keyed.into_iter().map(|(_, entity)| entity).collect())
    }
}

#[async_trait]
impl<T, ID> PagingAndSortingRepository<T, ID> for InMemoryRepository<T, ID>
where
    T: PropertyAccess + Clone + Send + Sync + 'static,
    ID: PartialEq + Send + Sync + 'static,
{
    async fn find_all(&self) -> Result<Vec<T>> {
        Ok(self.snapshot().await)
    }

    async fn find_all_sorted(&self, sort: &Sort) -> Result<Vec<T>> {
        Ok(Self::sorted(self.snapshot().await, sort)?)
    }

    async fn find_page(&self, request: &PageRequest) -> Result<Page<T>> {
        let sorted = Self::sorted(self.snapshot().await, request.sort())?;
        let total = sorted.len() as u64;
        let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
        let content = sorted
            .into_iter()
            .skip(offset)
            .take(request.page_size() as usize)
            .collect();
        Ok(Page::new(content, request.clone(), total))
    }

    async fn find_by_id(&self, id: ID) -> Result<Option<T>> {
        let entities = self.entities.read().await;
        Ok(entities.iter().find(|e| self.has_id(e, &id)).cloned())
    }

    async fn exists_by_id(&self, id: ID) -> Result<bool> {
        let entities = self.entities.read().await;
        Ok(entities.iter().any(|e| self.has_id(e, &id)))
    }

    async fn find_all_by_id(&self, ids: Vec<ID>) -> Result<Vec<T>> {
        let entities = self.entities.read().await;
        Ok(entities
            .iter()
            .filter(|e| (self.id_of)(*e).is_some_and(|id| ids.contains(&id)))
            .cloned()
            .collect())
    }

    async fn save(&self, mut entity: T) -> Result<T> {
        if (self.id_of)(&entity).is_none() {
            let generator = self.id_generator.as_ref().ok_or(StoreError::MissingIdentifier {
                entity: type_name::<T>(),
            })?;
            generator(&mut entity);
        }
        if let Some(hook) = &self.on_save {
            hook(&mut entity);
        }
        let id = (self.id_of)(&entity).ok_or(StoreError::MissingIdentifier {
            entity: type_name::<T>(),
        })?;

        let mut entities = self.entities.write().await;
        match entities.iter().position(|e| self.has_id(e, &id)) {
            Some(index) => entities[index] = entity.clone(),
            None => entities.push(entity.clone()),
        }
        debug!(entity = type_name::<T>(), count = entities.len(), "Saved entity");
        Ok(entity)
    }

    async fn save_all(&self, entities: Vec<T>) -> Result<Vec<T>> {
        let mut saved = Vec::with_capacity(entities.len());
        for entity in entities {
            saved.push(self.save(entity).await?);
        }
        Ok(saved)
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.entities.read().await.len() as u64)
    }

    async fn delete_by_id(&self, id: ID) -> Result<()> {
        self.entities.write().await.retain(|e| !self.has_id(e, &id));
        Ok(())
    }

    async fn delete(&self, entity: &T) -> Result<()> {
        match (self.id_of)(entity) {
            Some(id) => self.delete_by_id(id).await,
            None => Ok(()),
        }
    }

    async fn delete_all_entities(&self, entities: &[T]) -> Result<()> {
        for entity in entities {
            self.delete(entity).await?;
        }
        Ok(())
    }

    async fn delete_all(&self) -> Result<()> {
        self.entities.write().await.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use entity_bridge_domain::Order;
    use std::sync::atomic::{AtomicU32, Ordering as AtomicOrdering};

    #[derive(Debug, Clone, PartialEq)]
    struct Ticket {
        id: Option<u32>,
        title: String,
        amount: f64,
        version: u32,
    }

    impl Ticket {
        fn new(title: &str, amount: f64) -> Self {
            Self {
                id: None,
                title: title.to_string(),
                amount,
                version: 0,
            }
        }
    }

    impl PropertyAccess for Ticket {
        fn property(&self, name: &str) -> Option<PropertyValue> {
            match name {
                "id" => Some(self.id.into()),
                "title" => Some(self.title.clone().into()),
                "amount" => Some(self.amount.into()),
                "version" => Some(self.version.into()),
                _ => None,
            }
        }
    }

    fn store() -> InMemoryRepository<Ticket, u32> {
        let next = Arc::new(AtomicU32::new(1));
        InMemoryRepository::new(|t: &Ticket| t.id)
            .with_id_generator(move |t| t.id = Some(next.fetch_add(1, AtomicOrdering::SeqCst)))
            .with_save_hook(|t| t.version += 1)
    }

    async fn seeded() -> InMemoryRepository<Ticket, u32> {
        let store = store();
        for (title, amount) in [("beta", 20.0), ("alpha", 5.0), ("gamma", 12.5)] {
            store.save(Ticket::new(title, amount)).await.unwrap();
        }
        store
    }

    #[tokio::test]
    async fn save_assigns_ids_and_runs_the_hook() {
        let store = store();
        let saved = store.save(Ticket::new("alpha", 1.0)).await.unwrap();
        assert_eq!(saved.id, Some(1));
        assert_eq!(saved.version, 1);

        let updated = store.save(saved).await.unwrap();
        assert_eq!(updated.version, 2);
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn save_without_id_or_generator_fails() {
        let store = InMemoryRepository::new(|t: &Ticket| t.id);
        let err = store.save(Ticket::new("alpha", 1.0)).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StoreError>(),
            Some(StoreError::MissingIdentifier { .. })
        ));
    }

    #[tokio::test]
    async fn updates_keep_storage_order() {
        let store = seeded().await;
        let mut first = store.find_by_id(1).await.unwrap().unwrap();
        first.amount = 99.0;
        store.save(first).await.unwrap();

        let titles: Vec<_> = store.find_all().await.unwrap().into_iter().map(|t| t.title).collect();
        assert_eq!(titles, vec!["beta", "alpha", "gamma"]);
    }

    #[tokio::test]
    async fn sorts_by_property_name() {
        let store = seeded().await;
        let sorted = store
            .find_all_sorted(&Sort::by([Order::desc("amount")]))
            .await
            .unwrap();
        let amounts: Vec<_> = sorted.iter().map(|t| t.amount).collect();
        assert_eq!(amounts, vec![20.0, 12.5, 5.0]);
    }

    #[tokio::test]
    async fn unknown_sort_property_is_an_error() {
        let store = seeded().await;
        let err = store
            .find_all_sorted(&Sort::by_properties(["total"]))
            .await
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<StoreError>(),
            Some(&StoreError::UnknownProperty {
                property: "total".to_string(),
                entity: type_name::<Ticket>(),
            })
        );
    }

    #[tokio::test]
    async fn pages_slice_the_sorted_contents() {
        let store = seeded().await;
        let request = PageRequest::sorted(1, 2, Sort::by_properties(["title"])).unwrap();
        let page = store.find_page(&request).await.unwrap();

        assert_eq!(page.total_elements(), 3);
        assert_eq!(page.total_pages(), 2);
        assert_eq!(page.content().len(), 1);
        assert_eq!(page.content()[0].title, "gamma");
    }

    #[tokio::test]
    async fn find_all_by_id_skips_unknown_ids() {
        let store = seeded().await;
        let found = store.find_all_by_id(vec![3, 42, 1]).await.unwrap();
        let ids: Vec<_> = found.iter().filter_map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[tokio::test]
    async fn deletes_by_id_and_entity() {
        let store = seeded().await;
        store.delete_by_id(2).await.unwrap();
        let third = store.find_by_id(3).await.unwrap().unwrap();
        store.delete(&third).await.unwrap();
        store.delete(&Ticket::new("unsaved", 0.0)).await.unwrap();

        assert_eq!(store.count().await.unwrap(), 1);
        assert!(store.exists_by_id(1).await.unwrap());
        assert!(!store.exists_by_id(2).await.unwrap());
    }
}
