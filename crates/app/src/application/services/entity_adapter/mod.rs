//! Entity Adapter - a facade-typed repository over a backing repository
//!
//! Every call translates facade ids, sorts and bodies into their backing
//! counterparts, delegates to the backing repository resolved at
//! validation, and translates the results back.
//!
//! # Translation faults
//!
//! Read paths (`find_by_id`, `exists_by_id`, `find_all_by_id`, the deletes)
//! treat an identifier with no backing counterpart as absent. Write paths
//! (`save`, `save_all`) report it as [`AdapterError::InvalidArgument`].

mod bound_mapping;
mod mapped_entities;

use std::any::Any;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use entity_bridge_domain::{
    DynValue, EntityDescriptor, EscapeCharacter, Page, PageRequest, Sort, TypeKey,
};
use entity_bridge_ports::outbound::{
    ConversionService, MappingContext, ObjectMapper, PagingAndSortingRepository,
    RepositoryLocator,
};
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::mapping_validator::MappingValidator;
use crate::application::error::{AdapterError, ConfigurationError};

use bound_mapping::BoundMapping;
pub use mapped_entities::{AdaptedOperation, MappedEntities};

// ============================================================================
// Collaborators
// ============================================================================

/// Shared collaborators every adapter is built from
#[derive(Clone)]
pub struct AdapterDependencies {
    pub mapper: Arc<dyn ObjectMapper>,
    /// Fallback converters; `None` disables every conversion fallback
    pub conversion: Option<Arc<dyn ConversionService>>,
    pub locator: Arc<dyn RepositoryLocator>,
    pub metadata: Arc<dyn MappingContext>,
}

impl AdapterDependencies {
    pub fn new(
        mapper: Arc<dyn ObjectMapper>,
        locator: Arc<dyn RepositoryLocator>,
        metadata: Arc<dyn MappingContext>,
    ) -> Self {
        Self {
            mapper,
            conversion: None,
            locator,
            metadata,
        }
    }

    pub fn with_conversion(mut self, conversion: Arc<dyn ConversionService>) -> Self {
        self.conversion = Some(conversion);
        self
    }
}

/// Readiness hook, run once after every backing repository is registered
#[async_trait]
pub trait ValidateAfterRefresh: Send + Sync {
    /// The facade type served
    fn facade_type(&self) -> TypeKey;

    /// Resolve the backing repository, check every mapping direction and
    /// cache the result for later calls
    async fn validate_after_refresh(&self) -> Result<(), ConfigurationError>;
}

// ============================================================================
// Entity Adapter
// ============================================================================

/// Paging and sorting repository for facade `F` keyed by `FId`.
///
/// Unusable until [`ValidateAfterRefresh::validate_after_refresh`] succeeds;
/// calls before that fail with [`AdapterError::NotValidated`].
pub struct EntityAdapter<F, FId> {
    descriptor: EntityDescriptor,
    dependencies: AdapterDependencies,
    escape_character: EscapeCharacter,
    mapping: RwLock<Option<Arc<BoundMapping>>>,
    _types: PhantomData<fn() -> (F, FId)>,
}

impl<F, FId> EntityAdapter<F, FId>
where
    F: Any + Send + Sync,
    FId: Any + Send + Sync,
{
    pub fn new(descriptor: EntityDescriptor, dependencies: AdapterDependencies) -> Self {
        Self {
            descriptor,
            dependencies,
            escape_character: EscapeCharacter::default(),
            mapping: RwLock::new(None),
            _types: PhantomData,
        }
    }

    pub fn with_escape_character(mut self, escape_character: EscapeCharacter) -> Self {
        self.escape_character = escape_character;
        self
    }

    /// Escape character for pattern filters built against this entity
    pub fn escape_character(&self) -> EscapeCharacter {
        self.escape_character
    }

    pub fn descriptor(&self) -> &EntityDescriptor {
        &self.descriptor
    }

    pub async fn is_validated(&self) -> bool {
        self.mapping.read().await.is_some()
    }

    /// Operations whose results are mapped lazily
    pub fn lazy_operations(&self) -> Vec<AdaptedOperation> {
        AdaptedOperation::ALL
            .into_iter()
            .filter(AdaptedOperation::returns_lazy_sequence)
            .collect()
    }

    /// Backing property name for a facade property, unchanged when unmapped
    pub async fn backing_property(&self, facade_property: &str) -> Result<String, AdapterError> {
        let mapping = self.bound().await?;
        Ok(mapping.sorts().fields().translate(facade_property).to_string())
    }

    // -------------------------------------------------------------------------
    // Lazy reads
    // -------------------------------------------------------------------------

    pub async fn iter_all(&self) -> Result<MappedEntities<F>, AdapterError> {
        let mapping = self.bound().await?;
        let backing = mapping
            .repository()
            .find_all()
            .await
            .map_err(AdapterError::Storage)?;
        Ok(MappedEntities::new(mapping, backing))
    }

    pub async fn iter_all_sorted(&self, sort: &Sort) -> Result<MappedEntities<F>, AdapterError> {
        let mapping = self.bound().await?;
        let sort = mapping.sorts().translate_sort(sort);
        let backing = mapping
            .repository()
            .find_all_sorted(&sort)
            .await
            .map_err(AdapterError::Storage)?;
        Ok(MappedEntities::new(mapping, backing))
    }

    /// Ids without a backing counterpart are dropped from the lookup
    pub async fn iter_all_by_id(&self, ids: Vec<FId>) -> Result<MappedEntities<F>, AdapterError> {
        let mapping = self.bound().await?;
        let requested = ids.len();
        let backing_ids: Vec<DynValue> = ids
            .iter()
            .filter_map(|id| mapping.backing_id_or_absent(id))
            .collect();
        if backing_ids.len() < requested {
            debug!(
                requested,
                translated = backing_ids.len(),
                "Dropped identifiers without a backing counterpart"
            );
        }
        let backing = mapping
            .repository()
            .find_all_by_id(backing_ids)
            .await
            .map_err(AdapterError::Storage)?;
        Ok(MappedEntities::new(mapping, backing))
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    async fn bound(&self) -> Result<Arc<BoundMapping>, AdapterError> {
        self.mapping
            .read()
            .await
            .as_ref()
            .map(Arc::clone)
            .ok_or(AdapterError::NotValidated {
                facade: TypeKey::of::<F>(),
            })
    }

    /// The backing entity to persist for `entity`: a fresh one for new
    /// entities, otherwise the stored one (read exactly once) with `entity`
    /// copied onto it
    async fn backing_for_save(
        &self,
        mapping: &BoundMapping,
        entity: &F,
    ) -> Result<DynValue, AdapterError> {
        if mapping.is_new(entity)? {
            return Ok(mapping.to_new_backing(entity)?);
        }

        let id = mapping
            .resolved()
            .facade_entity
            .required_identifier(entity)
            .map_err(AdapterError::InvalidArgument)?;
        let backing_id = mapping
            .backing_id(&*id)
            .map_err(AdapterError::InvalidArgument)?;

        let existing = mapping
            .repository()
            .find_by_id(backing_id)
            .await
            .map_err(AdapterError::Storage)?;
        match existing {
            Some(existing) => Ok(mapping.merge(entity, existing)?),
            None => {
                debug!(facade = %TypeKey::of::<F>(), "Stored entity not found, creating a new one");
                Ok(mapping.to_new_backing(entity)?)
            }
        }
    }

    async fn save_one(&self, mapping: &BoundMapping, mut entity: F) -> Result<F, AdapterError> {
        let backing = self.backing_for_save(mapping, &entity).await?;
        let saved = mapping
            .repository()
            .save(backing)
            .await
            .map_err(AdapterError::Storage)?;
        mapping.rehydrate(&mut entity, &*saved)?;
        Ok(entity)
    }

    async fn delete_backing_id(&self, mapping: &BoundMapping, backing_id: DynValue) -> Result<(), AdapterError> {
        mapping
            .repository()
            .delete_by_id(backing_id)
            .await
            .map_err(AdapterError::Storage)
    }
}

#[async_trait]
impl<F, FId> ValidateAfterRefresh for EntityAdapter<F, FId>
where
    F: Any + Send + Sync,
    FId: Any + Send + Sync,
{
    fn facade_type(&self) -> TypeKey {
        TypeKey::of::<F>()
    }

    async fn validate_after_refresh(&self) -> Result<(), ConfigurationError> {
        let facade = TypeKey::of::<F>();
        if self.descriptor.facade_type() != facade {
            return Err(ConfigurationError::DescriptorTypeMismatch {
                expected: facade,
                actual: self.descriptor.facade_type(),
            });
        }

        let dependencies = &self.dependencies;
        let validator = MappingValidator::new(
            Arc::clone(&dependencies.mapper),
            dependencies.conversion.clone(),
            Arc::clone(&dependencies.locator),
            Arc::clone(&dependencies.metadata),
        );
        let resolved = validator.validate(&self.descriptor, TypeKey::of::<FId>())?;
        let bound = BoundMapping::new(
            resolved,
            Arc::clone(&dependencies.mapper),
            dependencies.conversion.clone(),
        );

        *self.mapping.write().await = Some(Arc::new(bound));
        info!(facade = %facade, "Entity adapter ready");
        Ok(())
    }
}

#[async_trait]
impl<F, FId> PagingAndSortingRepository<F, FId> for EntityAdapter<F, FId>
where
    F: Any + Send + Sync,
    FId: Any + Send + Sync,
{
    async fn find_all(&self) -> anyhow::Result<Vec<F>> {
        Ok(self.iter_all().await?.collect::<Result<_, _>>()?)
    }

    async fn find_all_sorted(&self, sort: &Sort) -> anyhow::Result<Vec<F>> {
        Ok(self.iter_all_sorted(sort).await?.collect::<Result<_, _>>()?)
    }

    async fn find_page(&self, request: &PageRequest) -> anyhow::Result<Page<F>> {
        let mapping = self.bound().await?;
        let backing_request = mapping.sorts().translate_page_request(request);
        let page = mapping
            .repository()
            .find_page(&backing_request)
            .await
            .map_err(AdapterError::Storage)?;

        let total = page.total_elements();
        let content = MappedEntities::<F>::new(Arc::clone(&mapping), page.into_content())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page::new(content, request.clone(), total))
    }

    async fn find_by_id(&self, id: FId) -> anyhow::Result<Option<F>> {
        let mapping = self.bound().await?;
        let Some(backing_id) = mapping.backing_id_or_absent(&id) else {
            return Ok(None);
        };
        let found = mapping
            .repository()
            .find_by_id(backing_id)
            .await
            .map_err(AdapterError::Storage)?;
        let facade = found
            .map(|backing| mapping.to_facade::<F>(backing))
            .transpose()
            .map_err(AdapterError::from)?;
        Ok(facade)
    }

    async fn exists_by_id(&self, id: FId) -> anyhow::Result<bool> {
        let mapping = self.bound().await?;
        let Some(backing_id) = mapping.backing_id_or_absent(&id) else {
            return Ok(false);
        };
        Ok(mapping
            .repository()
            .exists_by_id(backing_id)
            .await
            .map_err(AdapterError::Storage)?)
    }

    async fn find_all_by_id(&self, ids: Vec<FId>) -> anyhow::Result<Vec<F>> {
        Ok(self.iter_all_by_id(ids).await?.collect::<Result<_, _>>()?)
    }

    async fn save(&self, entity: F) -> anyhow::Result<F> {
        let mapping = self.bound().await?;
        Ok(self.save_one(&mapping, entity).await?)
    }

    async fn save_all(&self, entities: Vec<F>) -> anyhow::Result<Vec<F>> {
        let mapping = self.bound().await?;
        let mut saved = Vec::with_capacity(entities.len());
        for entity in entities {
            saved.push(self.save_one(&mapping, entity).await?);
        }
        Ok(saved)
    }

    async fn count(&self) -> anyhow::Result<u64> {
        let mapping = self.bound().await?;
        Ok(mapping
            .repository()
            .count()
            .await
            .map_err(AdapterError::Storage)?)
    }

    async fn delete_by_id(&self, id: FId) -> anyhow::Result<()> {
        let mapping = self.bound().await?;
        if let Some(backing_id) = mapping.backing_id_or_absent(&id) {
            self.delete_backing_id(&mapping, backing_id).await?;
        }
        Ok(())
    }

    async fn delete(&self, entity: &F) -> anyhow::Result<()> {
        let mapping = self.bound().await?;
        let backing_id = mapping.backing_id_of(entity).map_err(AdapterError::from)?;
        if let Some(backing_id) = backing_id {
            self.delete_backing_id(&mapping, backing_id).await?;
        }
        Ok(())
    }

    async fn delete_all_entities(&self, entities: &[F]) -> anyhow::Result<()> {
        let mapping = self.bound().await?;
        for entity in entities {
            let backing_id = mapping.backing_id_of(entity).map_err(AdapterError::from)?;
            if let Some(backing_id) = backing_id {
                self.delete_backing_id(&mapping, backing_id).await?;
            }
        }
        Ok(())
    }

    async fn delete_all(&self) -> anyhow::Result<()> {
        let mapping = self.bound().await?;
        Ok(mapping
            .repository()
            .delete_all()
            .await
            .map_err(AdapterError::Storage)?)
    }
}
