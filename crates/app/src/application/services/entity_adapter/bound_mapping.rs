//! Translation state bound to one validated mapping.

use std::any::Any;
use std::sync::Arc;

use entity_bridge_domain::{
    downcast_value, ConversionError, DynValue, MappingError, MappingStrategy, TypeKey,
};
use entity_bridge_ports::outbound::{BackingRepository, ConversionService, ObjectMapper};
use tracing::debug;

use crate::application::services::identifier_translator::IdentifierTranslator;
use crate::application::services::mapping_validator::{ResolvedMapping, VersionStrategy};
use crate::application::services::sort_translator::SortTranslator;

/// Built once per successful validation and shared by every call afterwards
pub(crate) struct BoundMapping {
    resolved: ResolvedMapping,
    ids: IdentifierTranslator,
    sorts: SortTranslator,
    mapper: Arc<dyn ObjectMapper>,
    conversion: Option<Arc<dyn ConversionService>>,
}

impl BoundMapping {
    pub(crate) fn new(
        resolved: ResolvedMapping,
        mapper: Arc<dyn ObjectMapper>,
        conversion: Option<Arc<dyn ConversionService>>,
    ) -> Self {
        let ids = IdentifierTranslator::new(
            Arc::clone(&mapper),
            conversion.clone(),
            resolved.facade_id_type,
            resolved.backing_id_type,
            resolved.descriptor.map_id(),
            &resolved.decision,
        );
        let sorts = SortTranslator::new(resolved.field_map.clone());
        Self {
            resolved,
            ids,
            sorts,
            mapper,
            conversion,
        }
    }

    pub(crate) fn resolved(&self) -> &ResolvedMapping {
        &self.resolved
    }

    pub(crate) fn sorts(&self) -> &SortTranslator {
        &self.sorts
    }

    pub(crate) fn repository(&self) -> &Arc<dyn BackingRepository> {
        &self.resolved.repository.repository
    }

    fn facade_type(&self) -> TypeKey {
        self.resolved.descriptor.facade_type()
    }

    fn backing_type(&self) -> TypeKey {
        self.resolved.descriptor.backing_type()
    }

    fn map_id(&self) -> Option<&str> {
        self.resolved.descriptor.map_id()
    }

    // -------------------------------------------------------------------------
    // Identifiers
    // -------------------------------------------------------------------------

    pub(crate) fn backing_id(&self, facade_id: &dyn Any) -> Result<DynValue, MappingError> {
        self.ids.to_backing(facade_id)
    }

    /// Backing id for a read path; untranslatable ids read as absent
    pub(crate) fn backing_id_or_absent(&self, facade_id: &dyn Any) -> Option<DynValue> {
        match self.ids.to_backing(facade_id) {
            Ok(id) => Some(id),
            Err(e) => {
                debug!(facade = %self.facade_type(), error = %e, "Identifier has no backing counterpart");
                None
            }
        }
    }

    /// Backing id of a facade entity, `None` when it is new or has no id
    pub(crate) fn backing_id_of(&self, entity: &dyn Any) -> Result<Option<DynValue>, MappingError> {
        let facade_entity = &self.resolved.facade_entity;
        if facade_entity.is_new(entity)? {
            return Ok(None);
        }
        Ok(facade_entity
            .identifier(entity)?
            .and_then(|id| self.backing_id_or_absent(&*id)))
    }

    // -------------------------------------------------------------------------
    // Bodies
    // -------------------------------------------------------------------------

    pub(crate) fn is_new(&self, entity: &dyn Any) -> Result<bool, MappingError> {
        self.resolved.facade_entity.is_new(entity)
    }

    pub(crate) fn to_facade<F: Any>(&self, backing: DynValue) -> Result<F, MappingError> {
        let (src, dest) = (self.backing_type(), self.facade_type());
        let facade = match self.resolved.decision.backing_to_body {
            MappingStrategy::Mapper => self.mapper.map(&*backing, src, dest, self.map_id())?,
            MappingStrategy::Conversion => self.convert(&*backing, src, dest)?,
        };
        downcast_value::<F>(facade)
    }

    /// A fresh backing entity built from `facade`
    pub(crate) fn to_new_backing(&self, facade: &dyn Any) -> Result<DynValue, MappingError> {
        let (src, dest) = (self.facade_type(), self.backing_type());
        match self.resolved.decision.body_to_backing {
            MappingStrategy::Mapper => self.mapper.map(facade, src, dest, self.map_id()),
            MappingStrategy::Conversion => self.convert(facade, src, dest),
        }
    }

    /// Copy `facade` onto an already stored backing entity. Backing-only
    /// state survives a mapper copy; a conversion builds a new entity.
    pub(crate) fn merge(&self, facade: &dyn Any, mut existing: DynValue) -> Result<DynValue, MappingError> {
        let (src, dest) = (self.facade_type(), self.backing_type());
        match self.resolved.decision.body_to_backing {
            MappingStrategy::Mapper => {
                self.mapper
                    .map_into(facade, src, &mut *existing, dest, self.map_id())?;
                Ok(existing)
            }
            MappingStrategy::Conversion => self.convert(facade, src, dest),
        }
    }

    /// Write store-assigned state of `saved` back onto `facade`: the
    /// identifier always, the version when both sides carry one
    pub(crate) fn rehydrate(&self, facade: &mut dyn Any, saved: &dyn Any) -> Result<(), MappingError> {
        let backing_id = self.resolved.backing_entity.required_identifier(saved)?;
        let facade_id = self.ids.to_facade(&*backing_id)?;
        self.resolved.facade_entity.set_identifier(facade, facade_id)?;

        let Some(version) = &self.resolved.version else {
            return Ok(());
        };
        let Some(value) = version.backing.get(saved)? else {
            return Ok(());
        };
        let (src, dest) = (version.backing.value_type(), version.facade.value_type());
        let value = match version.strategy {
            VersionStrategy::Identity => value,
            VersionStrategy::Mapper => self.mapper.map(&*value, src, dest, self.map_id())?,
            VersionStrategy::Conversion => self.convert(&*value, src, dest)?,
        };
        version.facade.set(facade, value)
    }

    fn convert(&self, value: &dyn Any, src: TypeKey, dest: TypeKey) -> Result<DynValue, MappingError> {
        let conversion = self
            .conversion
            .as_ref()
            .ok_or_else(|| ConversionError::not_found(src, dest))?;
        Ok(conversion.convert(value, src, dest)?)
    }
}
