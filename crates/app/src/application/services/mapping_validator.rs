//! Mapping Validator - readiness-time checks for one adapted entity
//!
//! Runs once after every backing repository is registered. Either every
//! direction across the facade/backing boundary has a way through, or the
//! entity fails to start with a descriptive [`ConfigurationError`].

use std::sync::Arc;

use entity_bridge_domain::{
    EntityDescriptor, FieldCorrespondence, MappingDecision, MappingStrategy, PersistentEntity,
    TypeKey, VersionProperty,
};
use entity_bridge_ports::outbound::{
    ConversionService, MappingContext, ObjectMapper, RegisteredRepository, RepositoryLocator,
};
use tracing::{debug, info, instrument, warn};

use super::field_map_resolver::FieldMapResolver;
use crate::application::error::ConfigurationError;

// ============================================================================
// Result Types
// ============================================================================

/// How a version value crosses from the backing entity to the facade
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionStrategy {
    /// Both sides use the same type
    Identity,
    Mapper,
    Conversion,
}

/// Cached version accessors of both sides
#[derive(Debug, Clone)]
pub struct VersionPropagation {
    pub backing: VersionProperty,
    pub facade: VersionProperty,
    pub strategy: VersionStrategy,
}

/// Everything an adapter needs per call, computed once at readiness
#[derive(Debug, Clone)]
pub struct ResolvedMapping {
    pub descriptor: EntityDescriptor,
    pub repository: RegisteredRepository,
    pub decision: MappingDecision,
    pub field_map: FieldCorrespondence,
    pub facade_entity: Arc<PersistentEntity>,
    pub backing_entity: Arc<PersistentEntity>,
    pub facade_id_type: TypeKey,
    pub backing_id_type: TypeKey,
    pub version: Option<VersionPropagation>,
}

// ============================================================================
// Validator
// ============================================================================

pub struct MappingValidator {
    mapper: Arc<dyn ObjectMapper>,
    conversion: Option<Arc<dyn ConversionService>>,
    locator: Arc<dyn RepositoryLocator>,
    metadata: Arc<dyn MappingContext>,
    resolver: FieldMapResolver,
}

impl MappingValidator {
    pub fn new(
        mapper: Arc<dyn ObjectMapper>,
        conversion: Option<Arc<dyn ConversionService>>,
        locator: Arc<dyn RepositoryLocator>,
        metadata: Arc<dyn MappingContext>,
    ) -> Self {
        let resolver = FieldMapResolver::new(Arc::clone(&mapper));
        Self {
            mapper,
            conversion,
            locator,
            metadata,
            resolver,
        }
    }

    /// Validate `descriptor` for a facade whose identifiers are `facade_id_type`
    #[instrument(skip(self, descriptor), fields(facade = %descriptor.facade_type(), backing = %descriptor.backing_type()))]
    pub fn validate(
        &self,
        descriptor: &EntityDescriptor,
        facade_id_type: TypeKey,
    ) -> Result<ResolvedMapping, ConfigurationError> {
        let facade = descriptor.facade_type();
        let backing = descriptor.backing_type();
        let map_id = descriptor.map_id();

        let repository = self.select_repository(descriptor)?;
        let backing_id_type = repository.information.id_type;

        let facade_entity = self.required_metadata(facade)?;
        let backing_entity = self.required_metadata(backing)?;
        if facade_entity.id_type() != facade_id_type {
            return Err(ConfigurationError::IdTypeMismatch {
                facade,
                expected: facade_id_type,
                actual: facade_entity.id_type(),
            });
        }
        if backing_entity.id_type() != backing_id_type {
            return Err(ConfigurationError::BackingIdTypeMismatch {
                backing,
                repository: repository.name.clone(),
                expected: backing_id_type,
                actual: backing_entity.id_type(),
            });
        }

        let decision = MappingDecision {
            body_to_backing: self.strategy(facade, backing, map_id, descriptor.convert_body())?,
            backing_to_body: self.strategy(backing, facade, map_id, descriptor.convert_body())?,
            id_to_backing: self.strategy(facade_id_type, backing_id_type, map_id, descriptor.convert_id())?,
            backing_to_id: self.strategy(backing_id_type, facade_id_type, map_id, descriptor.convert_id())?,
        };

        let field_map = self.resolver.resolve(facade, backing, map_id);

        if !facade_entity.has_id_setter() {
            return Err(ConfigurationError::MissingIdSetter { facade });
        }
        let version = self.version_propagation(&facade_entity, &backing_entity, map_id);

        info!(
            repository = %repository.name,
            decision = ?decision,
            fields = field_map.len(),
            versioned = version.is_some(),
            "Validated entity mapping"
        );

        Ok(ResolvedMapping {
            descriptor: descriptor.clone(),
            repository,
            decision,
            field_map,
            facade_entity,
            backing_entity,
            facade_id_type,
            backing_id_type,
            version,
        })
    }

    // -------------------------------------------------------------------------
    // Repository resolution
    // -------------------------------------------------------------------------

    fn select_repository(
        &self,
        descriptor: &EntityDescriptor,
    ) -> Result<RegisteredRepository, ConfigurationError> {
        let backing = descriptor.backing_type();
        let mut candidates = self.locator.repositories_for(backing);

        if candidates.len() <= 1 {
            return candidates
                .pop()
                .ok_or(ConfigurationError::MissingRepository { backing });
        }

        let selector = descriptor.repository_selector().ok_or_else(|| {
            ConfigurationError::AmbiguousRepository {
                backing,
                candidates: candidates.iter().map(|c| c.name.clone()).collect(),
            }
        })?;

        let mut matching: Vec<RegisteredRepository> = candidates
            .into_iter()
            .filter(|c| selector.matches(&c.name, c.information.repository_type))
            .collect();

        match matching.len() {
            1 => matching
                .pop()
                .ok_or(ConfigurationError::MissingRepository { backing }),
            0 => Err(ConfigurationError::NoRepositoryMatchesSelector {
                backing,
                selector: selector.clone(),
            }),
            count => Err(ConfigurationError::SelectorNotUnique {
                backing,
                selector: selector.clone(),
                count,
            }),
        }
    }

    // -------------------------------------------------------------------------
    // Direction checks
    // -------------------------------------------------------------------------

    fn strategy(
        &self,
        src: TypeKey,
        dest: TypeKey,
        map_id: Option<&str>,
        allow_conversion: bool,
    ) -> Result<MappingStrategy, ConfigurationError> {
        if self.mapper.has_mapping(src, dest, map_id) {
            return Ok(MappingStrategy::Mapper);
        }
        match &self.conversion {
            Some(conversion) if allow_conversion && conversion.can_convert(src, dest) => {
                debug!(src = %src, dest = %dest, "Falling back to the conversion service");
                Ok(MappingStrategy::Conversion)
            }
            _ => Err(ConfigurationError::NoMapping { src, dest }),
        }
    }

    fn required_metadata(&self, entity: TypeKey) -> Result<Arc<PersistentEntity>, ConfigurationError> {
        self.metadata
            .persistent_entity(entity)
            .ok_or(ConfigurationError::MissingMetadata { entity })
    }

    fn version_propagation(
        &self,
        facade_entity: &PersistentEntity,
        backing_entity: &PersistentEntity,
        map_id: Option<&str>,
    ) -> Option<VersionPropagation> {
        let facade = facade_entity.version_property()?;
        let backing = backing_entity.version_property()?;
        let (src, dest) = (backing.value_type(), facade.value_type());

        let strategy = if src == dest {
            VersionStrategy::Identity
        } else if self.mapper.has_mapping(src, dest, map_id) {
            VersionStrategy::Mapper
        } else if self
            .conversion
            .as_ref()
            .is_some_and(|conversion| conversion.can_convert(src, dest))
        {
            VersionStrategy::Conversion
        } else {
            warn!(
                src = %src,
                dest = %dest,
                "No way to carry the version to the facade, version propagation disabled"
            );
            return None;
        };

        Some(VersionPropagation {
            backing: backing.clone(),
            facade: facade.clone(),
            strategy,
        })
    }
}
