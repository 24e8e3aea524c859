//! Error types for the adaptation layer

use entity_bridge_domain::{MappingError, RepositorySelector, TypeKey};
use thiserror::Error;

// ============================================================================
// Startup
// ============================================================================

/// A facade entity cannot be adapted; raised once, at readiness
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("Descriptor is for facade {actual} but the adapter serves {expected}")]
    DescriptorTypeMismatch { expected: TypeKey, actual: TypeKey },

    #[error("No repository found for backing type {backing}")]
    MissingRepository { backing: TypeKey },

    #[error(
        "Found {} repositories for backing type {backing} but no repository selector was given: {candidates:?}",
        .candidates.len()
    )]
    AmbiguousRepository {
        backing: TypeKey,
        candidates: Vec<String>,
    },

    #[error("No repository for backing type {backing} matches {selector}")]
    NoRepositoryMatchesSelector {
        backing: TypeKey,
        selector: RepositorySelector,
    },

    #[error("{count} repositories for backing type {backing} match {selector}")]
    SelectorNotUnique {
        backing: TypeKey,
        selector: RepositorySelector,
        count: usize,
    },

    #[error("No persistent entity metadata found for {entity}")]
    MissingMetadata { entity: TypeKey },

    #[error("Facade {facade} is adapted with id type {expected} but its metadata declares {actual}")]
    IdTypeMismatch {
        facade: TypeKey,
        expected: TypeKey,
        actual: TypeKey,
    },

    #[error("Repository '{repository}' stores {backing} with id type {expected} but its metadata declares {actual}")]
    BackingIdTypeMismatch {
        backing: TypeKey,
        repository: String,
        expected: TypeKey,
        actual: TypeKey,
    },

    #[error("Facade {facade} has no identifier setter")]
    MissingIdSetter { facade: TypeKey },

    #[error("No mapping definition found for: {src} -> {dest}.")]
    NoMapping { src: TypeKey, dest: TypeKey },
}

// ============================================================================
// Per call
// ============================================================================

/// Failure of one adapted CRUD call.
///
/// Returned inside `anyhow::Error` by the repository trait; recover it with
/// `err.downcast_ref::<AdapterError>()`.
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("Adapter for {facade} used before validate_after_refresh")]
    NotValidated { facade: TypeKey },

    #[error("Invalid argument: {0}")]
    InvalidArgument(#[source] MappingError),

    #[error(transparent)]
    Mapping(#[from] MappingError),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("Backing repository failed: {0:#}")]
    Storage(anyhow::Error),
}

impl AdapterError {
    /// Whether the caller passed something that cannot be translated
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }
}
