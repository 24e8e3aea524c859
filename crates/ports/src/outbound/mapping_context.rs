//! Persistent entity metadata lookup.

use std::sync::Arc;

use entity_bridge_domain::{PersistentEntity, TypeKey};

/// Identifier and version accessors per entity type
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait MappingContext: Send + Sync {
    /// Metadata for `entity_type`, or `None` when the type is not persistent
    fn persistent_entity(&self, entity_type: TypeKey) -> Option<Arc<PersistentEntity>>;
}
