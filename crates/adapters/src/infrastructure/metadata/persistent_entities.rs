use std::collections::HashMap;
use std::sync::Arc;

use entity_bridge_domain::{Persistable, PersistentEntity, TypeKey};
use entity_bridge_ports::outbound::MappingContext;

/// Persistent entity metadata keyed by entity type
#[derive(Debug, Clone, Default)]
pub struct PersistentEntities {
    entities: HashMap<TypeKey, Arc<PersistentEntity>>,
}

impl PersistentEntities {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) the metadata for `entity.entity_type()`
    pub fn register(&mut self, entity: PersistentEntity) -> &mut Self {
        self.entities.insert(entity.entity_type(), Arc::new(entity));
        self
    }

    pub fn with(mut self, entity: PersistentEntity) -> Self {
        self.register(entity);
        self
    }

    /// Metadata derived from `T`'s [`Persistable`] implementation, no version
    pub fn with_persistable<T: Persistable>(self) -> Self {
        self.with(PersistentEntity::persistable::<T>().build())
    }

    pub fn contains(&self, entity_type: TypeKey) -> bool {
        self.entities.contains_key(&entity_type)
    }
}

impl MappingContext for PersistentEntities {
    fn persistent_entity(&self, entity_type: TypeKey) -> Option<Arc<PersistentEntity>> {
        self.entities.get(&entity_type).cloned()
    }
}
