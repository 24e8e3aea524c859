//! Persistent entity metadata registry

mod persistent_entities;

pub use persistent_entities::PersistentEntities;
