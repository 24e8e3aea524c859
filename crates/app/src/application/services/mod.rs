//! Application services
//!
//! Leaf-first: field name resolution and identifier/sort translation feed
//! the mapping validator, whose result drives every call of the entity
//! adapter. The adapter factory wires adapters and validates them together.

pub mod adapter_factory;
pub mod entity_adapter;
pub mod field_map_resolver;
pub mod identifier_translator;
pub mod mapping_validator;
pub mod sort_translator;

pub use adapter_factory::{AdapterDefaults, AdapterFactory};
pub use entity_adapter::{
    AdaptedOperation, AdapterDependencies, EntityAdapter, MappedEntities, ValidateAfterRefresh,
};
pub use field_map_resolver::FieldMapResolver;
pub use identifier_translator::IdentifierTranslator;
pub use mapping_validator::{MappingValidator, ResolvedMapping, VersionPropagation, VersionStrategy};
pub use sort_translator::SortTranslator;
