//! Infrastructure layer - Port implementations
//!
//! This layer contains:
//! - Mapping: class mapping registry implementing the object mapper port
//! - Conversion: fallback converter registry with default scalar converters
//! - In-memory: paging and sorting store keyed by runtime property names
//! - Repositories: registry of backing repositories by entity type
//! - Metadata: persistent entity accessors by type
//! - Config: adapter configuration loaded from the environment

pub mod config;
pub mod conversion;
pub mod in_memory;
pub mod mapping;
pub mod metadata;
pub mod repositories;

pub use config::AdapterConfig;
pub use conversion::ConverterRegistry;
pub use in_memory::{InMemoryRepository, PropertyAccess, PropertyValue, StoreError};
pub use mapping::{ClassMapping, ClassMappingRegistry, ClassMappingRegistryBuilder};
pub use metadata::PersistentEntities;
pub use repositories::{RepositoryRegistration, RepositoryRegistry};
