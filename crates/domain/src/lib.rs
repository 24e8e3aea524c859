//! Entity Bridge domain layer.
//!
//! Pure value types shared by every other crate: runtime type identity,
//! sorting and paging requests, mapping metadata, entity descriptors and the
//! reflection-free accessors used to read and write identifiers and versions.

pub mod descriptor;
pub mod error;
pub mod escape;
pub mod field_map;
pub mod mapping;
pub mod metadata;
pub mod page;
pub mod sort;
pub mod type_key;
pub mod value;

pub use descriptor::{EntityDescriptor, EntityDescriptorBuilder, MapId, RepositorySelector};
pub use error::{ConversionError, DomainError, MappingError};
pub use escape::EscapeCharacter;
pub use field_map::FieldCorrespondence;
pub use mapping::{ClassMap, FieldMap, MappingDecision, MappingDirection, MappingStrategy};
pub use metadata::{Persistable, PersistentEntity, PersistentEntityBuilder, VersionProperty};
pub use page::{Page, PageRequest};
pub use sort::{Direction, Order, Sort};
pub use type_key::TypeKey;
pub use value::{downcast_value, DynValue};
