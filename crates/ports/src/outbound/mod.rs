//! Outbound ports - collaborators the adaptation layer requires.
//!
//! Every trait here is implemented in `entity-bridge-adapters`; the
//! application services only ever hold them as `Arc<dyn ...>`.

mod backing_repository;
mod conversion_service;
mod mapping_context;
mod object_mapper;
mod paging_repository;
mod repository_locator;

// Backing store - type-erased paging/sorting CRUD
pub use backing_repository::BackingRepository;
#[cfg(any(test, feature = "testing"))]
pub use backing_repository::MockBackingRepository;

// Typed CRUD surface and the bridge onto the erased store
pub use paging_repository::{PagingAndSortingRepository, TypedRepository};

// Copier with a queryable mapping registry
pub use object_mapper::ObjectMapper;

// Fallback converters
pub use conversion_service::ConversionService;

// Repository lookup by entity type
pub use repository_locator::{RegisteredRepository, RepositoryInformation, RepositoryLocator};
#[cfg(any(test, feature = "testing"))]
pub use repository_locator::MockRepositoryLocator;

// Persistent entity metadata
pub use mapping_context::MappingContext;
#[cfg(any(test, feature = "testing"))]
pub use mapping_context::MockMappingContext;
