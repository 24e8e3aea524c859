//! In-memory paging and sorting store
//!
//! Stores entities in a `Vec` behind a `tokio::sync::RwLock`, in insertion
//! order. Suitable for testing and development only.

mod property;
mod repository;

pub use property::{PropertyAccess, PropertyValue};
pub use repository::{InMemoryRepository, StoreError};
