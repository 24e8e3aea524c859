//! Lookup of backing repositories by managed entity type.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use entity_bridge_domain::TypeKey;

use super::BackingRepository;

/// Static facts about a registered repository
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepositoryInformation {
    pub entity_type: TypeKey,
    pub id_type: TypeKey,
    pub repository_type: TypeKey,
}

impl RepositoryInformation {
    /// Information for repository `R` managing `T` keyed by `ID`
    pub fn of<R: Any, T: Any, ID: Any>() -> Self {
        Self {
            entity_type: TypeKey::of::<T>(),
            id_type: TypeKey::of::<ID>(),
            repository_type: TypeKey::of::<R>(),
        }
    }
}

/// A repository together with its registration name and information
#[derive(Clone)]
pub struct RegisteredRepository {
    pub name: String,
    pub information: RepositoryInformation,
    pub repository: Arc<dyn BackingRepository>,
}

impl fmt::Debug for RegisteredRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredRepository")
            .field("name", &self.name)
            .field("information", &self.information)
            .finish_non_exhaustive()
    }
}

/// Finds every repository able to manage an entity type
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait RepositoryLocator: Send + Sync {
    /// Registrations for `entity_type`, in registration order
    fn repositories_for(&self, entity_type: TypeKey) -> Vec<RegisteredRepository>;
}
