//! Lazily mapped query results and the operation catalogue.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use std::vec;

use entity_bridge_domain::DynValue;

use super::bound_mapping::BoundMapping;
use crate::application::error::AdapterError;

/// Backing entities turned into facade entities one at a time, as the
/// iterator is advanced
pub struct MappedEntities<F> {
    mapping: Arc<BoundMapping>,
    backing: vec::IntoIter<DynValue>,
    _facade: PhantomData<fn() -> F>,
}

impl<F> MappedEntities<F> {
    pub(crate) fn new(mapping: Arc<BoundMapping>, backing: Vec<DynValue>) -> Self {
        Self {
            mapping,
            backing: backing.into_iter(),
            _facade: PhantomData,
        }
    }
}

impl<F: 'static> Iterator for MappedEntities<F> {
    type Item = Result<F, AdapterError>;

    fn next(&mut self) -> Option<Self::Item> {
        let backing = self.backing.next()?;
        Some(self.mapping.to_facade::<F>(backing).map_err(AdapterError::from))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.backing.size_hint()
    }
}

impl<F: 'static> ExactSizeIterator for MappedEntities<F> {}

impl<F> fmt::Debug for MappedEntities<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MappedEntities")
            .field("remaining", &self.backing.len())
            .finish_non_exhaustive()
    }
}

/// Every operation of the adapted CRUD surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdaptedOperation {
    FindAll,
    FindAllSorted,
    FindPage,
    FindById,
    ExistsById,
    FindAllById,
    Save,
    SaveAll,
    Count,
    DeleteById,
    Delete,
    DeleteAllEntities,
    DeleteAll,
}

impl AdaptedOperation {
    pub const ALL: [AdaptedOperation; 13] = [
        Self::FindAll,
        Self::FindAllSorted,
        Self::FindPage,
        Self::FindById,
        Self::ExistsById,
        Self::FindAllById,
        Self::Save,
        Self::SaveAll,
        Self::Count,
        Self::DeleteById,
        Self::Delete,
        Self::DeleteAllEntities,
        Self::DeleteAll,
    ];

    /// Whether results are mapped as they are consumed, so a host should
    /// keep any surrounding transaction open until then
    pub fn returns_lazy_sequence(&self) -> bool {
        matches!(
            self,
            Self::FindAll | Self::FindAllSorted | Self::FindPage | Self::FindAllById
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FindAll => "find_all",
            Self::FindAllSorted => "find_all_sorted",
            Self::FindPage => "find_page",
            Self::FindById => "find_by_id",
            Self::ExistsById => "exists_by_id",
            Self::FindAllById => "find_all_by_id",
            Self::Save => "save",
            Self::SaveAll => "save_all",
            Self::Count => "count",
            Self::DeleteById => "delete_by_id",
            Self::Delete => "delete",
            Self::DeleteAllEntities => "delete_all_entities",
            Self::DeleteAll => "delete_all",
        }
    }
}

impl fmt::Display for AdaptedOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
