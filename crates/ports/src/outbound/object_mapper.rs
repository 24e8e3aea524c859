//! The copier: bean-to-bean mapping with a queryable registry.

use std::any::Any;

use entity_bridge_domain::{ClassMap, DynValue, MappingError, TypeKey};

/// Copies values between types and answers questions about its registry.
///
/// A `map_id` scopes the lookup to one named mapping context. `None` means
/// the unscoped mappings.
///
/// # Used By
/// - `FieldMapResolver` - reads class maps and supertypes
/// - `MappingValidator` - checks mapping existence in all four directions
/// - `EntityAdapter` / `IdentifierTranslator` - perform the actual copies
pub trait ObjectMapper: Send + Sync {
    /// Create a new `dest` value from `source` (an instance of `src`)
    fn map(
        &self,
        source: &dyn Any,
        src: TypeKey,
        dest: TypeKey,
        map_id: Option<&str>,
    ) -> Result<DynValue, MappingError>;

    /// Copy `source` onto an existing `dest` instance, leaving unmapped
    /// destination fields untouched
    fn map_into(
        &self,
        source: &dyn Any,
        src: TypeKey,
        dest: &mut dyn Any,
        dest_type: TypeKey,
        map_id: Option<&str>,
    ) -> Result<(), MappingError>;

    /// Whether a copy `src -> dest` can be performed, either through a
    /// declared mapping or one of the mapper's own converters
    fn has_mapping(&self, src: TypeKey, dest: TypeKey, map_id: Option<&str>) -> bool;

    /// The declared class map usable for `src -> dest`, oriented that way
    fn find_mapping(&self, src: TypeKey, dest: TypeKey, map_id: Option<&str>) -> Option<ClassMap>;

    /// Whether the mapper has a custom converter for exactly this pair
    fn has_converter(&self, src: TypeKey, dest: TypeKey) -> bool;

    /// `ty` followed by its declared supertypes, most specific first
    fn supertypes(&self, ty: TypeKey) -> Vec<TypeKey>;
}
