//! Fallback value conversion between otherwise unmapped types.

use std::any::Any;

use entity_bridge_domain::{ConversionError, DynValue, TypeKey};

/// Registry of converters consulted when the object mapper has no mapping.
///
/// Only the exact `src -> dest` pair counts; there is no subtype lookup.
pub trait ConversionService: Send + Sync {
    fn can_convert(&self, src: TypeKey, dest: TypeKey) -> bool;

    /// Convert `value` (an instance of `src`) into a new `dest` value
    fn convert(&self, value: &dyn Any, src: TypeKey, dest: TypeKey) -> Result<DynValue, ConversionError>;
}
