//! Type-erased values crossing the facade/backing boundary.

use std::any::Any;

use crate::error::MappingError;
use crate::type_key::TypeKey;

/// An owned value whose concrete type is only known at runtime.
///
/// Backing entities and identifiers travel through the adaptation layer in
/// this form so that callers never name the backing type.
pub type DynValue = Box<dyn Any + Send + Sync>;

/// Recover the concrete value from a [`DynValue`]
pub fn downcast_value<T: Any>(value: DynValue) -> Result<T, MappingError> {
    value
        .downcast::<T>()
        .map(|boxed| *boxed)
        .map_err(|_| MappingError::type_mismatch(TypeKey::of::<T>()))
}
