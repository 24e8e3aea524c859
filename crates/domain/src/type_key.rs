//! Runtime type identity used to key mappings, converters and repositories.

use std::any::{Any, TypeId};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Identifies a Rust type at runtime.
///
/// Equality and hashing use only the [`TypeId`]; the name is carried for
/// diagnostics so configuration errors can say which types were involved.
#[derive(Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    /// Key for the concrete type `T`
    pub fn of<T: Any + ?Sized>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Fully qualified type name as reported by the compiler
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Last path segment of the type name, e.g. `OrderEntity`
    pub fn short_name(&self) -> &'static str {
        let without_generics = self.name.split('<').next().unwrap_or(self.name);
        without_generics
            .rsplit("::")
            .next()
            .unwrap_or(without_generics)
    }

    /// Whether `value` holds an instance of this type
    pub fn matches(&self, value: &dyn Any) -> bool {
        value.type_id() == self.id
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialOrd for TypeKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TypeKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(other.name).then_with(|| self.id.cmp(&other.id))
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
