//! Reflection-free persistent entity metadata.
//!
//! A [`PersistentEntity`] carries typed accessor closures behind an erased
//! interface, so code that only holds a [`TypeKey`] can still read and write
//! identifiers and optimistic-concurrency versions.

use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::error::MappingError;
use crate::type_key::TypeKey;
use crate::value::{downcast_value, DynValue};

type Getter = Arc<dyn Fn(&dyn Any) -> Result<Option<DynValue>, MappingError> + Send + Sync>;
type Setter = Arc<dyn Fn(&mut dyn Any, DynValue) -> Result<(), MappingError> + Send + Sync>;
type NewPredicate = Arc<dyn Fn(&dyn Any) -> Result<bool, MappingError> + Send + Sync>;

/// An entity that knows its own identifier
pub trait Persistable: Any + Send + Sync {
    type Id: Any + Clone + Send + Sync;

    fn id(&self) -> Option<Self::Id>;

    fn set_id(&mut self, id: Self::Id);

    /// Whether the entity has never been persisted
    fn is_new(&self) -> bool {
        self.id().is_none()
    }
}

fn entity_ref<T: Any>(entity: &dyn Any) -> Result<&T, MappingError> {
    entity
        .downcast_ref::<T>()
        .ok_or_else(|| MappingError::type_mismatch(TypeKey::of::<T>()))
}

fn entity_mut<T: Any>(entity: &mut dyn Any) -> Result<&mut T, MappingError> {
    entity
        .downcast_mut::<T>()
        .ok_or_else(|| MappingError::type_mismatch(TypeKey::of::<T>()))
}

/// Optimistic-concurrency version property of an entity
#[derive(Clone)]
pub struct VersionProperty {
    value_type: TypeKey,
    getter: Getter,
    setter: Setter,
}

impl VersionProperty {
    pub fn value_type(&self) -> TypeKey {
        self.value_type
    }

    pub fn get(&self, entity: &dyn Any) -> Result<Option<DynValue>, MappingError> {
        (self.getter)(entity)
    }

    pub fn set(&self, entity: &mut dyn Any, value: DynValue) -> Result<(), MappingError> {
        (self.setter)(entity, value)
    }
}

impl fmt::Debug for VersionProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VersionProperty")
            .field("value_type", &self.value_type)
            .finish_non_exhaustive()
    }
}

/// Identifier and version accessors for one entity type
#[derive(Clone)]
pub struct PersistentEntity {
    entity_type: TypeKey,
    id_type: TypeKey,
    id_getter: Getter,
    id_setter: Option<Setter>,
    is_new: NewPredicate,
    version: Option<VersionProperty>,
}

impl PersistentEntity {
    /// Describe `T` whose identifier of type `I` is read by `getter`
    pub fn with_id<T, I>(
        getter: impl Fn(&T) -> Option<I> + Send + Sync + 'static,
    ) -> PersistentEntityBuilder<T, I>
    where
        T: Any + Send + Sync,
        I: Any + Send + Sync,
    {
        PersistentEntityBuilder::new(getter)
    }

    /// Metadata derived from the entity's [`Persistable`] implementation
    pub fn persistable<T: Persistable>() -> PersistentEntityBuilder<T, T::Id> {
        Self::with_id(T::id)
            .id_setter(T::set_id)
            .is_new(T::is_new)
    }

    pub fn entity_type(&self) -> TypeKey {
        self.entity_type
    }

    pub fn id_type(&self) -> TypeKey {
        self.id_type
    }

    pub fn identifier(&self, entity: &dyn Any) -> Result<Option<DynValue>, MappingError> {
        (self.id_getter)(entity)
    }

    /// Identifier of an entity that must already have one
    pub fn required_identifier(&self, entity: &dyn Any) -> Result<DynValue, MappingError> {
        self.identifier(entity)?
            .ok_or(MappingError::MissingIdentifier {
                entity: self.entity_type,
            })
    }

    pub fn has_id_setter(&self) -> bool {
        self.id_setter.is_some()
    }

    pub fn set_identifier(&self, entity: &mut dyn Any, id: DynValue) -> Result<(), MappingError> {
        match &self.id_setter {
            Some(setter) => setter(entity, id),
            None => Err(MappingError::MissingIdentifierSetter {
                entity: self.entity_type,
            }),
        }
    }

    pub fn is_new(&self, entity: &dyn Any) -> Result<bool, MappingError> {
        (self.is_new)(entity)
    }

    pub fn version_property(&self) -> Option<&VersionProperty> {
        self.version.as_ref()
    }

    pub fn has_version_property(&self) -> bool {
        self.version.is_some()
    }
}

impl fmt::Debug for PersistentEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersistentEntity")
            .field("entity_type", &self.entity_type)
            .field("id_type", &self.id_type)
            .field("has_id_setter", &self.id_setter.is_some())
            .field("version", &self.version)
            .finish()
    }
}

/// Builder for [`PersistentEntity`]
pub struct PersistentEntityBuilder<T, I> {
    id_getter: Getter,
    id_setter: Option<Setter>,
    is_new: Option<NewPredicate>,
    version: Option<VersionProperty>,
    _marker: PhantomData<fn(T) -> I>,
}

impl<T, I> PersistentEntityBuilder<T, I>
where
    T: Any + Send + Sync,
    I: Any + Send + Sync,
{
    fn new(getter: impl Fn(&T) -> Option<I> + Send + Sync + 'static) -> Self {
        let id_getter: Getter = Arc::new(move |entity: &dyn Any| -> Result<Option<DynValue>, MappingError> {
            let id = getter(entity_ref::<T>(entity)?);
            Ok(id.map(|id| Box::new(id) as DynValue))
        });
        Self {
            id_getter,
            id_setter: None,
            is_new: None,
            version: None,
            _marker: PhantomData,
        }
    }

    pub fn id_setter(mut self, setter: impl Fn(&mut T, I) + Send + Sync + 'static) -> Self {
        self.id_setter = Some(Arc::new(move |entity: &mut dyn Any, id: DynValue| -> Result<(), MappingError> {
            let id = downcast_value::<I>(id)?;
            setter(entity_mut::<T>(entity)?, id);
            Ok(())
        }));
        self
    }

    /// Override the default "has no identifier" new-entity check
    pub fn is_new(mut self, predicate: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
        self.is_new = Some(Arc::new(move |entity: &dyn Any| -> Result<bool, MappingError> {
            Ok(predicate(entity_ref::<T>(entity)?))
        }));
        self
    }

    pub fn version<V: Any + Send + Sync>(
        mut self,
        getter: impl Fn(&T) -> Option<V> + Send + Sync + 'static,
        setter: impl Fn(&mut T, V) + Send + Sync + 'static,
    ) -> Self {
        self.version = Some(VersionProperty {
            value_type: TypeKey::of::<V>(),
            getter: Arc::new(move |entity: &dyn Any| -> Result<Option<DynValue>, MappingError> {
                let version = getter(entity_ref::<T>(entity)?);
                Ok(version.map(|v| Box::new(v) as DynValue))
            }),
            setter: Arc::new(move |entity: &mut dyn Any, value: DynValue| -> Result<(), MappingError> {
                let value = downcast_value::<V>(value)?;
                setter(entity_mut::<T>(entity)?, value);
                Ok(())
            }),
        });
        self
    }

    pub fn build(self) -> PersistentEntity {
        let is_new = match self.is_new {
            Some(predicate) => predicate,
            None => {
                let getter = Arc::clone(&self.id_getter);
                Arc::new(move |entity: &dyn Any| -> Result<bool, MappingError> {
                    Ok(getter(entity)?.is_none())
                }) as NewPredicate
            }
        };
        PersistentEntity {
            entity_type: TypeKey::of::<T>(),
            id_type: TypeKey::of::<I>(),
            id_getter: self.id_getter,
            id_setter: self.id_setter,
            is_new,
            version: self.version,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Order {
        id: Option<i64>,
        version: Option<u32>,
    }

    impl Persistable for Order {
        type Id = i64;

        fn id(&self) -> Option<i64> {
            self.id
        }

        fn set_id(&mut self, id: i64) {
            self.id = Some(id);
        }
    }

    fn order_metadata() -> PersistentEntity {
        PersistentEntity::persistable::<Order>()
            .version(|o: &Order| o.version, |o: &mut Order, v| o.version = Some(v))
            .build()
    }

    #[test]
    fn persistable_metadata_reads_and_writes_ids() {
        let metadata = order_metadata();
        let mut order = Order::default();

        assert!(metadata.is_new(&order).unwrap());
        metadata.set_identifier(&mut order, Box::new(42_i64)).unwrap();
        assert_eq!(order.id, Some(42));
        assert!(!metadata.is_new(&order).unwrap());

        let id = metadata.required_identifier(&order).unwrap();
        assert_eq!(downcast_value::<i64>(id).unwrap(), 42);
        assert_eq!(metadata.id_type(), TypeKey::of::<i64>());
    }

    #[test]
    fn wrong_id_type_is_rejected() {
        let metadata = order_metadata();
        let mut order = Order::default();
        let err = metadata
            .set_identifier(&mut order, Box::new("42".to_string()))
            .unwrap_err();
        assert!(matches!(err, MappingError::TypeMismatch { .. }));
    }

    #[test]
    fn missing_identifier_is_reported() {
        let metadata = order_metadata();
        let err = metadata.required_identifier(&Order::default()).unwrap_err();
        assert_eq!(
            err,
            MappingError::MissingIdentifier {
                entity: TypeKey::of::<Order>()
            }
        );
    }

    #[test]
    fn read_only_ids_have_no_setter() {
        let metadata = PersistentEntity::with_id(|o: &Order| o.id).build();
        let mut order = Order::default();
        assert!(!metadata.has_id_setter());
        assert!(metadata.set_identifier(&mut order, Box::new(1_i64)).is_err());
    }

    #[test]
    fn version_property_round_trips_through_erased_values() {
        let metadata = order_metadata();
        let mut order = Order::default();
        let version = metadata.version_property().unwrap();

        version.set(&mut order, Box::new(3_u32)).unwrap();
        let read = version.get(&order).unwrap().unwrap();
        assert_eq!(downcast_value::<u32>(read).unwrap(), 3);
        assert_eq!(version.value_type(), TypeKey::of::<u32>());
    }
}
