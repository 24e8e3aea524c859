//! Typed declaration of a mapping between two types.

use std::any::Any;
use std::marker::PhantomData;
use std::sync::Arc;

use entity_bridge_domain::{ClassMap, DynValue, FieldMap, MappingDirection, MappingError, TypeKey};

pub(crate) type CreateFn = Arc<dyn Fn() -> DynValue + Send + Sync>;
pub(crate) type CopyFn = Arc<dyn Fn(&dyn Any, &mut dyn Any) -> Result<(), MappingError> + Send + Sync>;

/// Erased "new instance + copy fields" pair for one direction
#[derive(Clone)]
pub(crate) struct Copier {
    pub(crate) create: CreateFn,
    pub(crate) copy: CopyFn,
}

impl Copier {
    fn new<S, D>(copy: impl Fn(&S, &mut D) -> Result<(), MappingError> + Send + Sync + 'static) -> Self
    where
        S: Any,
        D: Any + Default + Send + Sync,
    {
        Self {
            create: Arc::new(|| Box::new(D::default()) as DynValue),
            copy: Arc::new(
                move |source: &dyn Any, dest: &mut dyn Any| -> Result<(), MappingError> {
                    let source = source
                        .downcast_ref::<S>()
                        .ok_or_else(|| MappingError::type_mismatch(TypeKey::of::<S>()))?;
                    let dest = dest
                        .downcast_mut::<D>()
                        .ok_or_else(|| MappingError::type_mismatch(TypeKey::of::<D>()))?;
                    copy(source, dest)
                },
            ),
        }
    }
}

/// Mapping between `S` and `D`, bidirectional unless marked one-way.
///
/// Field pairs are metadata read by field-name resolution; the actual copy
/// is done by the `forward` / `backward` closures.
///
/// ```ignore
/// let mapping = ClassMapping::<Order, OrderEntity>::between()
///     .field("total", "amount")
///     .forward(|order, entity| { entity.amount = order.total; Ok(()) })
///     .backward(|entity, order| { order.total = entity.amount; Ok(()) });
/// ```
pub struct ClassMapping<S, D> {
    map_id: Option<String>,
    direction: MappingDirection,
    field_maps: Vec<FieldMap>,
    forward: Option<Copier>,
    backward: Option<Copier>,
    _marker: PhantomData<fn(S) -> D>,
}

impl<S, D> ClassMapping<S, D>
where
    S: Any + Send + Sync,
    D: Any + Send + Sync,
{
    pub fn between() -> Self {
        Self {
            map_id: None,
            direction: MappingDirection::Bidirectional,
            field_maps: Vec::new(),
            forward: None,
            backward: None,
            _marker: PhantomData,
        }
    }

    /// Declare that `src_field` on `S` corresponds to `dest_field` on `D`
    pub fn field(mut self, src_field: impl Into<String>, dest_field: impl Into<String>) -> Self {
        self.field_maps.push(FieldMap::new(src_field, dest_field));
        self
    }

    /// Scope this mapping to a named mapping context
    pub fn map_id(mut self, map_id: impl Into<String>) -> Self {
        let map_id = map_id.into();
        self.map_id = (!map_id.is_empty()).then_some(map_id);
        self
    }

    pub fn one_way(mut self) -> Self {
        self.direction = MappingDirection::OneWay;
        self
    }

    /// Copy logic for `S -> D`; new destinations start from `D::default()`
    pub fn forward(mut self, copy: impl Fn(&S, &mut D) -> Result<(), MappingError> + Send + Sync + 'static) -> Self
    where
        D: Default,
    {
        self.forward = Some(Copier::new(copy));
        self
    }

    /// Copy logic for `D -> S`; ignored for one-way mappings
    pub fn backward(mut self, copy: impl Fn(&D, &mut S) -> Result<(), MappingError> + Send + Sync + 'static) -> Self
    where
        S: Default,
    {
        self.backward = Some(Copier::new(copy));
        self
    }

    pub(crate) fn into_parts(self) -> (ClassMap, Option<Copier>, Option<Copier>) {
        let class_map = ClassMap {
            src: TypeKey::of::<S>(),
            dest: TypeKey::of::<D>(),
            map_id: self.map_id,
            direction: self.direction,
            field_maps: self.field_maps,
        };
        (class_map, self.forward, self.backward)
    }
}
