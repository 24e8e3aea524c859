//! In-process object mapper backed by declared class mappings.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use entity_bridge_domain::{ClassMap, DynValue, MappingError, TypeKey};
use entity_bridge_ports::outbound::ObjectMapper;
use tracing::{debug, warn};

use super::class_mapping::{ClassMapping, Copier};

type ConvertFn = Arc<dyn Fn(&dyn Any) -> Result<DynValue, MappingError> + Send + Sync>;
type CopierKey = (TypeKey, TypeKey, Option<String>);

/// Registry of class mappings, custom converters and declared supertypes.
///
/// Lookup rules:
/// - `find_mapping` is strict on the map id and returns the declared map, or
///   the reversed map of a bidirectional declaration.
/// - `map` / `map_into` / `has_mapping` try the scoped copier first and fall
///   back to the unscoped one, then to a custom converter for the exact pair.
#[derive(Clone, Default)]
pub struct ClassMappingRegistry {
    class_maps: Vec<ClassMap>,
    copiers: HashMap<CopierKey, Copier>,
    converters: HashMap<(TypeKey, TypeKey), ConvertFn>,
    supertypes: HashMap<TypeKey, Vec<TypeKey>>,
}

impl ClassMappingRegistry {
    pub fn builder() -> ClassMappingRegistryBuilder {
        ClassMappingRegistryBuilder::default()
    }

    fn copier(&self, src: TypeKey, dest: TypeKey, map_id: Option<&str>) -> Option<&Copier> {
        map_id
            .filter(|id| !id.is_empty())
            .and_then(|id| self.copiers.get(&(src, dest, Some(id.to_string()))))
            .or_else(|| self.copiers.get(&(src, dest, None)))
    }

    pub fn class_maps(&self) -> &[ClassMap] {
        &self.class_maps
    }
}

impl ObjectMapper for ClassMappingRegistry {
    fn map(
        &self,
        source: &dyn Any,
        src: TypeKey,
        dest: TypeKey,
        map_id: Option<&str>,
    ) -> Result<DynValue, MappingError> {
        if let Some(copier) = self.copier(src, dest, map_id) {
            let mut value = (copier.create)();
            (copier.copy)(source, &mut *value)?;
            return Ok(value);
        }
        if let Some(convert) = self.converters.get(&(src, dest)) {
            return convert(source);
        }
        Err(MappingError::no_mapping(src, dest))
    }

    fn map_into(
        &self,
        source: &dyn Any,
        src: TypeKey,
        dest: &mut dyn Any,
        dest_type: TypeKey,
        map_id: Option<&str>,
    ) -> Result<(), MappingError> {
        match self.copier(src, dest_type, map_id) {
            Some(copier) => (copier.copy)(source, dest),
            None => Err(MappingError::no_mapping(src, dest_type)),
        }
    }

    fn has_mapping(&self, src: TypeKey, dest: TypeKey, map_id: Option<&str>) -> bool {
        self.copier(src, dest, map_id).is_some() || self.has_converter(src, dest)
    }

    fn find_mapping(&self, src: TypeKey, dest: TypeKey, map_id: Option<&str>) -> Option<ClassMap> {
        let map_id = map_id.filter(|id| !id.is_empty());
        let in_scope = |m: &&ClassMap| m.map_id.as_deref() == map_id;

        self.class_maps
            .iter()
            .filter(in_scope)
            .find(|m| m.src == src && m.dest == dest)
            .cloned()
            .or_else(|| {
                self.class_maps
                    .iter()
                    .filter(in_scope)
                    .find(|m| m.src == dest && m.dest == src && !m.is_one_way())
                    .map(ClassMap::reversed)
            })
    }

    fn has_converter(&self, src: TypeKey, dest: TypeKey) -> bool {
        self.converters.contains_key(&(src, dest))
    }

    fn supertypes(&self, ty: TypeKey) -> Vec<TypeKey> {
        let mut types = vec![ty];
        if let Some(declared) = self.supertypes.get(&ty) {
            types.extend(declared.iter().copied());
        }
        types
    }
}

/// Builder for [`ClassMappingRegistry`]
#[derive(Default)]
pub struct ClassMappingRegistryBuilder {
    registry: ClassMappingRegistry,
}

impl ClassMappingRegistryBuilder {
    /// Register a mapping together with its copy logic
    pub fn mapping<S, D>(mut self, mapping: ClassMapping<S, D>) -> Self
    where
        S: Any + Send + Sync,
        D: Any + Send + Sync,
    {
        let (class_map, forward, backward) = mapping.into_parts();
        if let Some(copier) = forward {
            self.registry
                .copiers
                .insert((class_map.src, class_map.dest, class_map.map_id.clone()), copier);
        }
        if let Some(copier) = backward {
            if class_map.is_one_way() {
                warn!(
                    src = %class_map.src,
                    dest = %class_map.dest,
                    "Ignoring backward copy logic on a one-way mapping"
                );
            } else {
                self.registry
                    .copiers
                    .insert((class_map.dest, class_map.src, class_map.map_id.clone()), copier);
            }
        }
        debug!(
            src = %class_map.src,
            dest = %class_map.dest,
            map_id = ?class_map.map_id,
            fields = class_map.field_maps.len(),
            "Registered class mapping"
        );
        self.registry.class_maps.push(class_map);
        self
    }

    /// Register mapping metadata with no copy logic, e.g. between supertypes
    pub fn declare(mut self, class_map: ClassMap) -> Self {
        self.registry.class_maps.push(class_map);
        self
    }

    /// Register a custom converter for exactly `S -> D`
    pub fn converter<S, D>(
        mut self,
        convert: impl Fn(&S) -> Result<D, MappingError> + Send + Sync + 'static,
    ) -> Self
    where
        S: Any,
        D: Any + Send + Sync,
    {
        let convert: ConvertFn = Arc::new(move |source: &dyn Any| -> Result<DynValue, MappingError> {
            let source = source
                .downcast_ref::<S>()
                .ok_or_else(|| MappingError::type_mismatch(TypeKey::of::<S>()))?;
            Ok(Box::new(convert(source)?))
        });
        self.registry
            .converters
            .insert((TypeKey::of::<S>(), TypeKey::of::<D>()), convert);
        self
    }

    /// Declare the supertypes of `T`, most specific first
    pub fn supertypes<T: Any>(mut self, supertypes: Vec<TypeKey>) -> Self {
        self.registry.supertypes.insert(TypeKey::of::<T>(), supertypes);
        self
    }

    pub fn build(self) -> ClassMappingRegistry {
        self.registry
    }
}
