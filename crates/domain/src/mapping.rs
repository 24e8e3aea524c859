//! Mapping metadata exposed by the copier's registry, and the per-entity
//! decision of which mechanism carries each direction.

use serde::{Deserialize, Serialize};

use crate::type_key::TypeKey;

/// Whether a class mapping may be used in both directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MappingDirection {
    Bidirectional,
    OneWay,
}

/// A single `src field -> dest field` pair of a class mapping
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldMap {
    pub src_field: String,
    pub dest_field: String,
}

impl FieldMap {
    pub fn new(src_field: impl Into<String>, dest_field: impl Into<String>) -> Self {
        Self {
            src_field: src_field.into(),
            dest_field: dest_field.into(),
        }
    }
}

/// Declared mapping between two types, oriented `src -> dest`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassMap {
    pub src: TypeKey,
    pub dest: TypeKey,
    pub map_id: Option<String>,
    pub direction: MappingDirection,
    pub field_maps: Vec<FieldMap>,
}

impl ClassMap {
    pub fn new(src: TypeKey, dest: TypeKey, direction: MappingDirection) -> Self {
        Self {
            src,
            dest,
            map_id: None,
            direction,
            field_maps: Vec::new(),
        }
    }

    pub fn is_one_way(&self) -> bool {
        self.direction == MappingDirection::OneWay
    }

    /// The same mapping seen from the other side: `dest -> src` with every
    /// field pair swapped
    pub fn reversed(&self) -> Self {
        Self {
            src: self.dest,
            dest: self.src,
            map_id: self.map_id.clone(),
            direction: self.direction,
            field_maps: self
                .field_maps
                .iter()
                .map(|fm| FieldMap::new(fm.dest_field.clone(), fm.src_field.clone()))
                .collect(),
        }
    }
}

/// How one direction of the facade/backing boundary is crossed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MappingStrategy {
    /// The object mapper has a mapping (or its own converter) for the pair
    #[default]
    Mapper,
    /// No mapper support; the fallback conversion service handles the pair
    Conversion,
}

/// Which mechanism carries each of the four required directions.
///
/// Computed once at validation and consulted on every translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MappingDecision {
    pub body_to_backing: MappingStrategy,
    pub backing_to_body: MappingStrategy,
    pub id_to_backing: MappingStrategy,
    pub backing_to_id: MappingStrategy,
}

impl MappingDecision {
    pub fn uses_conversion(&self) -> bool {
        [
            self.body_to_backing,
            self.backing_to_body,
            self.id_to_backing,
            self.backing_to_id,
        ]
        .contains(&MappingStrategy::Conversion)
    }
}
