//! Field Map Resolver - facade field names to backing field names
//!
//! Reads the object mapper's class maps for the facade/backing pair and for
//! every pair of their declared supertypes, so sort criteria written against
//! facade property names can be rewritten for the backing store.

use std::sync::Arc;

use entity_bridge_domain::{ClassMap, FieldCorrespondence, TypeKey};
use entity_bridge_ports::outbound::ObjectMapper;
use tracing::{debug, instrument};

#[derive(Clone)]
pub struct FieldMapResolver {
    mapper: Arc<dyn ObjectMapper>,
}

impl FieldMapResolver {
    pub fn new(mapper: Arc<dyn ObjectMapper>) -> Self {
        Self { mapper }
    }

    /// Resolve the correspondence for `facade` against `backing`.
    ///
    /// Returns an empty correspondence when there is no mapping at all, or
    /// only a one-way mapping from backing to facade.
    #[instrument(skip(self))]
    pub fn resolve(
        &self,
        facade: TypeKey,
        backing: TypeKey,
        map_id: Option<&str>,
    ) -> FieldCorrespondence {
        let map_id = map_id.filter(|id| !id.is_empty());

        let (primary, facade_to_backing) = match self.mapper.find_mapping(facade, backing, map_id) {
            Some(mapping) => (mapping, true),
            None => match self.mapper.find_mapping(backing, facade, map_id) {
                Some(mapping) if !mapping.is_one_way() => (mapping, false),
                _ => {
                    debug!("No usable class mapping, field names pass through unchanged");
                    return FieldCorrespondence::new();
                }
            },
        };

        let mut fields = FieldCorrespondence::new();
        let src_types = self.mapper.supertypes(primary.src);
        let dest_types = self.mapper.supertypes(primary.dest);

        for src in &src_types {
            for dest in &dest_types {
                if *src == primary.src && *dest == primary.dest {
                    continue;
                }
                if let Some(mapping) = self.mapper.find_mapping(*src, *dest, map_id) {
                    merge(&mut fields, &mapping, facade_to_backing);
                }
            }
        }

        // Supertype pairs were merged first; the primary mapping never overwrites them
        merge(&mut fields, &primary, facade_to_backing);

        debug!(fields = fields.len(), "Resolved field correspondence");
        fields
    }
}

fn merge(fields: &mut FieldCorrespondence, mapping: &ClassMap, facade_to_backing: bool) {
    for field_map in &mapping.field_maps {
        let (facade, backing) = if facade_to_backing {
            (&field_map.src_field, &field_map.dest_field)
        } else {
            (&field_map.dest_field, &field_map.src_field)
        };
        fields.insert_if_absent(facade, backing);
    }
}
