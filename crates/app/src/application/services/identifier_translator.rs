//! Identifier Translator - facade ids to backing ids and back

use std::any::Any;
use std::sync::Arc;

use entity_bridge_domain::{ConversionError, DynValue, MappingDecision, MappingError, MappingStrategy, TypeKey};
use entity_bridge_ports::outbound::{ConversionService, ObjectMapper};

/// Translates identifiers with whichever mechanism validation chose for each
/// direction. Pure: nothing is cached between calls.
#[derive(Clone)]
pub struct IdentifierTranslator {
    mapper: Arc<dyn ObjectMapper>,
    conversion: Option<Arc<dyn ConversionService>>,
    facade_id: TypeKey,
    backing_id: TypeKey,
    map_id: Option<String>,
    to_backing: MappingStrategy,
    to_facade: MappingStrategy,
}

impl IdentifierTranslator {
    pub fn new(
        mapper: Arc<dyn ObjectMapper>,
        conversion: Option<Arc<dyn ConversionService>>,
        facade_id: TypeKey,
        backing_id: TypeKey,
        map_id: Option<&str>,
        decision: &MappingDecision,
    ) -> Self {
        Self {
            mapper,
            conversion,
            facade_id,
            backing_id,
            map_id: map_id.map(str::to_string),
            to_backing: decision.id_to_backing,
            to_facade: decision.backing_to_id,
        }
    }

    pub fn to_backing(&self, facade_id: &dyn Any) -> Result<DynValue, MappingError> {
        self.translate(facade_id, self.facade_id, self.backing_id, self.to_backing)
    }

    pub fn to_facade(&self, backing_id: &dyn Any) -> Result<DynValue, MappingError> {
        self.translate(backing_id, self.backing_id, self.facade_id, self.to_facade)
    }

    fn translate(
        &self,
        id: &dyn Any,
        src: TypeKey,
        dest: TypeKey,
        strategy: MappingStrategy,
    ) -> Result<DynValue, MappingError> {
        if !src.matches(id) {
            return Err(MappingError::type_mismatch(src));
        }
        match strategy {
            MappingStrategy::Mapper => self.mapper.map(id, src, dest, self.map_id.as_deref()),
            MappingStrategy::Conversion => {
                let conversion = self
                    .conversion
                    .as_ref()
                    .ok_or_else(|| ConversionError::not_found(src, dest))?;
                Ok(conversion.convert(id, src, dest)?)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use entity_bridge_adapters::infrastructure::{ClassMappingRegistry, ConverterRegistry};
    use entity_bridge_domain::downcast_value;
    use uuid::Uuid;

    fn uuid_of(id: i64) -> Result<Uuid, String> {
        u64::try_from(id)
            .map(|id| Uuid::from_u64_pair(0, id))
            .map_err(|_| format!("negative id {id}"))
    }

    fn conversion() -> Arc<dyn ConversionService> {
        Arc::new(
            ConverterRegistry::new()
                .with_converter(|id: &i64| uuid_of(*id))
                .with_converter(|id: &Uuid| i64::try_from(id.as_u64_pair().1)),
        )
    }

    fn translator(decision: MappingDecision, mapper: ClassMappingRegistry) -> IdentifierTranslator {
        IdentifierTranslator::new(
            Arc::new(mapper),
            Some(conversion()),
            TypeKey::of::<i64>(),
            TypeKey::of::<Uuid>(),
            None,
            &decision,
        )
    }

    fn by_conversion() -> MappingDecision {
        MappingDecision {
            id_to_backing: MappingStrategy::Conversion,
            backing_to_id: MappingStrategy::Conversion,
            ..Default::default()
        }
    }

    #[test]
    fn converts_both_ways() {
        let translator = translator(by_conversion(), ClassMappingRegistry::default());

        let backing = translator.to_backing(&7_i64).unwrap();
        assert!(TypeKey::of::<Uuid>().matches(&*backing));
        let facade = translator.to_facade(&*backing).unwrap();
        assert_eq!(downcast_value::<i64>(facade).unwrap(), 7);
    }

    #[test]
    fn untranslatable_ids_are_mapping_errors() {
        let translator = translator(by_conversion(), ClassMappingRegistry::default());
        let err = translator.to_backing(&-1_i64).unwrap_err();
        assert!(matches!(err, MappingError::Conversion(ConversionError::Failed { .. })));
    }

    #[test]
    fn wrong_id_type_is_rejected_before_translation() {
        let translator = translator(by_conversion(), ClassMappingRegistry::default());
        let err = translator.to_backing(&7_u8).unwrap_err();
        assert_eq!(err, MappingError::type_mismatch(TypeKey::of::<i64>()));
    }

    #[test]
    fn mapper_strategy_uses_mapper_converters() {
        let mapper = ClassMappingRegistry::builder()
            .converter(|id: &i64| uuid_of(*id).map_err(|reason| {
                MappingError::failed(TypeKey::of::<i64>(), TypeKey::of::<Uuid>(), reason)
            }))
            .build();
        let translator = translator(MappingDecision::default(), mapper);

        let backing = translator.to_backing(&3_i64).unwrap();
        assert_eq!(downcast_value::<Uuid>(backing).unwrap(), Uuid::from_u64_pair(0, 3));
        // no mapper support back to i64
        assert!(translator.to_facade(&Uuid::from_u64_pair(0, 3)).is_err());
    }
}
