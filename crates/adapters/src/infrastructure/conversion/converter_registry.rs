//! Registry of typed converters behind the conversion service port.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use entity_bridge_domain::{ConversionError, DynValue, TypeKey};
use entity_bridge_ports::outbound::ConversionService;

type ConvertFn = Arc<dyn Fn(&dyn Any) -> Result<DynValue, ConversionError> + Send + Sync>;

/// Converters keyed by their exact `(source, target)` type pair
#[derive(Clone, Default)]
pub struct ConverterRegistry {
    converters: HashMap<(TypeKey, TypeKey), ConvertFn>,
}

impl ConverterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with identity, string and numeric converters
    pub fn with_default_converters() -> Self {
        let mut registry = Self::new();
        super::defaults::register_defaults(&mut registry);
        registry
    }

    /// Register a fallible converter; errors become [`ConversionError::Failed`]
    pub fn register<S, D, E>(
        &mut self,
        convert: impl Fn(&S) -> Result<D, E> + Send + Sync + 'static,
    ) -> &mut Self
    where
        S: Any,
        D: Any + Send + Sync,
        E: fmt::Display,
    {
        let (src, dest) = (TypeKey::of::<S>(), TypeKey::of::<D>());
        let convert: ConvertFn = Arc::new(move |value: &dyn Any| -> Result<DynValue, ConversionError> {
            let value = value
                .downcast_ref::<S>()
                .ok_or_else(|| ConversionError::failed(src, dest, format!("value is not a {}", src)))?;
            convert(value)
                .map(|converted| Box::new(converted) as DynValue)
                .map_err(|e| ConversionError::failed(src, dest, e.to_string()))
        });
        self.converters.insert((src, dest), convert);
        self
    }

    /// Builder-style [`ConverterRegistry::register`]
    pub fn with_converter<S, D, E>(
        mut self,
        convert: impl Fn(&S) -> Result<D, E> + Send + Sync + 'static,
    ) -> Self
    where
        S: Any,
        D: Any + Send + Sync,
        E: fmt::Display,
    {
        self.register(convert);
        self
    }

    pub fn len(&self) -> usize {
        self.converters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }
}

impl ConversionService for ConverterRegistry {
    fn can_convert(&self, src: TypeKey, dest: TypeKey) -> bool {
        self.converters.contains_key(&(src, dest))
    }

    fn convert(&self, value: &dyn Any, src: TypeKey, dest: TypeKey) -> Result<DynValue, ConversionError> {
        let convert = self
            .converters
            .get(&(src, dest))
            .ok_or_else(|| ConversionError::not_found(src, dest))?;
        convert(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use entity_bridge_domain::downcast_value;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn convert<S: Any, D: Any>(registry: &ConverterRegistry, value: S) -> Result<D, ConversionError> {
        let converted = registry.convert(&value, TypeKey::of::<S>(), TypeKey::of::<D>())?;
        Ok(downcast_value::<D>(converted).unwrap())
    }

    #[test]
    fn only_exact_pairs_are_convertible() {
        let registry = ConverterRegistry::new().with_converter(|v: &i64| Ok::<_, String>(*v as f64));
        assert!(registry.can_convert(TypeKey::of::<i64>(), TypeKey::of::<f64>()));
        assert!(!registry.can_convert(TypeKey::of::<f64>(), TypeKey::of::<i64>()));
        assert!(!registry.can_convert(TypeKey::of::<i32>(), TypeKey::of::<f64>()));
    }

    #[test]
    fn missing_converter_is_reported() {
        let registry = ConverterRegistry::new();
        let err = convert::<u8, String>(&registry, 1).unwrap_err();
        assert!(matches!(err, ConversionError::ConverterNotFound { .. }));
    }

    #[test]
    fn converter_failures_carry_the_reason() {
        let registry = ConverterRegistry::with_default_converters();
        let err = convert::<String, i64>(&registry, "forty-two".to_string()).unwrap_err();
        match err {
            ConversionError::Failed { reason, .. } => assert!(reason.contains("invalid digit")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn default_converters_cover_common_scalars() {
        let registry = ConverterRegistry::with_default_converters();

        assert_eq!(convert::<i64, i64>(&registry, 7).unwrap(), 7);
        assert_eq!(convert::<i32, i64>(&registry, 7).unwrap(), 7);
        assert_eq!(convert::<String, u32>(&registry, "12".to_string()).unwrap(), 12);
        assert_eq!(convert::<u64, String>(&registry, 12).unwrap(), "12");
        assert_eq!(convert::<f64, Decimal>(&registry, 2.5).unwrap(), dec!(2.5));
        assert_eq!(convert::<Decimal, f64>(&registry, dec!(2.5)).unwrap(), 2.5);

        let id = Uuid::new_v4();
        assert_eq!(convert::<Uuid, String>(&registry, id).unwrap(), id.to_string());
        assert_eq!(convert::<String, Uuid>(&registry, id.to_string()).unwrap(), id);
    }

    #[test]
    fn narrowing_out_of_range_fails() {
        let registry = ConverterRegistry::with_default_converters();
        assert!(convert::<i64, u32>(&registry, -1).is_err());
    }
}
