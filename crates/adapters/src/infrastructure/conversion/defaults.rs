//! Converters registered by `ConverterRegistry::with_default_converters`.

use std::convert::Infallible;

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::ConverterRegistry;

macro_rules! identity {
    ($registry:expr, $($ty:ty),+ $(,)?) => {
        $( $registry.register(|v: &$ty| Ok::<$ty, Infallible>(v.clone())); )+
    };
}

macro_rules! via_string {
    ($registry:expr, $($ty:ty),+ $(,)?) => {
        $(
            $registry.register(|v: &$ty| Ok::<String, Infallible>(v.to_string()));
            $registry.register(|s: &String| s.trim().parse::<$ty>());
        )+
    };
}

macro_rules! try_from {
    ($registry:expr, $($src:ty => $dest:ty),+ $(,)?) => {
        $( $registry.register(|v: &$src| <$dest>::try_from(*v)); )+
    };
}

pub(super) fn register_defaults(registry: &mut ConverterRegistry) {
    identity!(
        registry,
        bool,
        char,
        i8,
        i16,
        i32,
        i64,
        u8,
        u16,
        u32,
        u64,
        f32,
        f64,
        String,
        Uuid,
        Decimal,
        DateTime<Utc>,
    );

    via_string!(registry, bool, i32, i64, u32, u64, f64, Uuid, Decimal);

    try_from!(
        registry,
        i32 => i64,
        i64 => i32,
        u32 => u64,
        u64 => u32,
        u32 => i64,
        i64 => u32,
        u64 => i64,
        i64 => u64,
    );

    registry.register(|v: &i64| Ok::<f64, Infallible>(*v as f64));
    registry.register(|v: &f64| Decimal::try_from(*v));
    registry.register(|v: &Decimal| v.to_f64().ok_or("decimal out of f64 range"));

    registry.register(|v: &Uuid| Ok::<u128, Infallible>(v.as_u128()));
    registry.register(|v: &u128| Ok::<Uuid, Infallible>(Uuid::from_u128(*v)));

    registry.register(|v: &DateTime<Utc>| Ok::<String, Infallible>(v.to_rfc3339()));
    registry.register(|s: &String| DateTime::parse_from_rfc3339(s).map(|dt| dt.with_timezone(&Utc)));
    registry.register(|v: &DateTime<Utc>| Ok::<i64, Infallible>(v.timestamp_millis()));
    registry.register(|millis: &i64| {
        Utc.timestamp_millis_opt(*millis)
            .single()
            .ok_or("timestamp out of range")
    });
}
