//! Runtime property lookup used for sorting by name.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use uuid::Uuid;

/// A sortable property value read by name
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Decimal(Decimal),
    Text(String),
    Uuid(Uuid),
    Timestamp(DateTime<Utc>),
}

impl PropertyValue {
    fn rank(&self) -> u8 {
        match self {
            Self::Null => 0,
            Self::Bool(_) => 1,
            Self::Int(_) | Self::Float(_) | Self::Decimal(_) => 2,
            Self::Text(_) => 3,
            Self::Uuid(_) => 4,
            Self::Timestamp(_) => 5,
        }
    }

    fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            Self::Decimal(v) => v.to_f64(),
            _ => None,
        }
    }

    /// Total order used by the store: nulls first, numbers compared by value
    /// across representations, text optionally case-insensitive
    pub fn compare(&self, other: &Self, ignore_case: bool) -> Ordering {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a.cmp(b),
            (Self::Int(a), Self::Int(b)) => a.cmp(b),
            (Self::Decimal(a), Self::Decimal(b)) => a.cmp(b),
            (Self::Text(a), Self::Text(b)) if ignore_case => a.to_lowercase().cmp(&b.to_lowercase()),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            (Self::Uuid(a), Self::Uuid(b)) => a.cmp(b),
            (Self::Timestamp(a), Self::Timestamp(b)) => a.cmp(b),
            (a, b) if a.rank() == b.rank() && a.rank() == 2 => match (a.as_f64(), b.as_f64()) {
                (Some(x), Some(y)) => x.total_cmp(&y),
                _ => Ordering::Equal,
            },
            (a, b) => a.rank().cmp(&b.rank()),
        }
    }
}

macro_rules! impl_from {
    ($($ty:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$ty> for PropertyValue {
                fn from(value: $ty) -> Self {
                    Self::$variant(value.into())
                }
            }
        )+
    };
}

impl_from!(
    bool => Bool,
    i32 => Int,
    i64 => Int,
    u32 => Int,
    f32 => Float,
    f64 => Float,
    Decimal => Decimal,
    String => Text,
    &str => Text,
    Uuid => Uuid,
    DateTime<Utc> => Timestamp,
);

impl<T: Into<PropertyValue>> From<Option<T>> for PropertyValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Read access to an entity's properties by their runtime name.
///
/// Returning `None` means the entity has no such property, which the store
/// reports as an error; an absent value is [`PropertyValue::Null`].
pub trait PropertyAccess {
    fn property(&self, name: &str) -> Option<PropertyValue>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn nulls_sort_first() {
        let null = PropertyValue::Null;
        let one = PropertyValue::from(1_i64);
        assert_eq!(null.compare(&one, false), Ordering::Less);
        assert_eq!(PropertyValue::from(None::<i64>), PropertyValue::Null);
    }

    #[test]
    fn numbers_compare_across_representations() {
        let int = PropertyValue::from(2_i64);
        let float = PropertyValue::from(2.5_f64);
        let decimal = PropertyValue::from(dec!(1.5));
        assert_eq!(int.compare(&float, false), Ordering::Less);
        assert_eq!(decimal.compare(&int, false), Ordering::Less);
    }

    #[test]
    fn text_can_ignore_case() {
        let a = PropertyValue::from("apple");
        let b = PropertyValue::from("Banana");
        assert_eq!(a.compare(&b, false), Ordering::Greater);
        assert_eq!(a.compare(&b, true), Ordering::Less);
    }
}
