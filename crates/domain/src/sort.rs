//! Sort orders expressed in entity property names.

use serde::{Deserialize, Serialize};

/// Sort direction for a single property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    pub fn is_ascending(&self) -> bool {
        matches!(self, Self::Asc)
    }
}

/// Ordering on a single property
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Order {
    property: String,
    direction: Direction,
    #[serde(default)]
    ignore_case: bool,
}

impl Order {
    pub fn new(direction: Direction, property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            direction,
            ignore_case: false,
        }
    }

    pub fn asc(property: impl Into<String>) -> Self {
        Self::new(Direction::Asc, property)
    }

    pub fn desc(property: impl Into<String>) -> Self {
        Self::new(Direction::Desc, property)
    }

    pub fn property(&self) -> &str {
        &self.property
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn is_ignore_case(&self) -> bool {
        self.ignore_case
    }

    pub fn ignore_case(mut self) -> Self {
        self.ignore_case = true;
        self
    }

    /// Same direction and case handling on a different property
    pub fn with_property(&self, property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            direction: self.direction,
            ignore_case: self.ignore_case,
        }
    }
}

/// An ordered list of property orderings; empty means unsorted
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Sort {
    orders: Vec<Order>,
}

impl Sort {
    pub fn unsorted() -> Self {
        Self::default()
    }

    pub fn by(orders: impl IntoIterator<Item = Order>) -> Self {
        Self {
            orders: orders.into_iter().collect(),
        }
    }

    /// Ascending sort on the given properties
    pub fn by_properties<I, S>(properties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::by(properties.into_iter().map(Order::asc))
    }

    pub fn is_sorted(&self) -> bool {
        !self.orders.is_empty()
    }

    pub fn is_unsorted(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Order> {
        self.orders.iter()
    }

    pub fn order_for(&self, property: &str) -> Option<&Order> {
        self.orders.iter().find(|order| order.property == property)
    }

    /// Appends the orders of `other` after this sort's orders
    pub fn and(mut self, other: Sort) -> Self {
        self.orders.extend(other.orders);
        self
    }
}

impl<'a> IntoIterator for &'a Sort {
    type Item = &'a Order;
    type IntoIter = std::slice::Iter<'a, Order>;

    fn into_iter(self) -> Self::IntoIter {
        self.orders.iter()
    }
}
