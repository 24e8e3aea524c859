//! End-to-end tests of the adaptation layer.
//!
//! These tests exercise a complete wiring with no mocks:
//! - Order facade (`i64` ids, `Decimal` totals) over an `OrderEntity`
//!   backing store (`Uuid` ids, `f64` amounts)
//! - Class mapping registry with a `total -> amount` field mapping
//! - Default converters plus an `i64 <-> Uuid` fallback for identifiers
//! - In-memory paging and sorting store with generated ids and versions
//!
//! # Running
//!
//! ```bash
//! cargo test -p entity-bridge-app --lib e2e_tests
//! ```

mod e2e_helpers;
mod wiring_tests;

pub use e2e_helpers::*;
