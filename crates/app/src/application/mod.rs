//! Application layer - Mapping validation and the adapted repository
//!
//! This layer contains:
//! - Services: field name resolution, mapping validation, identifier and sort
//!   translation, the entity adapter and the adapter factory
//! - Errors: startup configuration faults and per-call adapter errors

pub mod error;
pub mod services;

#[cfg(test)]
mod e2e_tests;

pub use error::{AdapterError, ConfigurationError};
