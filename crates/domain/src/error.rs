//! Unified error types for the domain layer
//!
//! Provides the error enums shared by every layer, so adapters and services
//! can report translation faults without forcing String or anyhow on callers.

use thiserror::Error;

use crate::type_key::TypeKey;

/// Error type for domain value construction
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Validation failed (e.g., invalid field values)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Parse error (for value objects)
    #[error("Parse error: {0}")]
    Parse(String),
}

impl DomainError {
    /// Creates a validation error for rejected input.
    ///
    /// # Example
    /// ```ignore
    /// if size == 0 {
    ///     return Err(DomainError::validation("Page size must not be less than one"));
    /// }
    /// ```
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}

/// A fallback converter could not produce the requested value
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConversionError {
    #[error("No converter found capable of converting from {src} to {dest}")]
    ConverterNotFound { src: TypeKey, dest: TypeKey },

    #[error("Failed to convert from {src} to {dest}: {reason}")]
    Failed {
        src: TypeKey,
        dest: TypeKey,
        reason: String,
    },
}

impl ConversionError {
    pub fn not_found(src: TypeKey, dest: TypeKey) -> Self {
        Self::ConverterNotFound { src, dest }
    }

    pub fn failed(src: TypeKey, dest: TypeKey, reason: impl Into<String>) -> Self {
        Self::Failed {
            src,
            dest,
            reason: reason.into(),
        }
    }
}

/// The copier (or a fallback converter) failed to produce a target value.
///
/// This is the per-call "translation fault"; the adaptation layer decides
/// whether it means "absent" or "invalid argument" for the operation at hand.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MappingError {
    #[error("No mapping definition found for: {src} -> {dest}.")]
    NoMapping { src: TypeKey, dest: TypeKey },

    #[error("Value is not an instance of {expected}")]
    TypeMismatch { expected: TypeKey },

    #[error("Entity {entity} has no identifier")]
    MissingIdentifier { entity: TypeKey },

    #[error("Entity {entity} has no identifier setter")]
    MissingIdentifierSetter { entity: TypeKey },

    #[error("Mapping {src} -> {dest} failed: {reason}")]
    Failed {
        src: TypeKey,
        dest: TypeKey,
        reason: String,
    },

    #[error(transparent)]
    Conversion(#[from] ConversionError),
}

impl MappingError {
    pub fn no_mapping(src: TypeKey, dest: TypeKey) -> Self {
        Self::NoMapping { src, dest }
    }

    pub fn type_mismatch(expected: TypeKey) -> Self {
        Self::TypeMismatch { expected }
    }

    pub fn failed(src: TypeKey, dest: TypeKey, reason: impl Into<String>) -> Self {
        Self::Failed {
            src,
            dest,
            reason: reason.into(),
        }
    }
}
