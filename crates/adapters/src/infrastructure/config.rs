//! Adapter configuration

use std::env;

use anyhow::{Context, Result};
use entity_bridge_domain::EscapeCharacter;

/// Defaults applied to every adapted entity, loaded from environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterConfig {
    /// Escape character for pattern (LIKE) filters
    pub escape_character: EscapeCharacter,
    /// Mapping context id for descriptors that do not set one
    pub map_id: Option<String>,
    /// Allow the conversion service for entity bodies by default
    pub convert_body: bool,
    /// Allow the conversion service for identifiers by default
    pub convert_id: bool,
    /// Whether adapters get a conversion service at all
    pub use_conversion_service: bool,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            escape_character: EscapeCharacter::DEFAULT,
            map_id: None,
            convert_body: false,
            convert_id: true,
            use_conversion_service: true,
        }
    }
}

impl AdapterConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        let flag = |key: &str, default: bool| -> Result<bool> {
            match lookup(key) {
                Some(value) => value
                    .trim()
                    .parse::<bool>()
                    .with_context(|| format!("{key} must be true or false, got '{value}'")),
                None => Ok(default),
            }
        };

        Ok(Self {
            escape_character: match lookup("ENTITY_BRIDGE_ESCAPE_CHARACTER") {
                Some(value) => value
                    .parse::<EscapeCharacter>()
                    .context("ENTITY_BRIDGE_ESCAPE_CHARACTER must be a single character")?,
                None => defaults.escape_character,
            },
            map_id: lookup("ENTITY_BRIDGE_MAP_ID")
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            convert_body: flag("ENTITY_BRIDGE_CONVERT_BODY", defaults.convert_body)?,
            convert_id: flag("ENTITY_BRIDGE_CONVERT_ID", defaults.convert_id)?,
            use_conversion_service: flag(
                "ENTITY_BRIDGE_CONVERSION_SERVICE",
                defaults.use_conversion_service,
            )?,
        })
    }
}
