//! Fallback conversion service

mod converter_registry;
mod defaults;

pub use converter_registry::ConverterRegistry;
