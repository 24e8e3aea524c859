//! Class mapping registry - the in-process object mapper

mod class_mapping;
mod registry;

pub use class_mapping::ClassMapping;
pub use registry::{ClassMappingRegistry, ClassMappingRegistryBuilder};
