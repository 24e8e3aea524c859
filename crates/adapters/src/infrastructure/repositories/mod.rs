//! Repository registry - backing repositories by managed entity type

mod registry;

pub use registry::{RepositoryRegistration, RepositoryRegistry};
