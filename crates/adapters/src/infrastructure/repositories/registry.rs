//! Registry of named backing repositories.

use std::any::Any;
use std::sync::Arc;

use entity_bridge_domain::TypeKey;
use entity_bridge_ports::outbound::{
    BackingRepository, PagingAndSortingRepository, RegisteredRepository, RepositoryInformation,
    RepositoryLocator, TypedRepository,
};
use tracing::info;

/// One repository registration, optionally also serving alternative entity
/// types (e.g. projections of the managed entity)
#[derive(Debug, Clone)]
pub struct RepositoryRegistration {
    repository: RegisteredRepository,
    alternative_types: Vec<TypeKey>,
}

impl RepositoryRegistration {
    pub fn new(
        name: impl Into<String>,
        information: RepositoryInformation,
        repository: Arc<dyn BackingRepository>,
    ) -> Self {
        Self {
            repository: RegisteredRepository {
                name: name.into(),
                information,
                repository,
            },
            alternative_types: Vec::new(),
        }
    }

    /// Registration for a typed repository `R` of `T` keyed by `ID`
    pub fn typed<R, T, ID>(name: impl Into<String>, repository: Arc<R>) -> Self
    where
        R: PagingAndSortingRepository<T, ID> + 'static,
        T: Any + Send + Sync,
        ID: Any + Send + Sync,
    {
        Self::new(
            name,
            RepositoryInformation::of::<R, T, ID>(),
            Arc::new(TypedRepository::<R, T, ID>::new(repository)),
        )
    }

    /// Also offer this repository for lookups of `A`
    pub fn alternative_type<A: Any>(mut self) -> Self {
        self.alternative_types.push(TypeKey::of::<A>());
        self
    }

    pub fn name(&self) -> &str {
        &self.repository.name
    }

    fn serves(&self, entity_type: TypeKey) -> bool {
        self.repository.information.entity_type == entity_type
            || self.alternative_types.contains(&entity_type)
    }
}

/// Every registered repository, in registration order.
///
/// Populated during composition and shared read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct RepositoryRegistry {
    registrations: Vec<RepositoryRegistration>,
}

impl RepositoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, registration: RepositoryRegistration) -> &mut Self {
        info!(
            name = %registration.name(),
            entity_type = %registration.repository.information.entity_type,
            "Registered repository"
        );
        self.registrations.push(registration);
        self
    }

    /// Builder-style [`RepositoryRegistry::register`]
    pub fn with(mut self, registration: RepositoryRegistration) -> Self {
        self.register(registration);
        self
    }

    pub fn has_repository_for(&self, entity_type: TypeKey) -> bool {
        self.registrations.iter().any(|r| r.serves(entity_type))
    }

    pub fn repository_names_for(&self, entity_type: TypeKey) -> Vec<String> {
        self.registrations
            .iter()
            .filter(|r| r.serves(entity_type))
            .map(|r| r.repository.name.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }
}

impl RepositoryLocator for RepositoryRegistry {
    fn repositories_for(&self, entity_type: TypeKey) -> Vec<RegisteredRepository> {
        self.registrations
            .iter()
            .filter(|r| r.serves(entity_type))
            .map(|r| r.repository.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use entity_bridge_ports::MockBackingRepository;

    struct Invoice;
    struct InvoiceSummary;
    struct LiveRepository;
    struct ArchiveRepository;

    fn registration<R: Any>(name: &str) -> RepositoryRegistration {
        RepositoryRegistration::new(
            name,
            RepositoryInformation::of::<R, Invoice, u64>(),
            Arc::new(MockBackingRepository::new()),
        )
    }

    #[test]
    fn lookups_keep_registration_order() {
        let registry = RepositoryRegistry::new()
            .with(registration::<LiveRepository>("live"))
            .with(registration::<ArchiveRepository>("archive"));

        let found = registry.repositories_for(TypeKey::of::<Invoice>());
        let names: Vec<_> = found.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["live", "archive"]);
        assert_eq!(
            found[1].information.repository_type,
            TypeKey::of::<ArchiveRepository>()
        );
    }

    #[test]
    fn alternative_types_resolve_to_the_same_repository() {
        let registry = RepositoryRegistry::new().with(
            registration::<LiveRepository>("live").alternative_type::<InvoiceSummary>(),
        );

        assert!(registry.has_repository_for(TypeKey::of::<InvoiceSummary>()));
        assert_eq!(
            registry.repository_names_for(TypeKey::of::<InvoiceSummary>()),
            vec!["live".to_string()]
        );
    }

    #[test]
    fn unknown_types_have_no_repositories() {
        let registry = RepositoryRegistry::new().with(registration::<LiveRepository>("live"));
        assert!(registry.repositories_for(TypeKey::of::<u8>()).is_empty());
    }
}
