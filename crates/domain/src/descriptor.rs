//! Static description of one adapted (facade) entity type.

use std::any::Any;
use std::fmt;

use crate::type_key::TypeKey;

/// Mapping context id scoping alternate mappings between the same two types.
///
/// An empty id is the same as no id, so construction returns `None` for it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MapId(String);

impl MapId {
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        if id.is_empty() {
            None
        } else {
            Some(Self(id))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MapId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Picks one backing repository when several manage the backing type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepositorySelector {
    /// Match on the registration name
    Name(String),
    /// Match on the concrete repository type
    Type(TypeKey),
}

impl RepositorySelector {
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    pub fn repository_type<R: Any>() -> Self {
        Self::Type(TypeKey::of::<R>())
    }

    pub fn matches(&self, name: &str, repository_type: TypeKey) -> bool {
        match self {
            Self::Name(expected) => expected == name,
            Self::Type(expected) => *expected == repository_type,
        }
    }
}

impl fmt::Display for RepositorySelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => write!(f, "name '{}'", name),
            Self::Type(ty) => write!(f, "type {}", ty),
        }
    }
}

/// Describes how a facade type is adapted onto a backing type.
///
/// Immutable once built; read by every component of the adaptation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityDescriptor {
    facade_type: TypeKey,
    backing_type: TypeKey,
    map_id: Option<MapId>,
    convert_body: bool,
    convert_id: bool,
    repository_selector: Option<RepositorySelector>,
}

impl EntityDescriptor {
    /// Start describing facade `F` persisted through backing type `B`
    pub fn builder<F: Any, B: Any>() -> EntityDescriptorBuilder {
        EntityDescriptorBuilder::new(TypeKey::of::<F>(), TypeKey::of::<B>())
    }

    pub fn facade_type(&self) -> TypeKey {
        self.facade_type
    }

    pub fn backing_type(&self) -> TypeKey {
        self.backing_type
    }

    pub fn map_id(&self) -> Option<&str> {
        self.map_id.as_ref().map(MapId::as_str)
    }

    /// Fall back to the conversion service for entity bodies
    pub fn convert_body(&self) -> bool {
        self.convert_body
    }

    /// Fall back to the conversion service for identifiers
    pub fn convert_id(&self) -> bool {
        self.convert_id
    }

    pub fn repository_selector(&self) -> Option<&RepositorySelector> {
        self.repository_selector.as_ref()
    }
}

/// Builder for [`EntityDescriptor`].
///
/// Unset options can be filled from configuration defaults with
/// [`EntityDescriptorBuilder::or_defaults`]; anything still unset falls back
/// to no map id, no body conversion, and id conversion enabled.
#[derive(Debug, Clone)]
pub struct EntityDescriptorBuilder {
    facade_type: TypeKey,
    backing_type: TypeKey,
    map_id: Option<Option<MapId>>,
    convert_body: Option<bool>,
    convert_id: Option<bool>,
    repository_selector: Option<RepositorySelector>,
}

impl EntityDescriptorBuilder {
    pub fn new(facade_type: TypeKey, backing_type: TypeKey) -> Self {
        Self {
            facade_type,
            backing_type,
            map_id: None,
            convert_body: None,
            convert_id: None,
            repository_selector: None,
        }
    }

    pub fn map_id(mut self, map_id: impl Into<String>) -> Self {
        self.map_id = Some(MapId::new(map_id));
        self
    }

    pub fn convert_body(mut self, enabled: bool) -> Self {
        self.convert_body = Some(enabled);
        self
    }

    pub fn convert_id(mut self, enabled: bool) -> Self {
        self.convert_id = Some(enabled);
        self
    }

    pub fn repository_selector(mut self, selector: RepositorySelector) -> Self {
        self.repository_selector = Some(selector);
        self
    }

    /// Fill options that were not set explicitly
    pub fn or_defaults(mut self, map_id: Option<&str>, convert_body: bool, convert_id: bool) -> Self {
        if self.map_id.is_none() {
            self.map_id = Some(map_id.and_then(MapId::new));
        }
        self.convert_body.get_or_insert(convert_body);
        self.convert_id.get_or_insert(convert_id);
        self
    }

    pub fn build(self) -> EntityDescriptor {
        EntityDescriptor {
            facade_type: self.facade_type,
            backing_type: self.backing_type,
            map_id: self.map_id.flatten(),
            convert_body: self.convert_body.unwrap_or(false),
            convert_id: self.convert_id.unwrap_or(true),
            repository_selector: self.repository_selector,
        }
    }
}
