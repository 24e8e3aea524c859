//! Facade field name to backing field name correspondence.

use std::collections::HashMap;

/// Resolved mapping from facade property names to backing property names.
///
/// Built once per adapted entity and read-only afterwards. Insertion never
/// overwrites: the first pair recorded for a facade field wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldCorrespondence {
    fields: HashMap<String, String>,
}

impl FieldCorrespondence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `facade -> backing` unless either name is empty or the facade
    /// field already has an entry. Returns whether the pair was added.
    pub fn insert_if_absent(&mut self, facade: &str, backing: &str) -> bool {
        if facade.is_empty() || backing.is_empty() || self.fields.contains_key(facade) {
            return false;
        }
        self.fields.insert(facade.to_string(), backing.to_string());
        true
    }

    pub fn get(&self, facade: &str) -> Option<&str> {
        self.fields.get(facade).map(String::as_str)
    }

    /// Backing name for `facade`, or `facade` itself when unmapped
    pub fn translate<'a>(&'a self, facade: &'a str) -> &'a str {
        self.get(facade).unwrap_or(facade)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Backing name to facade name. When two facade fields share a backing
    /// field the lexicographically smallest facade name is kept.
    pub fn inverse(&self) -> HashMap<String, String> {
        let mut inverse: HashMap<String, String> = HashMap::with_capacity(self.fields.len());
        for (facade, backing) in &self.fields {
            match inverse.get(backing) {
                Some(existing) if existing <= facade => {}
                _ => {
                    inverse.insert(backing.clone(), facade.clone());
                }
            }
        }
        inverse
    }
}

impl FromIterator<(String, String)> for FieldCorrespondence {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        let mut correspondence = Self::new();
        for (facade, backing) in iter {
            correspondence.insert_if_absent(&facade, &backing);
        }
        correspondence
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_insertion_wins() {
        let mut fields = FieldCorrespondence::new();
        assert!(fields.insert_if_absent("total", "amount"));
        assert!(!fields.insert_if_absent("total", "gross"));
        assert_eq!(fields.get("total"), Some("amount"));
    }

    #[test]
    fn empty_names_are_ignored() {
        let mut fields = FieldCorrespondence::new();
        assert!(!fields.insert_if_absent("", "amount"));
        assert!(!fields.insert_if_absent("total", ""));
        assert!(fields.is_empty());
    }

    #[test]
    fn translate_passes_unknown_names_through() {
        let fields: FieldCorrespondence = [("total".to_string(), "amount".to_string())]
            .into_iter()
            .collect();
        assert_eq!(fields.translate("total"), "amount");
        assert_eq!(fields.translate("id"), "id");
    }

    #[test]
    fn inverse_maps_backing_to_facade() {
        let fields: FieldCorrespondence = [("total".to_string(), "amount".to_string())]
            .into_iter()
            .collect();
        assert_eq!(fields.inverse().get("amount").map(String::as_str), Some("total"));
    }
}
