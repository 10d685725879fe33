//! Immutable configuration snapshots.
//!
//! # Design Decisions
//! - A snapshot is built once by the parser and never mutated afterwards
//! - Readers share snapshots through `Arc`; a reload publishes a new one
//! - Lookups return `Option`, absence is not an error

use std::collections::HashMap;

/// A named group of key/value pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    name: String,
    entries: HashMap<String, String>,
}

impl Section {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: HashMap::new(),
        }
    }

    /// Last write wins for duplicate keys.
    pub(crate) fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Keys are matched case-sensitively, exactly as written in the file.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Which layer of the override chain supplied a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueSource {
    /// The scope-specific section, e.g. `[Aircraft.C172]`.
    Scope,
    /// The shared default section.
    Default,
}

/// A value found by a layered lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub value: String,
    pub source: ValueSource,
}

/// One fully-parsed view of the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigSnapshot {
    sections: HashMap<String, Section>,
}

impl ConfigSnapshot {
    /// An empty snapshot, as held by a store before its first load.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns false if a section with this name already exists.
    pub(crate) fn insert_section(&mut self, section: Section) -> bool {
        if self.sections.contains_key(section.name()) {
            return false;
        }
        self.sections.insert(section.name.clone(), section);
        true
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.get(name)
    }

    pub(crate) fn section_mut(&mut self, name: &str) -> Option<&mut Section> {
        self.sections.get_mut(name)
    }

    /// Section names in sorted order.
    pub fn section_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.sections.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Look `key` up in `scope_section`, falling back to `default_section`.
    pub fn resolve(&self, scope_section: &str, default_section: &str, key: &str) -> Option<Resolved> {
        let layers = [
            (scope_section, ValueSource::Scope),
            (default_section, ValueSource::Default),
        ];

        layers.iter().find_map(|(name, source)| {
            self.section(name)
                .and_then(|section| section.get(key))
                .map(|value| Resolved {
                    value: value.to_string(),
                    source: *source,
                })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> ConfigSnapshot {
        let mut default = Section::new("Default");
        default.insert("EngineFireColor", "Red");
        default.insert("Brightness", "80");

        let mut c172 = Section::new("Aircraft.C172");
        c172.insert("EngineFireColor", "Orange");

        let mut snapshot = ConfigSnapshot::empty();
        assert!(snapshot.insert_section(default));
        assert!(snapshot.insert_section(c172));
        snapshot
    }

    #[test]
    fn test_scope_wins_over_default() {
        let resolved = snapshot()
            .resolve("Aircraft.C172", "Default", "EngineFireColor")
            .unwrap();
        assert_eq!(resolved.value, "Orange");
        assert_eq!(resolved.source, ValueSource::Scope);
    }

    #[test]
    fn test_falls_back_to_default() {
        let snapshot = snapshot();

        let resolved = snapshot.resolve("Aircraft.C172", "Default", "Brightness").unwrap();
        assert_eq!(resolved.value, "80");
        assert_eq!(resolved.source, ValueSource::Default);

        // Unknown scope section behaves like an empty one.
        let resolved = snapshot.resolve("Aircraft.PA28", "Default", "EngineFireColor").unwrap();
        assert_eq!(resolved.value, "Red");
    }

    #[test]
    fn test_not_found() {
        assert!(snapshot().resolve("Aircraft.PA28", "Default", "Unknown").is_none());
        assert!(ConfigSnapshot::empty().resolve("Aircraft.C172", "Default", "EngineFireColor").is_none());
    }

    #[test]
    fn test_keys_are_case_sensitive() {
        assert!(snapshot().resolve("Aircraft.C172", "Default", "enginefirecolor").is_none());
    }

    #[test]
    fn test_duplicate_section_rejected() {
        let mut snapshot = snapshot();
        assert!(!snapshot.insert_section(Section::new("Default")));
        assert_eq!(snapshot.section("Default").unwrap().len(), 2);
    }

    #[test]
    fn test_section_names_sorted() {
        assert_eq!(snapshot().section_names(), vec!["Aircraft.C172", "Default"]);
    }
}
