//! Registry of the tool integrations xsteps ships with.

use std::collections::BTreeMap;

use crate::cmake;

/// Metadata for a known extension in the registry.
#[derive(Debug, Clone)]
pub struct ExtensionEntry {
    /// Extension name, also its directory name in the workspace.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Package reference installed when none is given.
    pub default_reference: String,
}

/// Registry of known extensions.
#[derive(Debug, Clone, Default)]
pub struct ExtensionRegistry {
    entries: BTreeMap<String, ExtensionEntry>,
}

impl ExtensionRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry populated with the built-in extensions.
    pub fn with_known() -> Self {
        let mut registry = Self::new();
        registry.register(ExtensionEntry {
            name: cmake::NAME.to_string(),
            description: "CMake build system, installed through Conan".to_string(),
            default_reference: cmake::DEFAULT_REFERENCE.to_string(),
        });
        registry
    }

    /// Register an extension entry, replacing any entry with the same name.
    pub fn register(&mut self, entry: ExtensionEntry) {
        self.entries.insert(entry.name.clone(), entry);
    }

    /// Look up an extension by name.
    pub fn get(&self, name: &str) -> Option<&ExtensionEntry> {
        self.entries.get(name)
    }

    /// All entries, sorted by name.
    pub fn entries(&self) -> Vec<&ExtensionEntry> {
        self.entries.values().collect()
    }

    /// Names of all known extensions, sorted.
    pub fn known_extensions(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_known_has_cmake() {
        let registry = ExtensionRegistry::with_known();
        let entry = registry.get("cmake").unwrap();
        assert_eq!(entry.default_reference, "cmake/3.22.0");
        assert!(!entry.description.is_empty());
    }

    #[test]
    fn test_known_extensions_sorted() {
        let mut registry = ExtensionRegistry::new();
        for name in ["ninja", "cmake", "meson"] {
            registry.register(ExtensionEntry {
                name: name.to_string(),
                description: String::new(),
                default_reference: format!("{name}/1.0"),
            });
        }
        assert_eq!(registry.known_extensions(), vec!["cmake", "meson", "ninja"]);
    }

    #[test]
    fn test_register_replaces_existing() {
        let mut registry = ExtensionRegistry::with_known();
        registry.register(ExtensionEntry {
            name: "cmake".to_string(),
            description: "Pinned".to_string(),
            default_reference: "cmake/3.27.0".to_string(),
        });

        assert_eq!(registry.len(), 1);
        assert!(registry.contains("cmake"));
        assert!(!registry.is_empty());
        assert_eq!(registry.get("cmake").unwrap().default_reference, "cmake/3.27.0");
    }
}
