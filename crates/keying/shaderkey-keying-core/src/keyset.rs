//! Named key-sets: the derived index of animatable parameter paths.

use serde::{Deserialize, Serialize};

use shaderkey_api_core::ParamPath;

/// One addressable animatable parameter within a key-set.
///
/// Invariant: within one set, no two entries share the same
/// `(owner, full path, index)` triple; discovery deduplicates on it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KeyEntry {
    pub owner: String,
    pub path: ParamPath,
    pub index: u32,
}

/// A named, ordered collection of key entries.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KeySet {
    pub name: String,
    pub entries: Vec<KeyEntry>,
}

impl KeySet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Ordered, scene-scoped collection of named key-sets plus the name of
/// the active one. Names are unique; rebuilding an existing name clears
/// it in place rather than appending a duplicate.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct KeySetRegistry {
    sets: Vec<KeySet>,
    active: Option<String>,
}

impl KeySetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&KeySet> {
        self.sets.iter().find(|s| s.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut KeySet> {
        self.sets.iter_mut().find(|s| s.name == name)
    }

    /// Clear an existing set in place, or append a fresh empty one.
    /// Either way the set becomes the active set.
    pub fn clear_or_create(&mut self, name: &str) -> &mut KeySet {
        self.active = Some(name.to_string());
        match self.sets.iter().position(|s| s.name == name) {
            Some(idx) => {
                self.sets[idx].entries.clear();
                &mut self.sets[idx]
            }
            None => {
                self.sets.push(KeySet::new(name));
                self.sets.last_mut().unwrap()
            }
        }
    }

    /// Remove a set by name. Clears the active marker if it pointed there.
    pub fn remove(&mut self, name: &str) -> Option<KeySet> {
        let idx = self.sets.iter().position(|s| s.name == name)?;
        if self.active.as_deref() == Some(name) {
            self.active = None;
        }
        Some(self.sets.remove(idx))
    }

    pub fn active_name(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn active(&self) -> Option<&KeySet> {
        self.active.as_deref().and_then(|name| self.get(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = &KeySet> {
        self.sets.iter()
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}
