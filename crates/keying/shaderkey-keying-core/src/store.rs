//! Preset store: ordered snapshots plus the active-selection cursor.

use serde::{Deserialize, Serialize};

/// A named snapshot of resolved values, independent of the key-set that
/// produced it. `blob` is the encoded record list
/// (see `shaderkey_api_core::preset_records`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    pub name: String,
    pub blob: String,
}

/// Ordered collection of presets with a single active-index cursor.
/// Entries are appended or removed, never mutated in place. The cursor
/// is `-1` exactly when the store is empty.
#[derive(Debug, Serialize, Deserialize)]
pub struct PresetStore {
    presets: Vec<Preset>,
    active: i32,
}

impl Default for PresetStore {
    fn default() -> Self {
        Self {
            presets: Vec::new(),
            active: -1,
        }
    }
}

impl PresetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a preset and move the cursor to it.
    pub fn push(&mut self, preset: Preset) -> &Preset {
        self.presets.push(preset);
        self.active = self.presets.len() as i32 - 1;
        self.presets.last().unwrap()
    }

    /// Remove the preset at `index`, re-clamping the cursor to
    /// `min(index, len - 1)` (`-1` once the store is empty).
    /// Out-of-range indices are a no-op.
    pub fn remove(&mut self, index: i32) {
        if index < 0 || index as usize >= self.presets.len() {
            return;
        }
        self.presets.remove(index as usize);
        self.active = index.min(self.presets.len() as i32 - 1);
    }

    pub fn get(&self, index: i32) -> Option<&Preset> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.presets.get(i))
    }

    pub fn active_index(&self) -> i32 {
        self.active
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Preset> {
        self.presets.iter()
    }
}
