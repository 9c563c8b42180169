//! Engine: scene-scoped key-set registry and preset store, plus the
//! operations that mutate them against an injected [`SceneGraph`].
//!
//! Operations run to completion before returning; the time cursor is read
//! once per operation so every keyframe of a pass lands on the same
//! timestamp. Per-entry failures (stale owners, unkeyable targets) are
//! skipped and logged, never fatal to the pass.

use hashbrown::HashSet;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use shaderkey_api_core::{
    decode_records, encode_records, CodecError, ParamPath, PathKind, PresetRecord,
};

use crate::keyset::{KeyEntry, KeySet, KeySetRegistry};
use crate::scene::{KeySite, SceneGraph, SkipReason};
use crate::store::{Preset, PresetStore};

/// Failure categories for preset capture. Nothing is stored on failure.
#[derive(Debug, Error)]
pub enum PresetError {
    #[error("no key-set named '{0}'")]
    NoSuchSet(String),
    #[error("preset name must not be empty")]
    MissingName,
    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// Failure categories for preset restore. Nothing is committed on failure.
#[derive(Debug, Error)]
pub enum RestoreError {
    #[error("preset index {index} out of range (store holds {len})")]
    OutOfRange { index: i32, len: usize },
    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// Outcome of a preset restore: keyframes that landed and records that
/// were skipped, with the reason for each skip.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RestoreSummary {
    pub committed: usize,
    pub skipped: Vec<SkippedRecord>,
}

/// One record a restore pass could not apply.
#[derive(Clone, Debug, PartialEq)]
pub struct SkippedRecord {
    pub owner: String,
    pub path: String,
    pub reason: SkipReason,
}

/// Scene-scoped keying state. Owns the key-set registry and the preset
/// store; everything else is reached through the [`SceneGraph`] passed
/// into each operation. Serializable so hosts can persist it with the
/// scene.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Engine {
    sets: KeySetRegistry,
    store: PresetStore,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sets(&self) -> &KeySetRegistry {
        &self.sets
    }

    pub fn sets_mut(&mut self) -> &mut KeySetRegistry {
        &mut self.sets
    }

    pub fn store(&self) -> &PresetStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut PresetStore {
        &mut self.store
    }

    /// Rebuild the key-set `target` from the animated curves of the
    /// candidate owners, and mark it active.
    ///
    /// Candidates are `explicit` when non-empty, else the host's selected
    /// component owners, else the owners bound through the slots of the
    /// selected objects; deduplicated by name, first occurrence wins.
    /// Entries are deduplicated on `(owner, path, index)`.
    ///
    /// Returns the number of entries added. Zero is a valid, unproductive
    /// result, not an error. Callers validate that `target` is non-empty.
    pub fn extract(
        &mut self,
        host: &impl SceneGraph,
        target: &str,
        explicit: Option<&[String]>,
    ) -> usize {
        let candidates = candidate_owners(host, explicit);
        let set = self.sets.clear_or_create(target);

        let mut seen: HashSet<(String, String, u32)> = HashSet::new();
        let mut added = 0;
        for owner in candidates {
            let Some(curves) = host.component_curves(&owner) else {
                debug!("extract: skipping '{owner}' (no bound component or timeline)");
                continue;
            };
            for curve in curves {
                if curve.keypoints == 0 {
                    continue;
                }
                let path = ParamPath::indirect(&curve.path);
                let key = (owner.clone(), path.full().to_string(), curve.index);
                if !seen.insert(key) {
                    continue;
                }
                set.entries.push(KeyEntry {
                    owner: owner.clone(),
                    path,
                    index: curve.index,
                });
                added += 1;
            }
        }
        debug!("extract: key-set '{target}' rebuilt with {added} entries");
        added
    }

    /// Replay the named key-set: commit one keyframe per entry at the
    /// time cursor captured at call start.
    ///
    /// An unknown name returns 0 ("nothing to apply"). Entries whose
    /// owner is stale or whose target refuses the keyframe are skipped.
    /// Returns the number of keyframes committed.
    pub fn apply(&self, host: &mut impl SceneGraph, set_name: &str) -> usize {
        let Some(set) = self.sets.get(set_name) else {
            return 0;
        };
        let time = host.time_cursor();
        let mut committed = 0;
        for entry in &set.entries {
            let site = match entry.path.kind() {
                PathKind::Indirect { stripped } => KeySite::Component { path: stripped },
                PathKind::Direct => KeySite::Owner {
                    path: entry.path.full(),
                    index: (entry.index > 0).then_some(entry.index),
                },
            };
            match host.insert_key(&entry.owner, site, time) {
                Ok(()) => committed += 1,
                Err(reason) => {
                    warn!(
                        "apply: skipped {}:{} ({reason})",
                        entry.owner,
                        entry.path.full()
                    );
                }
            }
        }
        committed
    }

    /// Snapshot the current values of the chosen key-set into a new named
    /// preset and move the store cursor to it.
    pub fn save_current_preset(
        &mut self,
        host: &impl SceneGraph,
        chosen_set: &str,
        preset_name: &str,
    ) -> Result<&Preset, PresetError> {
        let set = self
            .sets
            .get(chosen_set)
            .ok_or_else(|| PresetError::NoSuchSet(chosen_set.to_string()))?;
        if preset_name.is_empty() {
            return Err(PresetError::MissingName);
        }
        let records = collect_records(host, set);
        let blob = encode_records(&records)?;
        Ok(self.store.push(Preset {
            name: preset_name.to_string(),
            blob,
        }))
    }

    /// Remove the preset at `index`, re-clamping the store cursor.
    /// Out-of-range indices are a no-op.
    pub fn remove_preset(&mut self, index: i32) {
        self.store.remove(index);
    }

    /// Restore the preset at `index`: decode its records and write each
    /// one back onto its live target, committing keyframes at the time
    /// cursor captured at call start.
    ///
    /// Per-record failures are aggregated into the summary, not fatal;
    /// `Ok` means the lookup and decode succeeded regardless of skips.
    pub fn apply_preset(
        &self,
        host: &mut impl SceneGraph,
        index: i32,
    ) -> Result<RestoreSummary, RestoreError> {
        let preset = self.store.get(index).ok_or(RestoreError::OutOfRange {
            index,
            len: self.store.len(),
        })?;
        let records = decode_records(&preset.blob)?;
        let time = host.time_cursor();

        let mut summary = RestoreSummary::default();
        for record in records {
            match restore_record(host, &record, time) {
                Ok(()) => summary.committed += 1,
                Err(reason) => {
                    warn!(
                        "restore: skipped {}:{} ({reason})",
                        record.owner,
                        record.path.full()
                    );
                    summary.skipped.push(SkippedRecord {
                        owner: record.owner,
                        path: record.path.full().to_string(),
                        reason,
                    });
                }
            }
        }
        Ok(summary)
    }

    /// Capture one preset per key-set in the registry (active or not,
    /// empty or not), named `<set-name>_preset`. The store cursor ends on
    /// the last appended preset. Returns the number of presets created.
    pub fn batch_collect(&mut self, host: &impl SceneGraph) -> usize {
        let mut created = 0;
        for set in self.sets.iter() {
            let records = collect_records(host, set);
            let blob = match encode_records(&records) {
                Ok(blob) => blob,
                Err(err) => {
                    warn!("batch: key-set '{}' failed to encode, skipping ({err})", set.name);
                    continue;
                }
            };
            self.store.push(Preset {
                name: format!("{}_preset", set.name),
                blob,
            });
            created += 1;
        }
        debug!("batch: collected {created} presets");
        created
    }
}

/// Resolve and dedup the candidate owner list for discovery.
fn candidate_owners(host: &impl SceneGraph, explicit: Option<&[String]>) -> Vec<String> {
    let raw = match explicit {
        Some(list) if !list.is_empty() => list.to_vec(),
        _ => {
            let selected = host.selected_component_owners();
            if selected.is_empty() {
                host.selection_slot_owners()
            } else {
                selected
            }
        }
    };
    let mut seen: HashSet<String> = HashSet::new();
    raw.into_iter().filter(|name| seen.insert(name.clone())).collect()
}

/// Resolve the live value of every entry in `set`, in order. Entries that
/// do not resolve are skipped with a warning.
fn collect_records(host: &impl SceneGraph, set: &KeySet) -> Vec<PresetRecord> {
    let mut records = Vec::with_capacity(set.entries.len());
    for entry in &set.entries {
        let value = match entry.path.kind() {
            PathKind::Indirect { stripped } => host.component_value(&entry.owner, stripped),
            PathKind::Direct => host.owner_value(&entry.owner, entry.path.full()),
        };
        match value {
            Some(value) => records.push(PresetRecord {
                owner: entry.owner.clone(),
                path: entry.path.clone(),
                value,
            }),
            None => {
                warn!(
                    "capture: {}:{} did not resolve, skipping",
                    entry.owner,
                    entry.path.full()
                );
            }
        }
    }
    records
}

/// Write one preset record back onto its live target.
///
/// Indirect paths addressing a socket's value slot get the captured value
/// written back before the keyframe lands there. Every other path is a
/// best-effort keyframe commit of the full path on the owner.
fn restore_record(
    host: &mut impl SceneGraph,
    record: &PresetRecord,
    time: f32,
) -> Result<(), SkipReason> {
    match record.path.kind() {
        PathKind::Indirect { stripped } if record.path.socket_base().is_some() => {
            host.set_component_value(&record.owner, stripped, &record.value)?;
            host.insert_key(&record.owner, KeySite::Component { path: stripped }, time)
        }
        _ => host.insert_key(
            &record.owner,
            KeySite::Owner {
                path: record.path.full(),
                index: None,
            },
            time,
        ),
    }
}
