//! SceneGraph collaborator trait.
//!
//! The core never owns scene objects. Hosts implement this trait and pass
//! it into every [`crate::Engine`] operation. Owners are addressed by
//! their unique name string (small string handles); a name that no longer
//! resolves is a stale reference, reported per call as a [`SkipReason`]
//! so callers can skip-and-continue.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use shaderkey_api_core::Value;

/// One curve on an owner's bound component.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurveInfo {
    /// Component-relative path of the animated parameter.
    pub path: String,
    /// Index within the path (element of a tuple parameter, 0 for scalars).
    pub index: u32,
    /// Number of keyed records on the curve; zero means not animated.
    pub keypoints: usize,
}

/// Where a keyframe commit lands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeySite<'a> {
    /// On the owner's bound component, at a component-relative path.
    Component { path: &'a str },
    /// On the owner object itself; `index` selects a tuple element when
    /// set, otherwise the path's natural scalar slot is keyed.
    Owner { path: &'a str, index: Option<u32> },
}

/// Why a per-entry resolution or commit was skipped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("owner no longer exists")]
    UnknownOwner,
    #[error("owner has no bound component")]
    MissingComponent,
    #[error("path did not resolve")]
    UnresolvedPath,
    #[error("target cannot accept a keyframe")]
    UnkeyableTarget,
}

/// Host-side scene access. Implemented by adapters (and by the in-memory
/// mock in shaderkey-test-fixtures).
pub trait SceneGraph {
    /// Owners of the explicitly selected components, in selection order.
    fn selected_component_owners(&self) -> Vec<String>;

    /// Owners bound through the slots of the currently selected objects,
    /// in encounter order. May contain duplicates; callers deduplicate.
    fn selection_slot_owners(&self) -> Vec<String>;

    /// Curves of the owner's bound component, in timeline order. `None`
    /// when the owner is gone, has no bound component, or no timeline.
    fn component_curves(&self, owner: &str) -> Option<Vec<CurveInfo>>;

    /// Resolve a component-relative path to its live value.
    fn component_value(&self, owner: &str, path: &str) -> Option<Value>;

    /// Resolve a path on the owner object itself.
    fn owner_value(&self, owner: &str, path: &str) -> Option<Value>;

    /// Write a value into a component socket's value slot.
    fn set_component_value(
        &mut self,
        owner: &str,
        path: &str,
        value: &Value,
    ) -> Result<(), SkipReason>;

    /// Commit a keyframe at `time`.
    fn insert_key(&mut self, owner: &str, site: KeySite<'_>, time: f32) -> Result<(), SkipReason>;

    /// Current position of the host's time cursor.
    fn time_cursor(&self) -> f32;
}
