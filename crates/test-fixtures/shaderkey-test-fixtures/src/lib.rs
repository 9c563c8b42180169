//! In-memory [`SceneGraph`] used by the shaderkey test suites.
//!
//! `MockScene` scripts a small host: named owners, optional bound
//! components with curves and live values, and the two selection lists.
//! Every keyframe committed through it is recorded as a [`CommittedKey`]
//! so tests can assert on exactly what landed where, and when.

use std::collections::BTreeMap;

use shaderkey_api_core::Value;
use shaderkey_keying_core::{CurveInfo, KeySite, SceneGraph, SkipReason};

/// One keyframe committed through the mock.
#[derive(Clone, Debug, PartialEq)]
pub struct CommittedKey {
    pub owner: String,
    /// true when the key landed on the owner's bound component.
    pub on_component: bool,
    pub path: String,
    pub index: Option<u32>,
    pub time: f32,
}

#[derive(Clone, Debug, Default)]
struct Component {
    has_timeline: bool,
    curves: Vec<CurveInfo>,
    /// Live values by component-relative path.
    values: BTreeMap<String, Value>,
    /// Component paths that refuse keyframes.
    unkeyable: Vec<String>,
}

#[derive(Clone, Debug, Default)]
struct SourceObject {
    component: Option<Component>,
    /// Live values by owner-relative path.
    values: BTreeMap<String, Value>,
    /// Owner paths that refuse keyframes.
    unkeyable: Vec<String>,
}

#[derive(Clone, Debug, Default)]
pub struct MockScene {
    objects: BTreeMap<String, SourceObject>,
    selected_components: Vec<String>,
    selection_slots: Vec<String>,
    time: f32,
    pub committed: Vec<CommittedKey>,
}

impl MockScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_time(&mut self, time: f32) {
        self.time = time;
    }

    /// Add an owner with no bound component.
    pub fn add_object(&mut self, name: &str) {
        self.objects.entry(name.to_string()).or_default();
    }

    /// Add an owner with a bound component and a timeline.
    pub fn add_component(&mut self, owner: &str) {
        let obj = self.objects.entry(owner.to_string()).or_default();
        obj.component.get_or_insert_with(|| Component {
            has_timeline: true,
            ..Component::default()
        });
    }

    /// Add an owner whose component carries no timeline at all.
    pub fn add_component_without_timeline(&mut self, owner: &str) {
        let obj = self.objects.entry(owner.to_string()).or_default();
        obj.component = Some(Component::default());
    }

    /// Add an animated curve on the owner's component and seed its live
    /// value.
    pub fn add_curve(&mut self, owner: &str, path: &str, index: u32, keypoints: usize, value: Value) {
        self.add_component(owner);
        let comp = self
            .objects
            .get_mut(owner)
            .and_then(|o| o.component.as_mut())
            .expect("component just ensured");
        comp.curves.push(CurveInfo {
            path: path.to_string(),
            index,
            keypoints,
        });
        comp.values.insert(path.to_string(), value);
    }

    pub fn set_component_live(&mut self, owner: &str, path: &str, value: Value) {
        self.add_component(owner);
        let comp = self
            .objects
            .get_mut(owner)
            .and_then(|o| o.component.as_mut())
            .expect("component just ensured");
        comp.values.insert(path.to_string(), value);
    }

    pub fn set_owner_live(&mut self, owner: &str, path: &str, value: Value) {
        let obj = self.objects.entry(owner.to_string()).or_default();
        obj.values.insert(path.to_string(), value);
    }

    pub fn mark_component_unkeyable(&mut self, owner: &str, path: &str) {
        if let Some(comp) = self.objects.get_mut(owner).and_then(|o| o.component.as_mut()) {
            comp.unkeyable.push(path.to_string());
        }
    }

    pub fn mark_owner_unkeyable(&mut self, owner: &str, path: &str) {
        if let Some(obj) = self.objects.get_mut(owner) {
            obj.unkeyable.push(path.to_string());
        }
    }

    /// Delete an owner, leaving any key-set entries pointing at it stale.
    pub fn remove_object(&mut self, name: &str) {
        self.objects.remove(name);
    }

    pub fn select_components(&mut self, owners: &[&str]) {
        self.selected_components = owners.iter().map(|s| s.to_string()).collect();
    }

    pub fn set_selection_slots(&mut self, owners: &[&str]) {
        self.selection_slots = owners.iter().map(|s| s.to_string()).collect();
    }

    /// Assertion helper: the live value at a component-relative path.
    pub fn component_live(&self, owner: &str, path: &str) -> Option<&Value> {
        self.objects.get(owner)?.component.as_ref()?.values.get(path)
    }

    /// Assertion helper: committed keys for one owner, in commit order.
    pub fn keys_for(&self, owner: &str) -> Vec<&CommittedKey> {
        self.committed.iter().filter(|k| k.owner == owner).collect()
    }
}

impl SceneGraph for MockScene {
    fn selected_component_owners(&self) -> Vec<String> {
        self.selected_components.clone()
    }

    fn selection_slot_owners(&self) -> Vec<String> {
        self.selection_slots.clone()
    }

    fn component_curves(&self, owner: &str) -> Option<Vec<CurveInfo>> {
        let comp = self.objects.get(owner)?.component.as_ref()?;
        if !comp.has_timeline {
            return None;
        }
        Some(comp.curves.clone())
    }

    fn component_value(&self, owner: &str, path: &str) -> Option<Value> {
        self.component_live(owner, path).cloned()
    }

    fn owner_value(&self, owner: &str, path: &str) -> Option<Value> {
        self.objects.get(owner)?.values.get(path).cloned()
    }

    fn set_component_value(
        &mut self,
        owner: &str,
        path: &str,
        value: &Value,
    ) -> Result<(), SkipReason> {
        let obj = self.objects.get_mut(owner).ok_or(SkipReason::UnknownOwner)?;
        let comp = obj.component.as_mut().ok_or(SkipReason::MissingComponent)?;
        match comp.values.get(path) {
            None => Err(SkipReason::UnresolvedPath),
            // A socket only accepts values of its own kind.
            Some(existing) if existing.kind() != value.kind() => Err(SkipReason::UnresolvedPath),
            Some(_) => {
                comp.values.insert(path.to_string(), value.clone());
                Ok(())
            }
        }
    }

    fn insert_key(&mut self, owner: &str, site: KeySite<'_>, time: f32) -> Result<(), SkipReason> {
        let obj = self.objects.get(owner).ok_or(SkipReason::UnknownOwner)?;
        let (on_component, path, index) = match site {
            KeySite::Component { path } => {
                let comp = obj.component.as_ref().ok_or(SkipReason::MissingComponent)?;
                if comp.unkeyable.iter().any(|p| p == path) {
                    return Err(SkipReason::UnkeyableTarget);
                }
                if !comp.values.contains_key(path) {
                    return Err(SkipReason::UnresolvedPath);
                }
                (true, path, None)
            }
            KeySite::Owner { path, index } => {
                if obj.unkeyable.iter().any(|p| p == path) {
                    return Err(SkipReason::UnkeyableTarget);
                }
                (false, path, index)
            }
        };
        self.committed.push(CommittedKey {
            owner: owner.to_string(),
            on_component,
            path: path.to_string(),
            index,
            time,
        });
        Ok(())
    }

    fn time_cursor(&self) -> f32 {
        self.time
    }
}
