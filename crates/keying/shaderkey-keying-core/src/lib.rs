//! Shaderkey Keying Core (engine-agnostic)
//!
//! Discovers animated shader-parameter paths on host-owned scene objects
//! into named key-sets, replays a set by committing keyframes at the
//! current time cursor, and snapshots/restores the live values of a set
//! through a JSON preset store. The host object graph is injected as a
//! [`SceneGraph`] trait on every call; the core owns only the derived
//! index and the store.

pub mod engine;
pub mod keyset;
pub mod scene;
pub mod store;

// Re-exports for consumers (adapters)
pub use engine::{Engine, PresetError, RestoreError, RestoreSummary, SkippedRecord};
pub use keyset::{KeyEntry, KeySet, KeySetRegistry};
pub use scene::{CurveInfo, KeySite, SceneGraph, SkipReason};
pub use store::{Preset, PresetStore};
pub use shaderkey_api_core::{
    decode_records, encode_records, CodecError, ParamPath, PathKind, PresetRecord, Value, ValueKind,
};
