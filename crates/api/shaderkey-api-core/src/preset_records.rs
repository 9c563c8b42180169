//! Preset records and the blob codec.
//!
//! A preset blob is the JSON array of records. Each record serializes as:
//!   { "owner": "Glass", "path": "component.nodes[\"X\"].inputs[0].default_value",
//!     "value": { "type": "float", "data": 0.5 } }
//!
//! Records store owner names, never live references, so a preset survives
//! mutation or deletion of the key-set that produced it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{ParamPath, Value};

/// One captured `(owner, path, value)` triple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresetRecord {
    pub owner: String,
    pub path: ParamPath,
    pub value: Value,
}

impl PresetRecord {
    pub fn new(owner: impl Into<String>, path: ParamPath, value: Value) -> Self {
        Self {
            owner: owner.into(),
            path,
            value,
        }
    }
}

/// Errors produced while encoding/decoding preset blobs.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("preset blob encode error: {0}")]
    Encode(String),
    #[error("preset blob decode error: {0}")]
    Decode(String),
}

/// Encode an ordered record list into a single text blob.
pub fn encode_records(records: &[PresetRecord]) -> Result<String, CodecError> {
    serde_json::to_string(records).map_err(|e| CodecError::Encode(e.to_string()))
}

/// Decode a text blob back into its ordered record list.
pub fn decode_records(blob: &str) -> Result<Vec<PresetRecord>, CodecError> {
    serde_json::from_str(blob).map_err(|e| CodecError::Decode(e.to_string()))
}
