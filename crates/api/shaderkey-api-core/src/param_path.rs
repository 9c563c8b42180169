//! ParamPath parsing and formatting.
//!
//! A keyed parameter is addressed by one of two forms:
//! - *indirect*: the full path starts with the container marker
//!   (`component.`) and is relative to the owner's bound animatable
//!   component, e.g. `component.nodes["Emission"].inputs[1].default_value`;
//! - *direct*: no marker; the path is relative to the owner object itself.
//!
//! The kind is decided once at construction and stored alongside the full
//! string, so replay and capture dispatch on the variant instead of
//! re-testing string prefixes. The full string is kept verbatim: it is
//! what preset records serialize.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Marker prefix that routes a path through the owner's bound component.
pub const COMPONENT_MARKER: &str = "component.";

/// Suffix addressing a socket's value slot; restore writes through it.
pub const VALUE_SOCKET_SUFFIX: &str = ".default_value";

/// Addressing form, computed once from the full path string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathKind {
    /// Component-relative; holds the remainder after the marker.
    Indirect { stripped: String },
    /// Relative to the owner object itself.
    Direct,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParamPath {
    full: String,
    kind: PathKind,
}

impl ParamPath {
    /// Classify a full path string. Any string is valid: a marker prefix
    /// makes it indirect, everything else is direct.
    pub fn new(full: impl Into<String>) -> Self {
        let full = full.into();
        let kind = match full.strip_prefix(COMPONENT_MARKER) {
            Some(rest) => PathKind::Indirect {
                stripped: rest.to_string(),
            },
            None => PathKind::Direct,
        };
        Self { full, kind }
    }

    /// Build the indirect form for a component-relative path.
    pub fn indirect(component_path: &str) -> Self {
        Self::new(format!("{COMPONENT_MARKER}{component_path}"))
    }

    /// The full path string as discovered/serialized.
    pub fn full(&self) -> &str {
        &self.full
    }

    pub fn kind(&self) -> &PathKind {
        &self.kind
    }

    pub fn is_indirect(&self) -> bool {
        matches!(self.kind, PathKind::Indirect { .. })
    }

    /// Component-relative remainder for indirect paths.
    pub fn stripped(&self) -> Option<&str> {
        match &self.kind {
            PathKind::Indirect { stripped } => Some(stripped),
            PathKind::Direct => None,
        }
    }

    /// For indirect paths addressing a socket's value slot, the socket
    /// path without the suffix. `None` for every other path.
    pub fn socket_base(&self) -> Option<&str> {
        self.stripped()
            .and_then(|rest| rest.strip_suffix(VALUE_SOCKET_SUFFIX))
    }
}

impl fmt::Display for ParamPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full)
    }
}

impl FromStr for ParamPath {
    type Err = Infallible;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(ParamPath::new(s))
    }
}

// Serde support: serialize as string, deserialize from string
impl Serialize for ParamPath {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.full)
    }
}

impl<'de> Deserialize<'de> for ParamPath {
    fn deserialize<D>(deserializer: D) -> Result<ParamPath, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(ParamPath::new(s))
    }
}
