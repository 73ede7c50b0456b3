// crates/nmpolicy-core/src/core/state.rs
// ============================================================================
// Module: nmpolicy State Structures
// Description: Policy spec, cached captures, and generated output.
// Purpose: Provide the value types exchanged with callers of the engine.
// Dependencies: crate::core::{identifiers, time}, serde
// ============================================================================

//! ## Overview
//! All structures here are plain values. The engine reads them through shared
//! references and returns fresh values; nothing is mutated in place. A
//! [`GeneratedState`]'s `cache` can be fed back verbatim as the next call's
//! prior cache, which is the only state that survives between invocations.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use serde::ser::Error as _;

use crate::core::identifiers::CaptureName;
use crate::core::time::Timestamp;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Version recorded in metadata produced by this engine.
pub const POLICY_VERSION: &str = "0";

// ============================================================================
// SECTION: Documents
// ============================================================================

/// Raw bytes of a state document.
///
/// # Invariants
/// - The bytes are opaque; they are only parsed when a capture needs them.
/// - An empty buffer means "no document".
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct StateDocument(Vec<u8>);

impl StateDocument {
    /// Wraps raw bytes.
    #[must_use]
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Returns an empty document.
    #[must_use]
    pub const fn empty() -> Self {
        Self(Vec::new())
    }

    /// Returns the raw bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consumes the document and returns its bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// Returns the byte length.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true when no bytes are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for StateDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("StateDocument").field(&String::from_utf8_lossy(&self.0)).finish()
    }
}

impl From<Vec<u8>> for StateDocument {
    fn from(value: Vec<u8>) -> Self {
        Self(value)
    }
}

impl From<&[u8]> for StateDocument {
    fn from(value: &[u8]) -> Self {
        Self(value.to_vec())
    }
}

impl From<&str> for StateDocument {
    fn from(value: &str) -> Self {
        Self(value.as_bytes().to_vec())
    }
}

impl From<String> for StateDocument {
    fn from(value: String) -> Self {
        Self(value.into_bytes())
    }
}

impl Serialize for StateDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let text = std::str::from_utf8(&self.0)
            .map_err(|_| S::Error::custom("state document is not valid utf-8"))?;
        serializer.serialize_str(text)
    }
}

impl<'de> Deserialize<'de> for StateDocument {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::from)
    }
}

// ============================================================================
// SECTION: Policy Spec
// ============================================================================

/// A policy: named capture expressions plus a desired-state template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PolicySpec {
    /// Desired-state template, passed through unless it references captures.
    #[serde(default, skip_serializing_if = "StateDocument::is_empty")]
    pub desired_state: StateDocument,
    /// Capture expressions keyed by capture name.
    #[serde(default, rename = "capture", skip_serializing_if = "BTreeMap::is_empty")]
    pub captures: BTreeMap<CaptureName, String>,
}

impl PolicySpec {
    /// Creates an empty policy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the desired-state template.
    #[must_use]
    pub fn with_desired_state(mut self, desired_state: impl Into<StateDocument>) -> Self {
        self.desired_state = desired_state.into();
        self
    }

    /// Adds a capture expression, replacing any previous one with that name.
    #[must_use]
    pub fn with_capture(
        mut self,
        name: impl Into<CaptureName>,
        expression: impl Into<String>,
    ) -> Self {
        self.captures.insert(name.into(), expression.into());
        self
    }
}

// ============================================================================
// SECTION: Metadata
// ============================================================================

/// Version and generation time attached to generated values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetaInfo {
    /// Engine version that produced the value.
    #[serde(default)]
    pub version: String,
    /// Generation stamp of the invocation that produced the value.
    #[serde(default, rename = "time")]
    pub timestamp: Timestamp,
}

impl MetaInfo {
    /// Metadata for a value produced now by this engine version.
    #[must_use]
    pub fn generated(timestamp: Timestamp) -> Self {
        Self {
            version: POLICY_VERSION.to_string(),
            timestamp,
        }
    }
}

// ============================================================================
// SECTION: Cache
// ============================================================================

/// A resolved capture together with its metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CaptureState {
    /// Serialized resolved document.
    #[serde(default)]
    pub state: StateDocument,
    /// Metadata recorded when the capture was resolved.
    #[serde(default)]
    pub meta_info: MetaInfo,
}

/// Resolved captures carried between invocations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CachedState {
    /// Resolved captures keyed by capture name.
    #[serde(default, rename = "capture", skip_serializing_if = "BTreeMap::is_empty")]
    pub captures: BTreeMap<CaptureName, CaptureState>,
}

impl CachedState {
    /// Returns a cache with no entries.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Adds an entry, replacing any previous one with that name.
    #[must_use]
    pub fn with_capture(mut self, name: impl Into<CaptureName>, state: CaptureState) -> Self {
        self.captures.insert(name.into(), state);
        self
    }

    /// Looks up a cached capture by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&CaptureState> {
        self.captures.get(name)
    }

    /// Returns the number of cached captures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.captures.len()
    }

    /// Returns true when no captures are cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.captures.is_empty()
    }
}

// ============================================================================
// SECTION: Generated Output
// ============================================================================

/// Output of a single generation call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct GeneratedState {
    /// Desired state after capture substitution.
    #[serde(default, skip_serializing_if = "StateDocument::is_empty")]
    pub desired_state: StateDocument,
    /// Cache to feed into the next invocation.
    #[serde(default)]
    pub cache: CachedState,
    /// Metadata of this invocation.
    #[serde(default)]
    pub meta_info: MetaInfo,
}
