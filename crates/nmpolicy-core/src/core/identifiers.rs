// crates/nmpolicy-core/src/core/identifiers.rs
// ============================================================================
// Module: nmpolicy Identifiers
// Description: Opaque identifiers used by policy specs and cached state.
// Purpose: Provide strongly typed, serializable names with stable string forms.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Capture names key both the policy's capture table and the cache. They
//! serialize as plain strings. Syntactic validation happens at the loader
//! boundary; inside the engine a name is just an opaque key.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::borrow::Borrow;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Identifier Types
// ============================================================================

/// Name of a capture inside a policy spec.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CaptureName(String);

impl CaptureName {
    /// Creates a new capture name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true when the name only uses characters that can appear in a
    /// `{{ capture.<name> }}` reference.
    #[must_use]
    pub fn is_referenceable(&self) -> bool {
        !self.0.is_empty() && self.0.bytes().all(is_name_byte)
    }
}

/// Returns true for bytes allowed in identifiers and capture names.
#[must_use]
pub const fn is_name_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_'
}

impl fmt::Display for CaptureName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl Borrow<str> for CaptureName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CaptureName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for CaptureName {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}
