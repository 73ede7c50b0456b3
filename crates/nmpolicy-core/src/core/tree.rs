// crates/nmpolicy-core/src/core/tree.rs
// ============================================================================
// Module: nmpolicy Tree Model
// Description: Tagged mapping/sequence/scalar representation of state documents.
// Purpose: Give the evaluator a typed view of YAML state with canonical scalars.
// Dependencies: serde, serde_yaml
// ============================================================================

//! ## Overview
//! A state document is a single rooted [`Node`]. Mappings are key-ordered so
//! serializing a node is deterministic. Scalars remember their YAML kind next
//! to a canonical text form; filters compare the text, serialization uses the
//! kind so `table-id: 254` is written back as an integer.
//!
//! Documents are deserialized through [`serde_yaml::Value`]. Mapping keys must
//! be scalars and are stored by their canonical text; tagged values are read
//! through their inner value.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use serde::Serializer;
use serde::ser::SerializeMap;
use serde::ser::SerializeSeq;
use serde_yaml::Value;
use thiserror::Error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while converting between bytes and [`Node`] trees.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    /// Input bytes are not a valid YAML document.
    #[error("invalid document: {0}")]
    Parse(String),
    /// A node could not be serialized.
    #[error("unable to serialize document: {0}")]
    Serialize(String),
    /// A mapping key was a collection rather than a scalar.
    #[error("mapping keys must be scalars, found a {found}")]
    UnsupportedKey {
        /// Kind of the offending key.
        found: NodeKind,
    },
    /// Two mapping keys collapsed to the same canonical text.
    #[error("duplicate mapping key `{key}`")]
    DuplicateKey {
        /// Canonical text of the repeated key.
        key: String,
    },
}

// ============================================================================
// SECTION: Scalars
// ============================================================================

/// YAML kind of a scalar leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ScalarKind {
    /// `null` / `~` / empty value.
    Null,
    /// `true` or `false`.
    Bool,
    /// Signed or unsigned integer.
    Integer,
    /// Floating point number.
    Float,
    /// Any string.
    String,
}

/// Scalar leaf stored canonically as text.
///
/// # Invariants
/// - `text` is a valid rendering of `kind` when built through the constructors.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Scalar {
    /// YAML kind used when serializing.
    kind: ScalarKind,
    /// Canonical text used for comparisons.
    text: String,
}

impl Scalar {
    /// Creates a null scalar.
    #[must_use]
    pub fn null() -> Self {
        Self {
            kind: ScalarKind::Null,
            text: "null".to_string(),
        }
    }

    /// Creates a boolean scalar.
    #[must_use]
    pub fn bool(value: bool) -> Self {
        Self {
            kind: ScalarKind::Bool,
            text: value.to_string(),
        }
    }

    /// Creates a signed integer scalar.
    #[must_use]
    pub fn integer(value: i64) -> Self {
        Self {
            kind: ScalarKind::Integer,
            text: value.to_string(),
        }
    }

    /// Creates an unsigned integer scalar.
    #[must_use]
    pub fn unsigned(value: u64) -> Self {
        Self {
            kind: ScalarKind::Integer,
            text: value.to_string(),
        }
    }

    /// Creates a string scalar.
    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        Self {
            kind: ScalarKind::String,
            text: value.into(),
        }
    }

    /// Converts a YAML number, keeping integers apart from floats.
    #[must_use]
    pub fn number(value: &serde_yaml::Number) -> Self {
        let kind = if value.is_i64() || value.is_u64() {
            ScalarKind::Integer
        } else {
            ScalarKind::Float
        };
        Self {
            kind,
            text: value.to_string(),
        }
    }

    /// Returns the scalar's YAML kind.
    #[must_use]
    pub const fn kind(&self) -> ScalarKind {
        self.kind
    }

    /// Returns the canonical text used for equality filters.
    #[must_use]
    pub fn canonical_text(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.kind {
            ScalarKind::Null => serializer.serialize_unit(),
            ScalarKind::Bool => serializer.serialize_bool(self.text == "true"),
            ScalarKind::Integer => {
                if let Ok(value) = self.text.parse::<i64>() {
                    serializer.serialize_i64(value)
                } else if let Ok(value) = self.text.parse::<u64>() {
                    serializer.serialize_u64(value)
                } else {
                    serializer.serialize_str(&self.text)
                }
            }
            ScalarKind::Float => match parse_float(&self.text) {
                Some(value) => serializer.serialize_f64(value),
                None => serializer.serialize_str(&self.text),
            },
            ScalarKind::String => serializer.serialize_str(&self.text),
        }
    }
}

/// Parses float text including the YAML spellings of NaN and infinity.
fn parse_float(text: &str) -> Option<f64> {
    match text {
        ".nan" | ".NaN" | ".NAN" => Some(f64::NAN),
        ".inf" | ".Inf" | ".INF" | "+.inf" => Some(f64::INFINITY),
        "-.inf" | "-.Inf" | "-.INF" => Some(f64::NEG_INFINITY),
        other => other.parse().ok(),
    }
}

// ============================================================================
// SECTION: Nodes
// ============================================================================

/// Shape of a [`Node`], used in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Key to node mapping.
    Mapping,
    /// Ordered list of nodes.
    Sequence,
    /// Scalar leaf.
    Scalar,
}

impl NodeKind {
    /// Returns a stable lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mapping => "mapping",
            Self::Sequence => "sequence",
            Self::Scalar => "scalar",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node in a state document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "serde_yaml::Value")]
pub enum Node {
    /// Unique string keys to child nodes.
    Mapping(BTreeMap<String, Node>),
    /// Ordered child nodes.
    Sequence(Vec<Node>),
    /// Leaf value.
    Scalar(Scalar),
}

impl Node {
    /// Returns an empty mapping, the tree of an empty document.
    #[must_use]
    pub const fn empty_mapping() -> Self {
        Self::Mapping(BTreeMap::new())
    }

    /// Builds a mapping from key/node pairs.
    #[must_use]
    pub fn mapping<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Self)>,
    {
        Self::Mapping(entries.into_iter().map(|(key, node)| (key.into(), node)).collect())
    }

    /// Builds a string scalar node.
    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        Self::Scalar(Scalar::string(value))
    }

    /// Returns the node's shape.
    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        match self {
            Self::Mapping(_) => NodeKind::Mapping,
            Self::Sequence(_) => NodeKind::Sequence,
            Self::Scalar(_) => NodeKind::Scalar,
        }
    }

    /// Looks up a key when the node is a mapping.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Self> {
        match self {
            Self::Mapping(entries) => entries.get(key),
            Self::Sequence(_) | Self::Scalar(_) => None,
        }
    }

    /// Returns the scalar leaf, if this node is one.
    #[must_use]
    pub const fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Self::Scalar(scalar) => Some(scalar),
            Self::Mapping(_) | Self::Sequence(_) => None,
        }
    }

    /// Returns the elements, if this node is a sequence.
    #[must_use]
    pub fn as_sequence(&self) -> Option<&[Self]> {
        match self {
            Self::Sequence(items) => Some(items),
            Self::Mapping(_) | Self::Scalar(_) => None,
        }
    }

    /// Parses a YAML (or JSON) document.
    ///
    /// An input containing only whitespace yields an empty mapping.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError`] when the bytes are not a valid document or
    /// contain collection keys.
    pub fn from_yaml_slice(bytes: &[u8]) -> Result<Self, DocumentError> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::empty_mapping());
        }
        let value: Value =
            serde_yaml::from_slice(bytes).map_err(|err| DocumentError::Parse(err.to_string()))?;
        Self::try_from(value)
    }

    /// Serializes the node as a YAML document.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Serialize`] when the YAML emitter fails.
    pub fn to_yaml_bytes(&self) -> Result<Vec<u8>, DocumentError> {
        serde_yaml::to_string(self)
            .map(String::into_bytes)
            .map_err(|err| DocumentError::Serialize(err.to_string()))
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Mapping(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            Self::Sequence(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Scalar(scalar) => scalar.serialize(serializer),
        }
    }
}

impl TryFrom<Value> for Node {
    type Error = DocumentError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Null => Ok(Self::Scalar(Scalar::null())),
            Value::Bool(flag) => Ok(Self::Scalar(Scalar::bool(flag))),
            Value::Number(number) => Ok(Self::Scalar(Scalar::number(&number))),
            Value::String(text) => Ok(Self::Scalar(Scalar::string(text))),
            Value::Sequence(items) => {
                let nodes = items.into_iter().map(Self::try_from).collect::<Result<Vec<_>, _>>()?;
                Ok(Self::Sequence(nodes))
            }
            Value::Mapping(mapping) => {
                let mut entries = BTreeMap::new();
                for (key, value) in mapping {
                    let key = key_text(key)?;
                    let node = Self::try_from(value)?;
                    if entries.contains_key(&key) {
                        return Err(DocumentError::DuplicateKey {
                            key,
                        });
                    }
                    entries.insert(key, node);
                }
                Ok(Self::Mapping(entries))
            }
            Value::Tagged(tagged) => Self::try_from(tagged.value),
        }
    }
}

/// Converts a YAML mapping key into its canonical text.
fn key_text(key: Value) -> Result<String, DocumentError> {
    match key {
        Value::Null => Ok(Scalar::null().text),
        Value::Bool(flag) => Ok(flag.to_string()),
        Value::Number(number) => Ok(number.to_string()),
        Value::String(text) => Ok(text),
        Value::Sequence(_) => Err(DocumentError::UnsupportedKey {
            found: NodeKind::Sequence,
        }),
        Value::Mapping(_) => Err(DocumentError::UnsupportedKey {
            found: NodeKind::Mapping,
        }),
        Value::Tagged(tagged) => key_text(tagged.value),
    }
}
