// crates/nmpolicy-config/src/loader.rs
// ============================================================================
// Module: Input Loaders
// Description: Size-limited readers for policy, state, and cache files.
// Purpose: Turn on-disk YAML inputs into the engine's in-memory types.
// Dependencies: nmpolicy-core, serde, serde_yaml
// ============================================================================

//! ## Overview
//! Every loader reads at most `max_document_bytes + 1` bytes and fails if the
//! limit is exceeded, so an oversized file is never fully buffered.
//!
//! A policy file holds a `capture` table and a `desiredState`. A string
//! `desiredState` is kept byte-for-byte so capture placeholders survive; a
//! structured one is re-serialized as YAML. Current-state files are passed
//! through as raw bytes; the engine parses them only on a cache miss.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use nmpolicy_core::CachedState;
use nmpolicy_core::CaptureName;
use nmpolicy_core::PolicySpec;
use nmpolicy_core::StateDocument;
use serde::Deserialize;
use serde_yaml::Value;
use thiserror::Error;

use crate::config::LimitsConfig;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while loading input files.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// The file could not be opened or read.
    #[error("unable to read {path}: {message}")]
    Io {
        /// File being read.
        path: String,
        /// Underlying I/O error text.
        message: String,
    },
    /// The file exceeds the configured document size limit.
    #[error("{path} exceeds size limit of {max_bytes} bytes")]
    TooLarge {
        /// File being read.
        path: String,
        /// Maximum allowed bytes.
        max_bytes: usize,
    },
    /// The policy file is malformed.
    #[error("invalid policy {path}: {message}")]
    InvalidPolicy {
        /// Policy file.
        path: String,
        /// Description of the problem.
        message: String,
    },
    /// The cache file is malformed.
    #[error("invalid cache {path}: {message}")]
    InvalidCache {
        /// Cache file.
        path: String,
        /// Description of the problem.
        message: String,
    },
}

// ============================================================================
// SECTION: File Shapes
// ============================================================================

/// On-disk policy layout.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct PolicyFile {
    /// Capture expressions keyed by name.
    #[serde(default)]
    capture: BTreeMap<String, String>,
    /// Desired-state template, as text or as a structured document.
    #[serde(default)]
    desired_state: Option<Value>,
}

// ============================================================================
// SECTION: Loaders
// ============================================================================

/// Loads a policy file.
///
/// # Errors
///
/// Returns [`LoadError`] when the file is unreadable, too large, not a valid
/// policy, or names a capture with characters a reference cannot use.
pub fn load_policy(path: &Path, limits: &LimitsConfig) -> Result<PolicySpec, LoadError> {
    let bytes = read_file_limited(path, limits.max_document_bytes)?;
    let invalid = |message: String| LoadError::InvalidPolicy {
        path: path.display().to_string(),
        message,
    };
    if is_blank(&bytes) {
        return Ok(PolicySpec::new());
    }
    let file: PolicyFile = serde_yaml::from_slice(&bytes).map_err(|err| invalid(err.to_string()))?;

    let mut spec = PolicySpec::new();
    for (name, expression) in file.capture {
        let name = CaptureName::new(name);
        if !name.is_referenceable() {
            return Err(invalid(format!(
                "capture name `{name}` must use only letters, digits, `-`, and `_`"
            )));
        }
        spec.captures.insert(name, expression);
    }
    spec.desired_state = match file.desired_state {
        None | Some(Value::Null) => StateDocument::empty(),
        Some(Value::String(text)) => StateDocument::from(text),
        Some(structured) => serde_yaml::to_string(&structured)
            .map(StateDocument::from)
            .map_err(|err| invalid(err.to_string()))?,
    };
    Ok(spec)
}

/// Loads a current-state file as raw bytes.
///
/// # Errors
///
/// Returns [`LoadError`] when the file is unreadable or too large.
pub fn load_state(path: &Path, limits: &LimitsConfig) -> Result<StateDocument, LoadError> {
    read_file_limited(path, limits.max_document_bytes).map(StateDocument::from)
}

/// Loads a YAML-serialized cache file.
///
/// An empty file is an empty cache.
///
/// # Errors
///
/// Returns [`LoadError`] when the file is unreadable, too large, or not a
/// valid cache document.
pub fn load_cache(path: &Path, limits: &LimitsConfig) -> Result<CachedState, LoadError> {
    let bytes = read_file_limited(path, limits.max_document_bytes)?;
    if is_blank(&bytes) {
        return Ok(CachedState::empty());
    }
    serde_yaml::from_slice(&bytes).map_err(|err| LoadError::InvalidCache {
        path: path.display().to_string(),
        message: err.to_string(),
    })
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Reads a file while enforcing a maximum byte limit.
fn read_file_limited(path: &Path, max_bytes: usize) -> Result<Vec<u8>, LoadError> {
    let io_error = |err: std::io::Error| LoadError::Io {
        path: path.display().to_string(),
        message: err.to_string(),
    };
    let too_large = || LoadError::TooLarge {
        path: path.display().to_string(),
        max_bytes,
    };

    let file = File::open(path).map_err(io_error)?;
    let limit = u64::try_from(max_bytes.saturating_add(1)).map_err(|_| too_large())?;
    let mut buf = Vec::new();
    file.take(limit).read_to_end(&mut buf).map_err(io_error)?;
    if buf.len() > max_bytes {
        return Err(too_large());
    }
    Ok(buf)
}

/// Returns true when the bytes hold only whitespace.
fn is_blank(bytes: &[u8]) -> bool {
    bytes.iter().all(u8::is_ascii_whitespace)
}
