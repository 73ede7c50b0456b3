// crates/nmpolicy-core/src/runtime/cache.rs
// ============================================================================
// Module: Capture Cache Manager
// Description: Per-capture reuse of cached results or fresh resolution.
// Purpose: Decide between cache hits and parse+evaluate, and stamp new results.
// Dependencies: crate::{core, expression, runtime}, tracing
// ============================================================================

//! ## Overview
//! Cache entries are addressed purely by capture name. A prior entry is
//! returned verbatim, metadata included, with no staleness check and no
//! re-validation of its content. On a miss the expression is parsed and
//! evaluated against the current state, and the serialized result is stamped
//! with the invocation's generation stamp.
//!
//! The current state is size-checked and parsed lazily on the first miss, so
//! a call served entirely from cache never depends on the current state.

// ============================================================================
// SECTION: Imports
// ============================================================================

use tracing::debug;

use crate::core::CachedState;
use crate::core::CaptureName;
use crate::core::CaptureState;
use crate::core::MetaInfo;
use crate::core::Node;
use crate::core::StateDocument;
use crate::core::Timestamp;
use crate::expression::ExpressionLimits;
use crate::expression::parse_expression_with_limits;
use crate::runtime::error::GenerateError;
use crate::runtime::evaluator::evaluate;
use crate::runtime::generator::DEFAULT_MAX_DOCUMENT_BYTES;

// ============================================================================
// SECTION: Resolution Result
// ============================================================================

/// Outcome of resolving one capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureResolution {
    /// Resolved (or cached) capture state.
    pub state: CaptureState,
    /// True when the state came from the prior cache.
    pub used_cache: bool,
}

// ============================================================================
// SECTION: Resolver
// ============================================================================

/// Resolves captures for a single generation call.
///
/// # Invariants
/// - Every fresh resolution is stamped with the same `generation_stamp`.
/// - The current state is size-checked and parsed at most once, on the first
///   miss.
pub struct CaptureResolver<'a> {
    /// Current state bytes, parsed on demand.
    current_state: &'a StateDocument,
    /// Cache supplied by the caller.
    prior_cache: &'a CachedState,
    /// Stamp shared by every fresh resolution.
    generation_stamp: Timestamp,
    /// Parser limits.
    limits: ExpressionLimits,
    /// Maximum size of the current state in bytes.
    max_document_bytes: usize,
    /// Parsed current state, once a miss needed it.
    tree: Option<Node>,
}

impl<'a> CaptureResolver<'a> {
    /// Creates a resolver over the call's inputs.
    #[must_use]
    pub fn new(
        current_state: &'a StateDocument,
        prior_cache: &'a CachedState,
        generation_stamp: Timestamp,
    ) -> Self {
        Self {
            current_state,
            prior_cache,
            generation_stamp,
            limits: ExpressionLimits::default(),
            max_document_bytes: DEFAULT_MAX_DOCUMENT_BYTES,
            tree: None,
        }
    }

    /// Replaces the parser limits.
    #[must_use]
    pub const fn with_limits(mut self, limits: ExpressionLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Replaces the current-state size limit.
    #[must_use]
    pub const fn with_max_document_bytes(mut self, max_document_bytes: usize) -> Self {
        self.max_document_bytes = max_document_bytes;
        self
    }

    /// Returns the generation stamp applied to fresh resolutions.
    #[must_use]
    pub const fn generation_stamp(&self) -> Timestamp {
        self.generation_stamp
    }

    /// Resolves one capture, preferring the prior cache.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError`] when a cache miss fails to parse, the current
    /// state is too large or unreadable, evaluation fails, or the result cannot
    /// be serialized.
    pub fn resolve(
        &mut self,
        name: &CaptureName,
        expression: &str,
    ) -> Result<CaptureResolution, GenerateError> {
        if let Some(cached) = self.prior_cache.get(name.as_str()) {
            debug!(capture = %name, "capture served from cache");
            return Ok(CaptureResolution {
                state: cached.clone(),
                used_cache: true,
            });
        }

        let parsed = parse_expression_with_limits(expression, &self.limits).map_err(|source| {
            GenerateError::Parse {
                capture: name.clone(),
                source,
            }
        })?;
        let tree = self.current_tree()?;
        let resolved = evaluate(&parsed, tree).map_err(|source| GenerateError::Evaluation {
            capture: name.clone(),
            source,
        })?;
        let bytes = resolved.to_yaml_bytes().map_err(|source| GenerateError::Serialization {
            capture: name.clone(),
            source,
        })?;
        debug!(capture = %name, resolved_bytes = bytes.len(), "capture resolved");

        Ok(CaptureResolution {
            state: CaptureState {
                state: StateDocument::from(bytes),
                meta_info: MetaInfo::generated(self.generation_stamp),
            },
            used_cache: false,
        })
    }

    /// Returns the parsed current state, checking and parsing it on first use.
    fn current_tree(&mut self) -> Result<&Node, GenerateError> {
        let tree = match self.tree.take() {
            Some(tree) => tree,
            None => {
                if self.current_state.len() > self.max_document_bytes {
                    return Err(GenerateError::DocumentTooLarge {
                        document: "current state",
                        max_bytes: self.max_document_bytes,
                        actual_bytes: self.current_state.len(),
                    });
                }
                Node::from_yaml_slice(self.current_state.as_bytes())
                    .map_err(GenerateError::InvalidCurrentState)?
            }
        };
        Ok(self.tree.insert(tree))
    }
}

/// Resolves a single capture against the given inputs.
///
/// # Errors
///
/// Returns [`GenerateError`] as [`CaptureResolver::resolve`] does.
pub fn resolve_capture(
    name: &CaptureName,
    expression: &str,
    current_state: &StateDocument,
    prior_cache: &CachedState,
    generation_stamp: Timestamp,
) -> Result<CaptureResolution, GenerateError> {
    CaptureResolver::new(current_state, prior_cache, generation_stamp).resolve(name, expression)
}
