// crates/nmpolicy-core/src/runtime/evaluator.rs
// ============================================================================
// Module: Capture Path Evaluator
// Description: Tree filtering for parsed capture expressions.
// Purpose: Narrow a state document down to the subtree an expression selects.
// Dependencies: crate::{core, expression}, thiserror
// ============================================================================

//! ## Overview
//! Evaluation walks the tree one segment at a time and rebuilds only the
//! visited path, so the result mirrors the source document's shape:
//! `routes.running.destination=="0.0.0.0/0"` yields
//! `{routes: {running: [<matching routes>]}}`.
//!
//! - A plain segment looks up a mapping key. A missing key is
//!   [`EvalError::PathNotFound`]; a non-mapping node is
//!   [`EvalError::TypeMismatch`].
//! - A filtered segment applies to the current sequence. Every element must be
//!   a mapping holding the filtered field as a scalar; elements whose field's
//!   canonical text equals the literal are kept whole, the rest are dropped.
//! - Segments after a filter are evaluated inside each kept element.
//!
//! Evaluation is deterministic and side-effect free.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use thiserror::Error;

use crate::core::Node;
use crate::core::NodeKind;
use crate::expression::CaptureExpression;
use crate::expression::EqualityFilter;
use crate::expression::PathSegment;
use crate::expression::ast::path_text;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while evaluating an expression against a document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    /// A path segment has no matching key.
    #[error("path `{path}` not found: missing key `{segment}`")]
    PathNotFound {
        /// The missing key.
        segment: String,
        /// Expression prefix up to and including the failing segment.
        path: String,
    },
    /// A node did not have the shape the segment requires.
    #[error("type mismatch at `{path}`: segment `{segment}` expects a {expected}, found a {found}")]
    TypeMismatch {
        /// The segment being evaluated.
        segment: String,
        /// Expression prefix up to and including the failing segment.
        path: String,
        /// Shape the segment requires.
        expected: NodeKind,
        /// Shape actually present.
        found: NodeKind,
    },
}

// ============================================================================
// SECTION: Public API
// ============================================================================

/// Evaluates a capture expression against a document root.
///
/// # Errors
///
/// Returns [`EvalError::PathNotFound`] when a key is missing and
/// [`EvalError::TypeMismatch`] when a node has the wrong shape, including a
/// filter compared against a non-scalar field.
pub fn evaluate(expression: &CaptureExpression, root: &Node) -> Result<Node, EvalError> {
    evaluate_from(root, expression.segments(), 0)
}

// ============================================================================
// SECTION: Traversal
// ============================================================================

/// Evaluates `segments[index..]` against `node`.
fn evaluate_from(node: &Node, segments: &[PathSegment], index: usize) -> Result<Node, EvalError> {
    let Some(segment) = segments.get(index) else {
        return Ok(node.clone());
    };

    match segment.filter() {
        None => {
            let Node::Mapping(entries) = node else {
                return Err(type_mismatch(segments, index, NodeKind::Mapping, node.kind()));
            };
            let child = entries.get(segment.name()).ok_or_else(|| EvalError::PathNotFound {
                segment: segment.name().to_string(),
                path: path_text(&segments[..= index]),
            })?;
            let narrowed = evaluate_from(child, segments, index + 1)?;
            Ok(Node::Mapping(BTreeMap::from([(segment.name().to_string(), narrowed)])))
        }
        Some(filter) => {
            let Node::Sequence(items) = node else {
                return Err(type_mismatch(segments, index, NodeKind::Sequence, node.kind()));
            };
            let mut kept = Vec::new();
            for item in items {
                if element_matches(item, filter, segments, index)? {
                    kept.push(evaluate_from(item, segments, index + 1)?);
                }
            }
            Ok(Node::Sequence(kept))
        }
    }
}

/// Returns whether a sequence element satisfies the equality filter.
fn element_matches(
    item: &Node,
    filter: &EqualityFilter,
    segments: &[PathSegment],
    index: usize,
) -> Result<bool, EvalError> {
    let Node::Mapping(fields) = item else {
        return Err(type_mismatch(segments, index, NodeKind::Mapping, item.kind()));
    };
    let value = fields.get(&filter.field).ok_or_else(|| EvalError::PathNotFound {
        segment: filter.field.clone(),
        path: path_text(&segments[..= index]),
    })?;
    let Node::Scalar(scalar) = value else {
        return Err(type_mismatch(segments, index, NodeKind::Scalar, value.kind()));
    };
    Ok(scalar.canonical_text() == filter.literal)
}

/// Builds a type mismatch error for `segments[index]`.
fn type_mismatch(
    segments: &[PathSegment],
    index: usize,
    expected: NodeKind,
    found: NodeKind,
) -> EvalError {
    EvalError::TypeMismatch {
        segment: segments.get(index).map(|segment| segment.name().to_string()).unwrap_or_default(),
        path: path_text(&segments[..= index]),
        expected,
        found,
    }
}
