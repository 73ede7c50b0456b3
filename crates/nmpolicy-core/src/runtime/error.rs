// crates/nmpolicy-core/src/runtime/error.rs
// ============================================================================
// Module: Generation Errors
// Description: Error surfaced by a state generation call.
// Purpose: Wrap parse, evaluation, and substitution failures with context.
// Dependencies: crate::{core, expression, runtime::evaluator}, thiserror
// ============================================================================

//! ## Overview
//! Any failure aborts the whole generation call; there is no partial result.
//! Inner parse and evaluation errors are carried unchanged alongside the name
//! of the capture that raised them.

use thiserror::Error;

use crate::core::CaptureName;
use crate::core::DocumentError;
use crate::expression::ParseError;
use crate::runtime::evaluator::EvalError;

/// Errors returned by [`StateGenerator::generate`](crate::runtime::StateGenerator::generate).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerateError {
    /// A capture expression is malformed.
    #[error("capture `{capture}`: {source}")]
    Parse {
        /// Capture whose expression failed to parse.
        capture: CaptureName,
        /// Underlying syntax error.
        source: ParseError,
    },
    /// A capture expression did not match the current state.
    #[error("capture `{capture}`: {source}")]
    Evaluation {
        /// Capture whose evaluation failed.
        capture: CaptureName,
        /// Underlying evaluation error.
        source: EvalError,
    },
    /// The desired-state template references an unknown or malformed capture.
    #[error("unresolved capture reference `{reference}` at byte {position}")]
    UnresolvedCaptureReference {
        /// Reference text as written in the template.
        reference: String,
        /// Byte offset of the reference in the template.
        position: usize,
    },
    /// The current state could not be read as a document.
    #[error("current state is not a valid document: {0}")]
    InvalidCurrentState(DocumentError),
    /// A resolved capture could not be serialized.
    #[error("capture `{capture}`: {source}")]
    Serialization {
        /// Capture whose result failed to serialize.
        capture: CaptureName,
        /// Underlying document error.
        source: DocumentError,
    },
    /// An input document exceeded the configured size limit.
    #[error("{document} exceeds size limit: {actual_bytes} bytes (max {max_bytes})")]
    DocumentTooLarge {
        /// Which input was too large.
        document: &'static str,
        /// Maximum allowed bytes.
        max_bytes: usize,
        /// Actual size in bytes.
        actual_bytes: usize,
    },
}

impl GenerateError {
    /// Returns the capture the error relates to, when there is one.
    #[must_use]
    pub const fn capture(&self) -> Option<&CaptureName> {
        match self {
            Self::Parse {
                capture, ..
            }
            | Self::Evaluation {
                capture, ..
            }
            | Self::Serialization {
                capture, ..
            } => Some(capture),
            Self::UnresolvedCaptureReference {
                ..
            }
            | Self::InvalidCurrentState(_)
            | Self::DocumentTooLarge {
                ..
            } => None,
        }
    }
}
