// crates/nmpolicy-core/src/expression/error.rs
// ============================================================================
// Module: Capture Expression Errors
// Description: Structured syntax errors for capture expressions.
// Purpose: Report the offending expression and the byte offset of the failure.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! Every syntax failure is a [`ParseError`]: the original expression text, a
//! byte offset into it, and a [`ParseErrorKind`] describing what went wrong.

use thiserror::Error;

/// What went wrong while parsing a capture expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    /// Input was empty or contained only whitespace.
    #[error("expression is empty")]
    EmptyExpression,
    /// Input exceeded the configured size limit.
    #[error("expression exceeds size limit: {actual_bytes} bytes (max {max_bytes})")]
    ExpressionTooLarge {
        /// Maximum allowed bytes.
        max_bytes: usize,
        /// Actual input length in bytes.
        actual_bytes: usize,
    },
    /// Input contained more path segments than allowed.
    #[error("expression exceeds segment limit (max {max_segments})")]
    TooManySegments {
        /// Maximum allowed segments.
        max_segments: usize,
    },
    /// A `.` was not followed or preceded by a segment name.
    #[error("empty path segment")]
    EmptySegment,
    /// A string literal was opened but never closed.
    #[error("unterminated string literal")]
    UnterminatedLiteral,
    /// A character that cannot start any token.
    #[error("unexpected character `{found}`")]
    UnexpectedCharacter {
        /// The offending character.
        found: char,
    },
    /// An operator other than `==`.
    #[error("unknown operator `{operator}`")]
    UnknownOperator {
        /// The operator text as written.
        operator: String,
    },
    /// A valid token in the wrong place.
    #[error("unexpected {found}, expected {expected}")]
    UnexpectedToken {
        /// Human-friendly expectation summary.
        expected: &'static str,
        /// Description of the token that was seen.
        found: String,
    },
    /// The first segment carried an equality filter.
    #[error("the first path segment cannot carry a filter")]
    FilterOnFirstSegment,
}

/// Syntax error in a capture expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid capture expression `{expression}` at {position}: {kind}")]
pub struct ParseError {
    /// The expression as written by the policy author.
    pub expression: String,
    /// Byte offset of the failure.
    pub position: usize,
    /// Failure classification.
    pub kind: ParseErrorKind,
}

impl ParseError {
    /// Creates a parse error for the given input.
    #[must_use]
    pub fn new(expression: &str, position: usize, kind: ParseErrorKind) -> Self {
        Self {
            expression: expression.to_string(),
            position,
            kind,
        }
    }
}
