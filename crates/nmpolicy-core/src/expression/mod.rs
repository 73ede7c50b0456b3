// crates/nmpolicy-core/src/expression/mod.rs
// ============================================================================
// Module: Capture Expressions
// Description: Syntax of the capture expression language.
// Purpose: Parse author-written capture expressions into ASTs.
// Dependencies: crate::core, thiserror
// ============================================================================

//! ## Overview
//! Capture expressions are dot-separated paths with an optional equality
//! filter, e.g. `routes.running.destination=="0.0.0.0/0"`. This module only
//! performs syntax analysis; evaluation lives in
//! [`runtime::evaluator`](crate::runtime::evaluator).

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod ast;
pub mod error;
mod lexer;
pub mod parser;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use ast::CaptureExpression;
pub use ast::EqualityFilter;
pub use ast::PathSegment;
pub use error::ParseError;
pub use error::ParseErrorKind;
pub use parser::DEFAULT_MAX_EXPRESSION_BYTES;
pub use parser::DEFAULT_MAX_PATH_SEGMENTS;
pub use parser::ExpressionLimits;
pub use parser::parse_expression;
pub use parser::parse_expression_with_limits;
