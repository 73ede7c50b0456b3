// crates/nmpolicy-core/src/expression/parser.rs
// ============================================================================
// Module: Capture Expression Parser
// Description: Recursive-descent parser for dot-separated capture paths.
// Purpose: Turn author-written expressions into validated ASTs.
// Dependencies: crate::expression::{ast, error, lexer}
// ============================================================================

//! ## Overview
//! Grammar:
//!
//! ```text
//! path    := segment ('.' segment)*
//! segment := identifier | identifier '==' '"' literal '"'
//! ```
//!
//! The first segment cannot carry a filter. Parsing is pure: the same input
//! always yields the same AST or the same error.
//!
//! ```
//! use nmpolicy_core::expression::parse_expression;
//!
//! let expr = parse_expression(r#"routes.running.destination=="0.0.0.0/0""#).unwrap();
//! assert_eq!(expr.segments().len(), 3);
//! assert_eq!(expr.to_string(), r#"routes.running.destination=="0.0.0.0/0""#);
//! ```

use crate::expression::ast::CaptureExpression;
use crate::expression::ast::PathSegment;
use crate::expression::error::ParseError;
use crate::expression::error::ParseErrorKind;
use crate::expression::lexer::Lexer;
use crate::expression::lexer::SpannedToken;
use crate::expression::lexer::Token;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Default maximum expression size in bytes.
pub const DEFAULT_MAX_EXPRESSION_BYTES: usize = 4096;
/// Default maximum number of path segments.
pub const DEFAULT_MAX_PATH_SEGMENTS: usize = 64;

/// Size limits applied while parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpressionLimits {
    /// Maximum expression length in bytes.
    pub max_bytes: usize,
    /// Maximum number of path segments.
    pub max_segments: usize,
}

impl Default for ExpressionLimits {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_EXPRESSION_BYTES,
            max_segments: DEFAULT_MAX_PATH_SEGMENTS,
        }
    }
}

// ============================================================================
// SECTION: Public API
// ============================================================================

/// Parses a capture expression with the default limits.
///
/// # Errors
///
/// Returns [`ParseError`] for empty input, unbalanced quotes, empty segments,
/// unknown operators, misplaced filters, or exceeded limits.
pub fn parse_expression(input: &str) -> Result<CaptureExpression, ParseError> {
    parse_expression_with_limits(input, &ExpressionLimits::default())
}

/// Parses a capture expression with explicit limits.
///
/// # Errors
///
/// Returns [`ParseError`] as [`parse_expression`] does.
pub fn parse_expression_with_limits(
    input: &str,
    limits: &ExpressionLimits,
) -> Result<CaptureExpression, ParseError> {
    if input.len() > limits.max_bytes {
        return Err(ParseError::new(
            input,
            0,
            ParseErrorKind::ExpressionTooLarge {
                max_bytes: limits.max_bytes,
                actual_bytes: input.len(),
            },
        ));
    }
    if input.trim().is_empty() {
        return Err(ParseError::new(input, 0, ParseErrorKind::EmptyExpression));
    }

    let tokens = Lexer::new(input)
        .lex()
        .map_err(|(position, kind)| ParseError::new(input, position, kind))?;
    let mut parser = Parser::new(tokens, limits.max_segments);
    let segments =
        parser.parse_path().map_err(|(position, kind)| ParseError::new(input, position, kind))?;
    Ok(CaptureExpression::new(segments))
}

// ============================================================================
// SECTION: Parser
// ============================================================================

/// Parser failure before the input text is attached.
type StepError = (usize, ParseErrorKind);

/// Recursive-descent parser over the token stream.
struct Parser<'input> {
    /// Token stream with source positions.
    tokens: Vec<SpannedToken<'input>>,
    /// Current token index.
    index: usize,
    /// Maximum number of segments accepted.
    max_segments: usize,
}

impl<'input> Parser<'input> {
    /// Creates a parser over the token stream.
    const fn new(tokens: Vec<SpannedToken<'input>>, max_segments: usize) -> Self {
        Self {
            tokens,
            index: 0,
            max_segments,
        }
    }

    /// Parses `segment ('.' segment)*` up to end of input.
    fn parse_path(&mut self) -> Result<Vec<PathSegment>, StepError> {
        let mut segments = Vec::new();
        loop {
            if segments.len() == self.max_segments {
                return Err((
                    self.current().position,
                    ParseErrorKind::TooManySegments {
                        max_segments: self.max_segments,
                    },
                ));
            }
            let segment = self.parse_segment(segments.is_empty())?;
            segments.push(segment);

            let SpannedToken {
                token,
                position,
            } = *self.current();
            match token {
                Token::Eof => break,
                Token::Dot => self.advance(),
                other => {
                    return Err((
                        position,
                        ParseErrorKind::UnexpectedToken {
                            expected: "`.` or end of expression",
                            found: other.describe(),
                        },
                    ));
                }
            }
        }
        Ok(segments)
    }

    /// Parses a single segment, optionally followed by `=="literal"`.
    fn parse_segment(&mut self, first: bool) -> Result<PathSegment, StepError> {
        let SpannedToken {
            token,
            position,
        } = *self.current();
        let name = match token {
            Token::Ident(name) => name,
            Token::Dot | Token::Eof => return Err((position, ParseErrorKind::EmptySegment)),
            Token::EqEq | Token::Literal(_) => {
                return Err((
                    position,
                    ParseErrorKind::UnexpectedToken {
                        expected: "segment name",
                        found: token.describe(),
                    },
                ));
            }
        };
        self.advance();

        if self.current().token != Token::EqEq {
            return Ok(PathSegment::field(name));
        }
        if first {
            return Err((self.current().position, ParseErrorKind::FilterOnFirstSegment));
        }
        self.advance();

        let SpannedToken {
            token,
            position,
        } = *self.current();
        match token {
            Token::Literal(literal) => {
                self.advance();
                Ok(PathSegment::filtered(name, literal))
            }
            other => Err((
                position,
                ParseErrorKind::UnexpectedToken {
                    expected: "quoted literal after `==`",
                    found: other.describe(),
                },
            )),
        }
    }

    /// Returns the current token.
    fn current(&self) -> &SpannedToken<'input> {
        debug_assert!(self.index < self.tokens.len(), "parser index out of bounds");
        &self.tokens[self.index]
    }

    /// Advances to the next token, stopping at end of input.
    const fn advance(&mut self) {
        if self.index < self.tokens.len() - 1 {
            self.index += 1;
        }
    }
}
