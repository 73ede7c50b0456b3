// crates/nmpolicy-core/src/expression/lexer.rs
// ============================================================================
// Module: Capture Expression Lexer
// Description: Byte-level tokenizer for dot-separated capture paths.
// Purpose: Split expressions into identifiers, dots, `==`, and quoted literals.
// Dependencies: crate::expression::error
// ============================================================================

//! ## Overview
//! The lexer walks the input byte by byte. Whitespace between tokens is
//! skipped; inside a literal it is kept verbatim. Literals are delimited by
//! double quotes and have no escape sequences.

use crate::core::identifiers::is_name_byte;
use crate::expression::error::ParseErrorKind;

// ============================================================================
// SECTION: Tokens
// ============================================================================

/// Lexer token produced from an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Token<'a> {
    /// Segment or field name.
    Ident(&'a str),
    /// Segment separator.
    Dot,
    /// Equality operator.
    EqEq,
    /// Quoted literal, without the quotes.
    Literal(&'a str),
    /// End-of-input marker.
    Eof,
}

impl Token<'_> {
    /// Describes the token for diagnostics.
    pub(crate) fn describe(&self) -> String {
        match self {
            Self::Ident(name) => format!("identifier `{name}`"),
            Self::Dot => "`.`".to_string(),
            Self::EqEq => "`==`".to_string(),
            Self::Literal(text) => format!("literal \"{text}\""),
            Self::Eof => "end of expression".to_string(),
        }
    }
}

/// Token paired with its byte offset.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SpannedToken<'a> {
    /// Token value.
    pub(crate) token: Token<'a>,
    /// Byte offset into the input.
    pub(crate) position: usize,
}

/// Lexer failure: byte offset and classification.
pub(crate) type LexError = (usize, ParseErrorKind);

// ============================================================================
// SECTION: Lexer
// ============================================================================

/// Lexer for capture expressions.
pub(crate) struct Lexer<'a> {
    /// Source input being tokenized.
    input: &'a str,
    /// Current byte offset into the input.
    offset: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    pub(crate) const fn new(input: &'a str) -> Self {
        Self {
            input,
            offset: 0,
        }
    }

    /// Lexes the input into tokens terminated by [`Token::Eof`].
    pub(crate) fn lex(&mut self) -> Result<Vec<SpannedToken<'a>>, LexError> {
        let mut tokens = Vec::new();
        let bytes = self.input.as_bytes();

        while let Some(&byte) = bytes.get(self.offset) {
            match byte {
                b' ' | b'\t' | b'\n' | b'\r' => {
                    self.offset += 1;
                }
                b'.' => {
                    tokens.push(self.simple(Token::Dot));
                    self.offset += 1;
                }
                b'=' => {
                    if self.peek_byte(bytes) == Some(b'=') {
                        tokens.push(self.simple(Token::EqEq));
                        self.offset += 2;
                    } else {
                        return Err(self.unknown_operator("="));
                    }
                }
                b'!' | b'<' | b'>' | b':' => {
                    let operator = if self.peek_byte(bytes) == Some(b'=') {
                        &self.input[self.offset .. self.offset + 2]
                    } else {
                        &self.input[self.offset .. self.offset + 1]
                    };
                    if operator == ":" {
                        return Err(self.unexpected_character());
                    }
                    return Err(self.unknown_operator(operator));
                }
                b'|' => {
                    return Err(self.unknown_operator("|"));
                }
                b'"' => {
                    tokens.push(self.literal(bytes)?);
                }
                byte if is_name_byte(byte) => {
                    let start = self.offset;
                    self.consume_while(bytes, is_name_byte);
                    tokens.push(SpannedToken {
                        token: Token::Ident(&self.input[start .. self.offset]),
                        position: start,
                    });
                }
                _ => {
                    return Err(self.unexpected_character());
                }
            }
        }

        tokens.push(SpannedToken {
            token: Token::Eof,
            position: self.offset,
        });
        Ok(tokens)
    }

    /// Lexes a double-quoted literal starting at the current offset.
    fn literal(&mut self, bytes: &[u8]) -> Result<SpannedToken<'a>, LexError> {
        let start = self.offset;
        let body_start = start + 1;
        let Some(length) = bytes[body_start ..].iter().position(|&b| b == b'"') else {
            return Err((start, ParseErrorKind::UnterminatedLiteral));
        };
        let body_end = body_start + length;
        self.offset = body_end + 1;
        Ok(SpannedToken {
            token: Token::Literal(&self.input[body_start .. body_end]),
            position: start,
        })
    }

    /// Builds a token at the current offset.
    const fn simple(&self, token: Token<'a>) -> SpannedToken<'a> {
        SpannedToken {
            token,
            position: self.offset,
        }
    }

    /// Returns the next byte without advancing.
    fn peek_byte(&self, bytes: &[u8]) -> Option<u8> {
        bytes.get(self.offset + 1).copied()
    }

    /// Advances while the condition matches the current byte.
    fn consume_while<F>(&mut self, bytes: &[u8], condition: F)
    where
        F: Fn(u8) -> bool,
    {
        while let Some(&b) = bytes.get(self.offset) {
            if condition(b) {
                self.offset += 1;
            } else {
                break;
            }
        }
    }

    /// Error for an operator the grammar does not support.
    fn unknown_operator(&self, operator: &str) -> LexError {
        (
            self.offset,
            ParseErrorKind::UnknownOperator {
                operator: operator.to_string(),
            },
        )
    }

    /// Error for the character at the current offset.
    fn unexpected_character(&self) -> LexError {
        let found = self.input[self.offset ..].chars().next().unwrap_or('\u{fffd}');
        (
            self.offset,
            ParseErrorKind::UnexpectedCharacter {
                found,
            },
        )
    }
}
