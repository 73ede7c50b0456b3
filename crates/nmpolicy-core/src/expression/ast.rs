// crates/nmpolicy-core/src/expression/ast.rs
// ============================================================================
// Module: Capture Expression AST
// Description: Path segments and equality filters produced by the parser.
// Purpose: Give the evaluator a validated, position-free view of an expression.
// Dependencies: std
// ============================================================================

//! ## Overview
//! A capture expression is a non-empty list of [`PathSegment`]s. A plain
//! segment descends into a mapping key. A filtered segment applies to the
//! sequence reached by the preceding segments and keeps the elements whose
//! `field` equals the literal; for such a segment the name and the filtered
//! field are the same.

use std::fmt;

// ============================================================================
// SECTION: Segments
// ============================================================================

/// Equality filter `field=="literal"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EqualityFilter {
    /// Field compared on each sequence element.
    pub field: String,
    /// Literal text, without the surrounding quotes.
    pub literal: String,
}

/// One dot-separated step of a capture expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathSegment {
    /// Key name of the segment.
    name: String,
    /// Equality filter, when the segment carries one.
    filter: Option<EqualityFilter>,
}

impl PathSegment {
    /// Creates a plain mapping-lookup segment.
    #[must_use]
    pub fn field(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            filter: None,
        }
    }

    /// Creates a filtered segment `field=="literal"`.
    #[must_use]
    pub fn filtered(field: impl Into<String>, literal: impl Into<String>) -> Self {
        let field = field.into();
        Self {
            name: field.clone(),
            filter: Some(EqualityFilter {
                field,
                literal: literal.into(),
            }),
        }
    }

    /// Returns the segment name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the equality filter, if any.
    #[must_use]
    pub const fn filter(&self) -> Option<&EqualityFilter> {
        self.filter.as_ref()
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.filter {
            Some(filter) => write!(f, "{}==\"{}\"", filter.field, filter.literal),
            None => f.write_str(&self.name),
        }
    }
}

// ============================================================================
// SECTION: Expressions
// ============================================================================

/// Parsed capture expression.
///
/// # Invariants
/// - `segments` is never empty when produced by the parser.
/// - The first segment never carries a filter when produced by the parser.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CaptureExpression {
    /// Ordered path segments.
    segments: Vec<PathSegment>,
}

impl CaptureExpression {
    /// Builds an expression from segments.
    #[must_use]
    pub const fn new(segments: Vec<PathSegment>) -> Self {
        Self {
            segments,
        }
    }

    /// Returns the path segments.
    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }
}

impl fmt::Display for CaptureExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render_path(&self.segments, f)
    }
}

/// Writes segments joined by `.`.
pub(crate) fn render_path(segments: &[PathSegment], f: &mut impl fmt::Write) -> fmt::Result {
    for (index, segment) in segments.iter().enumerate() {
        if index > 0 {
            f.write_char('.')?;
        }
        write!(f, "{segment}")?;
    }
    Ok(())
}

/// Renders a segment prefix as a string, for diagnostics.
pub(crate) fn path_text(segments: &[PathSegment]) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = render_path(segments, &mut out);
    out
}
