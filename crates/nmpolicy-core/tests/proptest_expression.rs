//! Capture expression property-based tests.
//!
//! ## Purpose
//! These tests fuzz expression text and state trees to ensure parsing and
//! evaluation never panic and never invent data.
//!
//! ## What is covered
//! - Arbitrary input is either parsed or rejected, never a panic.
//! - Parsed expressions render to text that parses back to the same AST.
//! - Filters keep exactly the matching elements, unchanged.
//!
//! ## What is intentionally out of scope
//! - Specific error positions (covered by `expression_parser.rs`).
// crates/nmpolicy-core/tests/proptest_expression.rs
// ============================================================================
// Module: Capture Expression Property-Based Tests
// Description: Fuzz-like checks for parsing and filtering.
// Purpose: Ensure the expression engine is total and shape-preserving.
// ============================================================================

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

use nmpolicy_core::Node;
use nmpolicy_core::evaluate;
use nmpolicy_core::parse_expression;
use proptest::prelude::*;

/// Strategy for one well-formed segment, optionally filtered.
fn segment() -> impl Strategy<Value = String> {
    (
        "[a-z][a-z0-9_-]{0,8}",
        proptest::option::of("[a-zA-Z0-9./: -]{0,12}"),
    )
        .prop_map(|(name, literal)| match literal {
            Some(literal) => format!("{name} == \"{literal}\""),
            None => name,
        })
}

/// Strategy for a well-formed expression and its segment count; the first
/// segment is never filtered.
fn expression() -> impl Strategy<Value = (String, usize)> {
    ("[a-z][a-z0-9_-]{0,8}", proptest::collection::vec(segment(), 0 .. 6)).prop_map(
        |(first, rest)| {
            let count = rest.len() + 1;
            (std::iter::once(first).chain(rest).collect::<Vec<_>>().join("."), count)
        },
    )
}

proptest! {
    #[test]
    fn parser_handles_random_input(input in ".{0,64}") {
        if let Ok(parsed) = parse_expression(&input) {
            let reparsed = parse_expression(&parsed.to_string()).unwrap();
            prop_assert_eq!(reparsed, parsed);
        }
    }

    #[test]
    fn well_formed_expressions_round_trip((input, count) in expression()) {
        let parsed = parse_expression(&input).unwrap();
        prop_assert_eq!(parsed.segments().len(), count);
        prop_assert!(parsed.segments()[0].filter().is_none());
        prop_assert_eq!(parse_expression(&parsed.to_string()).unwrap(), parsed);
    }

    #[test]
    fn filter_keeps_exactly_matching_elements(
        values in proptest::collection::vec(0_u8 .. 4, 0 .. 12),
        wanted in 0_u8 .. 4,
    ) {
        let items: Vec<Node> = values
            .iter()
            .enumerate()
            .map(|(index, value)| {
                Node::mapping([
                    ("key", Node::string(value.to_string())),
                    ("index", Node::string(index.to_string())),
                ])
            })
            .collect();
        let root = Node::mapping([("items", Node::Sequence(items.clone()))]);
        let parsed = parse_expression(&format!("items.key==\"{wanted}\"")).unwrap();

        let result = evaluate(&parsed, &root).unwrap();
        let kept = result.get("items").and_then(Node::as_sequence).unwrap();
        let expected: Vec<Node> = items
            .into_iter()
            .zip(&values)
            .filter(|(_, value)| **value == wanted)
            .map(|(item, _)| item)
            .collect();
        prop_assert_eq!(kept, expected.as_slice());
    }
}
