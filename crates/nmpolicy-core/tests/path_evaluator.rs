// crates/nmpolicy-core/tests/path_evaluator.rs
// ============================================================================
// Module: Path Evaluator Tests
// Description: Evaluation of parsed capture expressions against trees.
// Purpose: Validate shape-preserving narrowing, filters, and failure modes.
// Dependencies: nmpolicy-core
// ============================================================================

//! ## Overview
//! Tests the evaluator for:
//! - Results that mirror the source document's nesting
//! - Equality filters on scalars of every kind
//! - Path and type failures with the failing segment reported

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
    reason = "Test-only output and panic-based assertions are permitted."
)]

mod common;

use nmpolicy_core::EvalError;
use nmpolicy_core::Node;
use nmpolicy_core::NodeKind;
use nmpolicy_core::evaluate;
use nmpolicy_core::parse_expression;

use crate::common::DEFAULT_ROUTE_ONLY;
use crate::common::INTERFACES;
use crate::common::TWO_ROUTES;
use crate::common::tree;

/// Parses `expression` and evaluates it against `yaml`.
fn eval(expression: &str, yaml: &str) -> Result<Node, EvalError> {
    let parsed = parse_expression(expression).unwrap();
    evaluate(&parsed, &tree(yaml))
}

// ============================================================================
// SECTION: Narrowing
// ============================================================================

/// Tests the default-gateway capture keeps the document nesting.
#[test]
fn filter_result_mirrors_source_shape() {
    let result = eval(r#"routes.running.destination=="0.0.0.0/0""#, TWO_ROUTES).unwrap();
    assert_eq!(result, tree(DEFAULT_ROUTE_ONLY));
}

/// Tests a plain path returns the addressed subtree under its parents.
#[test]
fn plain_path_wraps_subtree_in_parents() {
    let result = eval("routes.running", TWO_ROUTES).unwrap();
    assert_eq!(result, tree(TWO_ROUTES));

    let result = eval("interfaces", "interfaces: []\nroutes: {}\n").unwrap();
    assert_eq!(result, tree("interfaces: []\n"));
}

/// Tests that a filter matching nothing yields an empty sequence.
#[test]
fn filter_without_matches_yields_empty_sequence() {
    let result = eval(r#"routes.running.destination=="9.9.9.9/32""#, TWO_ROUTES).unwrap();
    assert_eq!(result, tree("routes:\n  running: []\n"));
}

/// Tests that non-string scalars compare by canonical text.
#[test]
fn filter_compares_canonical_scalar_text() {
    let result = eval(r#"routes.running.table-id=="254""#, TWO_ROUTES).unwrap();
    assert_eq!(result, tree(TWO_ROUTES));

    let yaml = "items:\n- enabled: true\n  id: a\n- enabled: false\n  id: b\n";
    let result = eval(r#"items.enabled=="true""#, yaml).unwrap();
    assert_eq!(result, tree("items:\n- enabled: true\n  id: a\n"));
}

/// Tests that segments after a filter evaluate inside kept elements.
#[test]
fn segments_after_filter_narrow_each_element() {
    let result = eval(r#"interfaces.name=="eth1".ipv4.address"#, INTERFACES).unwrap();
    let expected = tree(
        "interfaces:\n- ipv4:\n    address:\n    - ip: 10.0.0.1\n      prefix-length: 24\n",
    );
    assert_eq!(result, expected);
}

/// Tests that evaluation does not alter its input and repeats exactly.
#[test]
fn evaluation_is_deterministic() {
    let root = tree(TWO_ROUTES);
    let parsed = parse_expression(r#"routes.running.next-hop-interface=="eth1""#).unwrap();
    let first = evaluate(&parsed, &root).unwrap();
    let second = evaluate(&parsed, &root).unwrap();
    assert_eq!(first, second);
    assert_eq!(root, tree(TWO_ROUTES));
}

// ============================================================================
// SECTION: Failures
// ============================================================================

/// Tests missing keys at the root and below.
#[test]
fn missing_key_is_path_not_found() {
    let err = eval("interfaces", TWO_ROUTES).unwrap_err();
    assert_eq!(
        err,
        EvalError::PathNotFound {
            segment: "interfaces".to_string(),
            path: "interfaces".to_string(),
        }
    );

    let err = eval("routes.config", TWO_ROUTES).unwrap_err();
    assert_eq!(
        err,
        EvalError::PathNotFound {
            segment: "config".to_string(),
            path: "routes.config".to_string(),
        }
    );
}

/// Tests that an element missing the filtered field fails the capture.
#[test]
fn element_without_filter_field_is_path_not_found() {
    let err = eval(r#"interfaces.mtu=="1500""#, INTERFACES).unwrap_err();
    assert_eq!(
        err,
        EvalError::PathNotFound {
            segment: "mtu".to_string(),
            path: r#"interfaces.mtu=="1500""#.to_string(),
        }
    );
}

/// Tests that a missing key inside a kept element is reported.
#[test]
fn missing_key_inside_kept_element_is_path_not_found() {
    let err = eval(r#"interfaces.name=="br1".ipv4.address"#, INTERFACES).unwrap_err();
    assert_eq!(
        err,
        EvalError::PathNotFound {
            segment: "address".to_string(),
            path: r#"interfaces.name=="br1".ipv4.address"#.to_string(),
        }
    );
}

/// Tests a plain segment applied to a sequence or scalar.
#[test]
fn plain_segment_on_non_mapping_is_type_mismatch() {
    let err = eval("routes.running.destination", TWO_ROUTES).unwrap_err();
    assert_eq!(
        err,
        EvalError::TypeMismatch {
            segment: "destination".to_string(),
            path: "routes.running.destination".to_string(),
            expected: NodeKind::Mapping,
            found: NodeKind::Sequence,
        }
    );

    let err = eval("routes.running", "routes: 5\n").unwrap_err();
    assert!(
        matches!(
            err,
            EvalError::TypeMismatch {
                expected: NodeKind::Mapping,
                found: NodeKind::Scalar,
                ..
            }
        ),
        "unexpected error: {err:?}"
    );
}

/// Tests a filter applied to something other than a sequence.
#[test]
fn filter_on_non_sequence_is_type_mismatch() {
    let err = eval(r#"routes.running.destination=="x""#, "routes:\n  running:\n    a: 1\n")
        .unwrap_err();
    assert_eq!(
        err,
        EvalError::TypeMismatch {
            segment: "destination".to_string(),
            path: r#"routes.running.destination=="x""#.to_string(),
            expected: NodeKind::Sequence,
            found: NodeKind::Mapping,
        }
    );
}

/// Tests sequence elements that are not mappings.
#[test]
fn filter_over_scalar_elements_is_type_mismatch() {
    let err = eval(r#"items.id=="1""#, "items: [1, 2]\n").unwrap_err();
    assert!(
        matches!(
            err,
            EvalError::TypeMismatch {
                expected: NodeKind::Mapping,
                found: NodeKind::Scalar,
                ..
            }
        ),
        "unexpected error: {err:?}"
    );
}

/// Tests a filter compared against a collection-valued field.
#[test]
fn filter_on_collection_field_is_type_mismatch() {
    let err = eval(r#"interfaces.ipv4=="x""#, INTERFACES).unwrap_err();
    assert_eq!(
        err,
        EvalError::TypeMismatch {
            segment: "ipv4".to_string(),
            path: r#"interfaces.ipv4=="x""#.to_string(),
            expected: NodeKind::Scalar,
            found: NodeKind::Mapping,
        }
    );
}
