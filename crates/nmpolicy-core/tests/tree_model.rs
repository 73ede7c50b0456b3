// crates/nmpolicy-core/tests/tree_model.rs
// ============================================================================
// Module: Tree Model Tests
// Description: Conversion between YAML bytes and typed document trees.
// Purpose: Validate scalar canonicalization, key handling, and serialization.
// Dependencies: nmpolicy-core
// ============================================================================

//! ## Overview
//! Tests the tree model for:
//! - Scalar kinds and canonical text
//! - Mapping key canonicalization and rejection of collection keys
//! - Empty documents and type-preserving serialization

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

use nmpolicy_core::DocumentError;
use nmpolicy_core::Node;
use nmpolicy_core::NodeKind;
use nmpolicy_core::Scalar;
use nmpolicy_core::ScalarKind;

use crate::common::TWO_ROUTES;
use crate::common::tree;

// ============================================================================
// SECTION: Parsing
// ============================================================================

/// Tests that scalars keep their kind next to canonical text.
#[test]
fn scalars_keep_kind_and_canonical_text() {
    let root = tree("a: 254\nb: true\nc: 1.5\nd: text\ne: ~\nf: '254'\n");

    let check = |key: &str, kind: ScalarKind, text: &str| {
        let scalar = root.get(key).and_then(Node::as_scalar).unwrap();
        assert_eq!(scalar.kind(), kind, "kind of {key}");
        assert_eq!(scalar.canonical_text(), text, "text of {key}");
    };
    check("a", ScalarKind::Integer, "254");
    check("b", ScalarKind::Bool, "true");
    check("c", ScalarKind::Float, "1.5");
    check("d", ScalarKind::String, "text");
    check("e", ScalarKind::Null, "null");
    check("f", ScalarKind::String, "254");
}

/// Tests the integer constructors across the full signed and unsigned range.
#[test]
fn integer_scalars_cover_signed_and_unsigned_range() {
    let negative = Scalar::integer(i64::MIN);
    assert_eq!(negative.kind(), ScalarKind::Integer);
    assert_eq!(negative.canonical_text(), "-9223372036854775808");

    let large = Scalar::unsigned(u64::MAX);
    assert_eq!(large.kind(), ScalarKind::Integer);
    assert_eq!(large.canonical_text(), "18446744073709551615");

    let root = tree("low: -9223372036854775808
high: 18446744073709551615
");
    assert_eq!(root.get("low"), Some(&Node::Scalar(negative.clone())));
    assert_eq!(root.get("high"), Some(&Node::Scalar(large.clone())));

    let node = Node::mapping([("high", Node::Scalar(large)), ("low", Node::Scalar(negative))]);
    let text = String::from_utf8(node.to_yaml_bytes().unwrap()).unwrap();
    assert_eq!(text, "high: 18446744073709551615\nlow: -9223372036854775808\n");
}

/// Tests that nested documents become mappings and sequences.
#[test]
fn nested_document_shapes() {
    let root = tree(TWO_ROUTES);
    let running = root.get("routes").and_then(|routes| routes.get("running")).unwrap();
    assert_eq!(running.kind(), NodeKind::Sequence);
    assert_eq!(running.as_sequence().unwrap().len(), 2);
}

/// Tests that whitespace-only input is an empty mapping.
#[test]
fn blank_document_is_empty_mapping() {
    assert_eq!(Node::from_yaml_slice(b"").unwrap(), Node::empty_mapping());
    assert_eq!(Node::from_yaml_slice(b"  \n\t\n").unwrap(), Node::empty_mapping());
}

/// Tests that non-string scalar keys are stored by canonical text.
#[test]
fn scalar_keys_are_canonicalized() {
    let root = tree("1: one\ntrue: yes-value\n");
    assert_eq!(root.get("1"), Some(&Node::string("one")));
    assert_eq!(root.get("true"), Some(&Node::string("yes-value")));
}

/// Tests that collection keys are rejected.
#[test]
fn collection_keys_are_rejected() {
    let err = Node::from_yaml_slice(b"? [a, b]\n: value\n").unwrap_err();
    assert_eq!(
        err,
        DocumentError::UnsupportedKey {
            found: NodeKind::Sequence
        }
    );
}

/// Tests that keys colliding after canonicalization are rejected.
#[test]
fn colliding_keys_are_rejected() {
    let err = Node::from_yaml_slice(b"1: a\n'1': b\n").unwrap_err();
    assert_eq!(
        err,
        DocumentError::DuplicateKey {
            key: "1".to_string()
        }
    );
}

/// Tests that malformed YAML is a parse error.
#[test]
fn malformed_yaml_is_parse_error() {
    let err = Node::from_yaml_slice(b"key: [unterminated\n").unwrap_err();
    assert!(matches!(err, DocumentError::Parse(_)), "unexpected error: {err:?}");
}

/// Tests that tagged values are read through their inner value.
#[test]
fn tagged_values_are_unwrapped() {
    let root = tree("iface: !custom\n  name: eth1\n");
    let name = root.get("iface").and_then(|iface| iface.get("name"));
    assert_eq!(name, Some(&Node::string("eth1")));
}

// ============================================================================
// SECTION: Serialization
// ============================================================================

/// Tests that serialization preserves scalar types.
#[test]
fn serialization_preserves_scalar_types() {
    let root = tree("table-id: 254\nenabled: false\nname: '254'\nmetric: 0.5\nnothing: null\n");
    let text = String::from_utf8(root.to_yaml_bytes().unwrap()).unwrap();

    assert!(text.contains("table-id: 254\n"), "{text}");
    assert!(text.contains("enabled: false\n"), "{text}");
    assert!(text.contains("name: '254'\n"), "{text}");
    assert!(text.contains("metric: 0.5\n"), "{text}");
    assert!(text.contains("nothing: null\n"), "{text}");
}

/// Tests that serialized mappings are key-ordered.
#[test]
fn serialization_orders_keys() {
    let root = tree("zeta: 1\nalpha: 2\nmid: 3\n");
    let text = String::from_utf8(root.to_yaml_bytes().unwrap()).unwrap();
    assert_eq!(text, "alpha: 2\nmid: 3\nzeta: 1\n");
}

/// Tests that a serialized tree reads back to the same tree.
#[test]
fn serialized_tree_reads_back() {
    let root = tree(TWO_ROUTES);
    let reread = Node::from_yaml_slice(&root.to_yaml_bytes().unwrap()).unwrap();
    assert_eq!(reread, root);
}

/// Tests that JSON input is accepted.
#[test]
fn json_documents_are_accepted() {
    let root = tree(r#"{"routes": {"running": [{"destination": "0.0.0.0/0"}]}}"#);
    assert_eq!(root, tree("routes:\n  running:\n  - destination: 0.0.0.0/0\n"));
}
