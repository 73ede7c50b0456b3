// crates/nmpolicy-core/tests/common/mod.rs
// ============================================================================
// Module: Test Support
// Description: Shared fixtures for nmpolicy-core integration tests.
// ============================================================================
//! ## Overview
//! Sample state documents and clock helpers used across test modules.

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
    dead_code,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use nmpolicy_core::FixedClock;
use nmpolicy_core::Node;
use nmpolicy_core::StateDocument;
use nmpolicy_core::Timestamp;

/// Current state with two routes, one of them the default route.
pub const TWO_ROUTES: &str = "\
routes:
  running:
  - destination: 0.0.0.0/0
    next-hop-address: 192.168.100.1
    next-hop-interface: eth1
    table-id: 254
  - destination: 1.1.1.0/24
    next-hop-address: 192.168.100.1
    next-hop-interface: eth1
    table-id: 254
";

/// The default route of [`TWO_ROUTES`], nested under `routes.running`.
pub const DEFAULT_ROUTE_ONLY: &str = "\
routes:
  running:
  - destination: 0.0.0.0/0
    next-hop-address: 192.168.100.1
    next-hop-interface: eth1
    table-id: 254
";

/// Current state with interfaces and nested addresses.
pub const INTERFACES: &str = "\
interfaces:
- name: eth1
  type: ethernet
  state: up
  ipv4:
    enabled: true
    address:
    - ip: 10.0.0.1
      prefix-length: 24
- name: br1
  type: linux-bridge
  state: up
  ipv4:
    enabled: false
";

/// Parses a YAML fixture.
pub fn tree(yaml: &str) -> Node {
    Node::from_yaml_slice(yaml.as_bytes()).unwrap()
}

/// Wraps a YAML fixture as raw state bytes.
pub fn document(yaml: &str) -> StateDocument {
    StateDocument::from(yaml)
}

/// Timestamp at the given unix second.
pub fn at_second(second: i64) -> Timestamp {
    Timestamp::from_unix_nanos(i128::from(second) * 1_000_000_000).unwrap()
}

/// Clock frozen at the given unix second.
pub fn clock_at(second: i64) -> FixedClock {
    FixedClock(at_second(second))
}

/// Normalizes a YAML document so formatting differences do not matter.
pub fn normalized(bytes: &[u8]) -> Node {
    Node::from_yaml_slice(bytes).unwrap()
}
