// crates/nmpolicy-core/src/lib.rs
// ============================================================================
// Module: nmpolicy Core Library
// Description: Public API surface for the capture resolution engine.
// Purpose: Expose core types, the expression language, and the runtime.
// Dependencies: crate::{core, expression, interfaces, runtime}
// ============================================================================

//! ## Overview
//! nmpolicy resolves a declarative network policy into a concrete desired
//! state for one host. Named capture expressions are evaluated against the
//! host's current state, cached across invocations, and substituted into a
//! desired-state template. The engine performs no file, network, or process
//! I/O; callers supply every input as an in-memory value.
//!
//! ```
//! use nmpolicy_core::CachedState;
//! use nmpolicy_core::PolicySpec;
//! use nmpolicy_core::StateDocument;
//! use nmpolicy_core::generate_state;
//!
//! let current = StateDocument::from("routes:\n  running:\n  - destination: 0.0.0.0/0\n");
//! let spec = PolicySpec::new()
//!     .with_capture("gw", r#"routes.running.destination=="0.0.0.0/0""#);
//! let generated = generate_state(&spec, &current, &CachedState::empty()).unwrap();
//! assert!(generated.cache.get("gw").is_some());
//! ```

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod expression;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use self::core::*;

pub use expression::CaptureExpression;
pub use expression::ParseError;
pub use expression::ParseErrorKind;
pub use expression::parse_expression;
pub use interfaces::Clock;
pub use interfaces::FixedClock;
pub use interfaces::SystemClock;
pub use runtime::CaptureResolution;
pub use runtime::CaptureResolver;
pub use runtime::EvalError;
pub use runtime::GenerateError;
pub use runtime::GeneratorConfig;
pub use runtime::StateGenerator;
pub use runtime::evaluate;
pub use runtime::generate_state;
