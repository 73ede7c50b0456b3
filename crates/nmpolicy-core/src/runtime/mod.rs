// crates/nmpolicy-core/src/runtime/mod.rs
// ============================================================================
// Module: nmpolicy Runtime
// Description: Evaluation, caching, substitution, and generation.
// Purpose: Resolve capture expressions into a generated desired state.
// Dependencies: crate::{core, expression, interfaces}
// ============================================================================

//! ## Overview
//! Control flow for one call: [`StateGenerator`] → [`CaptureResolver`] (cache
//! manager) → on a miss, the expression parser and [`evaluate`] → the tree
//! model. Results converge into the generated cache and, where the template
//! references a capture, into the desired state.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod cache;
pub mod error;
pub mod evaluator;
pub mod generator;
pub mod substitution;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use cache::CaptureResolution;
pub use cache::CaptureResolver;
pub use cache::resolve_capture;
pub use error::GenerateError;
pub use evaluator::EvalError;
pub use evaluator::evaluate;
pub use generator::DEFAULT_MAX_DOCUMENT_BYTES;
pub use generator::GeneratorConfig;
pub use generator::StateGenerator;
pub use generator::generate_state;
pub use substitution::CaptureReference;
pub use substitution::find_capture_references;
pub use substitution::substitute_captures;
