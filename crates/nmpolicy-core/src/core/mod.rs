// crates/nmpolicy-core/src/core/mod.rs
// ============================================================================
// Module: nmpolicy Core Types
// Description: Canonical policy, cache, and document structures.
// Purpose: Provide stable, serializable types for the capture engine.
// Dependencies: serde, serde_yaml, time
// ============================================================================

//! ## Overview
//! Core types define the tree model that state documents are read into and
//! the value types callers exchange with the engine: policy specs, cached
//! captures, and generated state.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod identifiers;
pub mod state;
pub mod time;
pub mod tree;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use identifiers::CaptureName;
pub use state::CachedState;
pub use state::CaptureState;
pub use state::GeneratedState;
pub use state::MetaInfo;
pub use state::POLICY_VERSION;
pub use state::PolicySpec;
pub use state::StateDocument;
pub use self::time::Timestamp;
pub use tree::DocumentError;
pub use tree::Node;
pub use tree::NodeKind;
pub use tree::Scalar;
pub use tree::ScalarKind;
