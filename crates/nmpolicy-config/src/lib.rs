// crates/nmpolicy-config/src/lib.rs
// ============================================================================
// Module: nmpolicy Config Library
// Description: Engine configuration model and on-disk input loaders.
// Purpose: Single source of truth for nmpolicy.toml and input file handling.
// Dependencies: nmpolicy-core, serde, serde_yaml, toml
// ============================================================================

//! ## Overview
//! `nmpolicy-config` owns everything that touches the filesystem on behalf of
//! the engine: the `nmpolicy.toml` configuration (limits and logging) and the
//! loaders that read policy, current-state, and cache files into the core's
//! in-memory types. Both reject oversized or malformed input before the
//! engine sees it.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod loader;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
pub use loader::LoadError;
pub use loader::load_cache;
pub use loader::load_policy;
pub use loader::load_state;
