// crates/nmpolicy-core/src/runtime/generator.rs
// ============================================================================
// Module: State Generator
// Description: Orchestration of capture resolution and template substitution.
// Purpose: Produce a generated state from a policy, current state, and cache.
// Dependencies: crate::{core, expression, interfaces, runtime}, tracing
// ============================================================================

//! ## Overview
//! One [`StateGenerator::generate`] call:
//! 1. reads the clock once to fix the generation stamp,
//! 2. resolves every capture through the cache manager in name order,
//!    aborting on the first failure,
//! 3. copies the desired-state template, substituting capture references,
//! 4. returns the desired state, the refreshed cache, and metadata.
//!
//! The generator holds no state between calls. Cache hits keep their stored
//! metadata; every fresh capture and the top-level metadata share the stamp.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use tracing::info;

use crate::core::CachedState;
use crate::core::GeneratedState;
use crate::core::MetaInfo;
use crate::core::PolicySpec;
use crate::core::StateDocument;
use crate::expression::ExpressionLimits;
use crate::interfaces::Clock;
use crate::interfaces::SystemClock;
use crate::runtime::cache::CaptureResolver;
use crate::runtime::error::GenerateError;
use crate::runtime::substitution::substitute_captures;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Default maximum size of the current-state and desired-state documents.
pub const DEFAULT_MAX_DOCUMENT_BYTES: usize = 16 * 1024 * 1024;

/// Limits applied by a [`StateGenerator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Capture expression parser limits.
    pub expression_limits: ExpressionLimits,
    /// Maximum size of each input document in bytes.
    pub max_document_bytes: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            expression_limits: ExpressionLimits::default(),
            max_document_bytes: DEFAULT_MAX_DOCUMENT_BYTES,
        }
    }
}

// ============================================================================
// SECTION: Generator
// ============================================================================

/// Stateless generation engine parameterized by its clock.
#[derive(Debug, Clone, Default)]
pub struct StateGenerator<C = SystemClock> {
    /// Source of the per-call generation stamp.
    clock: C,
    /// Limits applied to every call.
    config: GeneratorConfig,
}

impl StateGenerator<SystemClock> {
    /// Creates a generator that reads wall-clock time.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C: Clock> StateGenerator<C> {
    /// Creates a generator with a custom clock.
    #[must_use]
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            config: GeneratorConfig::default(),
        }
    }

    /// Replaces the generator limits.
    #[must_use]
    pub const fn with_config(mut self, config: GeneratorConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the generator limits.
    #[must_use]
    pub const fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generates the desired state and refreshed cache for one host.
    ///
    /// # Errors
    ///
    /// Returns the first [`GenerateError`] encountered; no partial state is
    /// ever returned.
    pub fn generate(
        &self,
        spec: &PolicySpec,
        current_state: &StateDocument,
        cache: &CachedState,
    ) -> Result<GeneratedState, GenerateError> {
        self.check_size("desired state", &spec.desired_state)?;

        let generation_stamp = self.clock.now();
        let mut resolver = CaptureResolver::new(current_state, cache, generation_stamp)
            .with_limits(self.config.expression_limits)
            .with_max_document_bytes(self.config.max_document_bytes);

        let mut captures = BTreeMap::new();
        let mut cache_hits = 0_usize;
        for (name, expression) in &spec.captures {
            let resolution = resolver.resolve(name, expression)?;
            if resolution.used_cache {
                cache_hits += 1;
            }
            captures.insert(name.clone(), resolution.state);
        }

        let desired_state = substitute_captures(&spec.desired_state, &captures)?;
        info!(
            captures = captures.len(),
            cache_hits,
            cache_misses = captures.len() - cache_hits,
            desired_state_bytes = desired_state.len(),
            "generated policy state"
        );

        Ok(GeneratedState {
            desired_state,
            cache: CachedState {
                captures,
            },
            meta_info: MetaInfo::generated(generation_stamp),
        })
    }

    /// Rejects documents above the configured size limit.
    fn check_size(
        &self,
        document: &'static str,
        bytes: &StateDocument,
    ) -> Result<(), GenerateError> {
        if bytes.len() > self.config.max_document_bytes {
            return Err(GenerateError::DocumentTooLarge {
                document,
                max_bytes: self.config.max_document_bytes,
                actual_bytes: bytes.len(),
            });
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// Generates state with the default limits and the system clock.
///
/// # Errors
///
/// Returns [`GenerateError`] as [`StateGenerator::generate`] does.
pub fn generate_state(
    spec: &PolicySpec,
    current_state: &StateDocument,
    cache: &CachedState,
) -> Result<GeneratedState, GenerateError> {
    StateGenerator::new().generate(spec, current_state, cache)
}
