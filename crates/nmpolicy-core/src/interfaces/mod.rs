// crates/nmpolicy-core/src/interfaces/mod.rs
// ============================================================================
// Module: nmpolicy Interfaces
// Description: Backend-agnostic seams used by the generation runtime.
// Purpose: Keep wall-clock access out of the engine's evaluation logic.
// Dependencies: crate::core, time
// ============================================================================

//! ## Overview
//! The only external interaction of a generation call is reading the current
//! time, once, to fix its generation stamp. That read goes through [`Clock`]
//! so hosts and tests can supply their own source.

// ============================================================================
// SECTION: Imports
// ============================================================================

use time::OffsetDateTime;

use crate::core::time::Timestamp;

// ============================================================================
// SECTION: Clock
// ============================================================================

/// Source of generation stamps.
pub trait Clock {
    /// Returns the current instant.
    fn now(&self) -> Timestamp;
}

/// Wall-clock UTC time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::new(OffsetDateTime::now_utc())
    }
}

/// Clock that always returns the same instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub Timestamp);

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}
