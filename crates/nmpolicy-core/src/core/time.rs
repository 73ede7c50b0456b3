// crates/nmpolicy-core/src/core/time.rs
// ============================================================================
// Module: nmpolicy Time Model
// Description: Canonical timestamp representation for generated metadata.
// Purpose: Provide an ordered, serializable instant for generation stamps.
// Dependencies: serde, time
// ============================================================================

//! ## Overview
//! Every generated state and every freshly resolved capture carries a
//! [`Timestamp`]. The engine never reads wall-clock time here; values come
//! from a [`Clock`](crate::interfaces::Clock) read once per invocation.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

// ============================================================================
// SECTION: Time Values
// ============================================================================

/// UTC instant recorded in [`MetaInfo`](crate::core::MetaInfo).
///
/// # Invariants
/// - Values are supplied by callers or a clock; no validation is performed.
/// - The default value is the unix epoch and stands for "not set".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(#[serde(with = "time::serde::rfc3339")] OffsetDateTime);

impl Timestamp {
    /// The unix epoch, used as the unset value.
    pub const UNSET: Self = Self(OffsetDateTime::UNIX_EPOCH);

    /// Wraps an existing instant, normalizing it to UTC.
    #[must_use]
    pub fn new(instant: OffsetDateTime) -> Self {
        Self(instant.to_offset(time::UtcOffset::UTC))
    }

    /// Builds a timestamp from unix nanoseconds.
    ///
    /// # Errors
    ///
    /// Returns [`time::error::ComponentRange`] when the value is out of range.
    pub fn from_unix_nanos(nanos: i128) -> Result<Self, time::error::ComponentRange> {
        OffsetDateTime::from_unix_timestamp_nanos(nanos).map(Self)
    }

    /// Returns the wrapped instant.
    #[must_use]
    pub const fn as_offset_date_time(&self) -> OffsetDateTime {
        self.0
    }

    /// Returns the timestamp as unix nanoseconds.
    #[must_use]
    pub const fn unix_nanos(&self) -> i128 {
        self.0.unix_timestamp_nanos()
    }

    /// Returns true when the timestamp still holds the unset value.
    #[must_use]
    pub fn is_unset(&self) -> bool {
        *self == Self::UNSET
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::UNSET
    }
}

impl From<OffsetDateTime> for Timestamp {
    fn from(value: OffsetDateTime) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.format(&Rfc3339) {
            Ok(text) => f.write_str(&text),
            Err(_) => write!(f, "{}ns", self.0.unix_timestamp_nanos()),
        }
    }
}
