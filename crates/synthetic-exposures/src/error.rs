//! Error types for the synthetic-exposures crate.
//!
//! Configuration problems are the only failure mode of generation: once a
//! [`GenerationConfig`](crate::GenerationConfig) has been validated, record
//! synthesis is pure arithmetic over a seeded RNG and cannot fail.

use thiserror::Error;

use crate::config::MAX_RETENTION_DAYS;

/// Errors raised when a region code cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegionCodeError {
    /// The value is not a two-letter ASCII country code.
    #[error("invalid region code '{value}': expected two ASCII letters")]
    Invalid {
        /// The rejected input.
        value: String,
    },
}

/// Errors raised while validating generation configuration.
///
/// These are surfaced before any query or save call is attempted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The records-per-hour target must be at least one.
    #[error("exposures per hour must be positive, found {value}")]
    NonPositiveTarget {
        /// The rejected target.
        value: i64,
    },

    /// The records-per-hour target does not fit the supported range.
    #[error("exposures per hour {value} exceeds maximum of {max}", max = u32::MAX)]
    TargetTooLarge {
        /// The rejected target.
        value: i64,
    },

    /// Retention must not be negative.
    #[error("retention days must not be negative, found {value}")]
    NegativeRetention {
        /// The rejected retention.
        value: i64,
    },

    /// Retention is too large to plan hour buckets for.
    #[error("retention days {value} exceeds maximum of {max}", max = MAX_RETENTION_DAYS)]
    RetentionTooLarge {
        /// The rejected retention.
        value: i64,
    },

    /// At least one supported region is required.
    #[error("supported region list must not be empty")]
    NoSupportedRegions,

    /// A configured region code is malformed.
    #[error("supported region list is invalid: {0}")]
    InvalidRegion(#[from] RegionCodeError),

    /// An attribute range has its bounds inverted.
    #[error("invalid range for {attribute}: min {min} is greater than max {max}")]
    InvalidAttributeRange {
        /// Name of the attribute the range applies to.
        attribute: &'static str,
        /// Configured lower bound.
        min: i32,
        /// Configured upper bound.
        max: i32,
    },
}
