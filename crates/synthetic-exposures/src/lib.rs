//! Deterministic synthetic exposure records for exercising distribution
//! pipelines.
//!
//! This crate computes which anonymised exposure records are missing from a
//! store and synthesises exactly those. It performs no I/O: callers fetch the
//! existing records, read the clock once, and persist whatever comes back.
//!
//! # Overview
//!
//! - [`plan_buckets`] lays out the hour buckets of a retention window.
//! - [`group_by_bucket`] and [`compute_deficits`] find each bucket's
//!   shortfall against the hourly target.
//! - [`generate_missing_exposures`] synthesises the shortfall from a seeded
//!   RNG, so identical inputs produce identical records.
//!
//! # Example
//!
//! ```
//! use std::collections::HashMap;
//!
//! use chrono::{TimeZone, Utc};
//! use synthetic_exposures::{
//!     DEFAULT_DAYS_SINCE_ONSET_OF_SYMPTOMS, DEFAULT_TRANSMISSION_RISK_LEVEL, GenerationConfig,
//!     GenerationParameters, SubmissionHour, generate_missing_exposures, parse_region_list,
//! };
//!
//! let config = GenerationConfig::from_parameters(GenerationParameters {
//!     exposures_per_hour: 3,
//!     seed: 42,
//!     retention_days: 0,
//!     supported_regions: parse_region_list("DE,FR").expect("valid regions"),
//!     transmission_risk_level: DEFAULT_TRANSMISSION_RISK_LEVEL,
//!     days_since_onset_of_symptoms: DEFAULT_DAYS_SINCE_ONSET_OF_SYMPTOMS,
//! })
//! .expect("valid config");
//! let now = Utc.with_ymd_and_hms(2020, 7, 15, 12, 0, 0).single().expect("valid time");
//!
//! let records = generate_missing_exposures(&config, &HashMap::new(), now).expect("generated");
//!
//! assert_eq!(records.len(), 6);
//! assert!(records.iter().all(|r| r.submission_timestamp == SubmissionHour::new(443_004)));
//! ```

mod bucket;
mod config;
mod error;
mod generator;
mod record;
mod region;
mod synthesis;

pub use bucket::{BucketDeficit, HourBucket, compute_deficits, group_by_bucket, plan_buckets};
pub use config::{
    AttributeRange, DEFAULT_DAYS_SINCE_ONSET_OF_SYMPTOMS, DEFAULT_TRANSMISSION_RISK_LEVEL,
    GenerationConfig, GenerationParameters, MAX_RETENTION_DAYS, RegionTarget,
};
pub use error::{ConfigError, RegionCodeError};
pub use generator::generate_missing_exposures;
pub use record::{
    ExposureRecord, INTERVALS_PER_DAY, KEY_LENGTH, KeyMaterial, ReportType, SubmissionHour,
};
pub use region::{RegionCode, parse_region_list};
