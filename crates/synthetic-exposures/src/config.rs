//! Generation configuration and its validation.
//!
//! Raw values arrive as [`GenerationParameters`], typically from settings
//! loaded by the calling service. [`GenerationConfig::from_parameters`]
//! checks every value before any collaborator is contacted, so a generation
//! run with a config in hand can only fail in its I/O.

use std::collections::HashSet;
use std::ops::RangeInclusive;

use crate::error::ConfigError;
use crate::region::RegionCode;

/// Largest accepted retention window, in days.
pub const MAX_RETENTION_DAYS: i64 = 3_650;

/// Default transmission risk level range.
pub const DEFAULT_TRANSMISSION_RISK_LEVEL: AttributeRange = AttributeRange::new(1, 8);

/// Default days-since-onset-of-symptoms range.
pub const DEFAULT_DAYS_SINCE_ONSET_OF_SYMPTOMS: AttributeRange = AttributeRange::new(-14, 14);

/// Inclusive bounds for a synthesised scalar attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeRange {
    min: i32,
    max: i32,
}

impl AttributeRange {
    /// Creates a range; bounds are checked during config validation.
    #[must_use]
    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    /// Returns the lower bound.
    #[must_use]
    pub const fn min(self) -> i32 {
        self.min
    }

    /// Returns the upper bound.
    #[must_use]
    pub const fn max(self) -> i32 {
        self.max
    }

    /// Returns the range for sampling.
    #[must_use]
    pub const fn as_inclusive(self) -> RangeInclusive<i32> {
        self.min..=self.max
    }

    fn validate(self, attribute: &'static str) -> Result<Self, ConfigError> {
        if self.min > self.max {
            return Err(ConfigError::InvalidAttributeRange {
                attribute,
                min: self.min,
                max: self.max,
            });
        }
        Ok(self)
    }
}

/// Unvalidated generation parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationParameters {
    /// Target records per hour bucket and region.
    pub exposures_per_hour: i64,
    /// RNG seed.
    pub seed: u64,
    /// Retention window in days.
    pub retention_days: i64,
    /// Regions to generate records for, in generation order.
    pub supported_regions: Vec<RegionCode>,
    /// Valid transmission risk levels.
    pub transmission_risk_level: AttributeRange,
    /// Valid days-since-onset-of-symptoms values.
    pub days_since_onset_of_symptoms: AttributeRange,
}

/// The records-per-hour target of one region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionTarget {
    /// Region the target applies to.
    pub region: RegionCode,
    /// Required records per hour bucket.
    pub exposures_per_hour: u32,
}

/// Validated generation configuration.
///
/// # Example
///
/// ```
/// use synthetic_exposures::{
///     DEFAULT_DAYS_SINCE_ONSET_OF_SYMPTOMS, DEFAULT_TRANSMISSION_RISK_LEVEL, GenerationConfig,
///     GenerationParameters, RegionCode,
/// };
///
/// let config = GenerationConfig::from_parameters(GenerationParameters {
///     exposures_per_hour: 2,
///     seed: 0,
///     retention_days: 1,
///     supported_regions: vec![RegionCode::new("DE").expect("valid region")],
///     transmission_risk_level: DEFAULT_TRANSMISSION_RISK_LEVEL,
///     days_since_onset_of_symptoms: DEFAULT_DAYS_SINCE_ONSET_OF_SYMPTOMS,
/// })
/// .expect("valid config");
///
/// assert_eq!(config.exposures_per_hour(), 2);
/// assert_eq!(config.region_targets().count(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationConfig {
    exposures_per_hour: u32,
    seed: u64,
    retention_days: u32,
    supported_regions: Vec<RegionCode>,
    transmission_risk_level: AttributeRange,
    days_since_onset_of_symptoms: AttributeRange,
}

impl GenerationConfig {
    /// Validates raw parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if:
    /// - the target is zero, negative, or wider than `u32`
    /// - retention is negative or above [`MAX_RETENTION_DAYS`]
    /// - no region is supported
    /// - an attribute range has `min > max`
    ///
    /// Repeated regions are dropped, keeping the first occurrence, so each
    /// region gets exactly one target.
    pub fn from_parameters(parameters: GenerationParameters) -> Result<Self, ConfigError> {
        let target = parameters.exposures_per_hour;
        if target <= 0 {
            return Err(ConfigError::NonPositiveTarget { value: target });
        }
        let exposures_per_hour =
            u32::try_from(target).map_err(|_| ConfigError::TargetTooLarge { value: target })?;

        let retention_days = validate_retention(parameters.retention_days)?;

        if parameters.supported_regions.is_empty() {
            return Err(ConfigError::NoSupportedRegions);
        }

        let transmission_risk_level = parameters
            .transmission_risk_level
            .validate("transmission_risk_level")?;
        let days_since_onset_of_symptoms = parameters
            .days_since_onset_of_symptoms
            .validate("days_since_onset_of_symptoms")?;

        Ok(Self {
            exposures_per_hour,
            seed: parameters.seed,
            retention_days,
            supported_regions: dedup_regions(parameters.supported_regions),
            transmission_risk_level,
            days_since_onset_of_symptoms,
        })
    }

    /// Returns the records-per-hour target.
    #[must_use]
    pub const fn exposures_per_hour(&self) -> u32 {
        self.exposures_per_hour
    }

    /// Returns the RNG seed.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns the retention window in days.
    #[must_use]
    pub const fn retention_days(&self) -> u32 {
        self.retention_days
    }

    /// Returns the supported regions in configuration order.
    #[must_use]
    pub fn supported_regions(&self) -> &[RegionCode] {
        &self.supported_regions
    }

    /// Returns the transmission risk level range.
    #[must_use]
    pub const fn transmission_risk_level(&self) -> AttributeRange {
        self.transmission_risk_level
    }

    /// Returns the days-since-onset-of-symptoms range.
    #[must_use]
    pub const fn days_since_onset_of_symptoms(&self) -> AttributeRange {
        self.days_since_onset_of_symptoms
    }

    /// Returns one target per supported region, in configuration order.
    pub fn region_targets(&self) -> impl Iterator<Item = RegionTarget> + '_ {
        self.supported_regions.iter().map(|&region| RegionTarget {
            region,
            exposures_per_hour: self.exposures_per_hour,
        })
    }
}

fn dedup_regions(regions: Vec<RegionCode>) -> Vec<RegionCode> {
    let mut seen = HashSet::with_capacity(regions.len());
    regions.into_iter().filter(|region| seen.insert(*region)).collect()
}

/// Checks a retention value and narrows it to `u32`.
pub(crate) fn validate_retention(retention_days: i64) -> Result<u32, ConfigError> {
    if retention_days < 0 {
        return Err(ConfigError::NegativeRetention {
            value: retention_days,
        });
    }
    if retention_days > MAX_RETENTION_DAYS {
        return Err(ConfigError::RetentionTooLarge {
            value: retention_days,
        });
    }
    u32::try_from(retention_days).map_err(|_| ConfigError::RetentionTooLarge {
        value: retention_days,
    })
}
