//! Test data configuration loaded via OrthoConfig.

use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use synthetic_exposures::{
    AttributeRange, ConfigError, DEFAULT_DAYS_SINCE_ONSET_OF_SYMPTOMS,
    DEFAULT_TRANSMISSION_RISK_LEVEL, GenerationConfig, GenerationParameters, parse_region_list,
};

const DEFAULT_EXPOSURES_PER_HOUR: i64 = 2;
const DEFAULT_RETENTION_DAYS: i64 = 14;
const DEFAULT_SUPPORTED_REGIONS: &str = "DE";
const DEFAULT_STORE_PATH: &str = "exposures.json";

/// Configuration values controlling test data generation.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "TEST_DATA")]
pub struct TestDataSettings {
    /// Enable test data generation.
    #[ortho_config(default = false)]
    pub enabled: bool,
    /// Target number of records per region per hour.
    pub exposures_per_hour: Option<i64>,
    /// Seed for the generator's random stream.
    pub seed: Option<u64>,
    /// Number of past days kept in the store.
    pub retention_days: Option<i64>,
    /// Comma-separated supported region codes.
    pub supported_regions: Option<String>,
    /// Location of the JSON store file.
    pub store_path: Option<PathBuf>,
    /// Lowest transmission risk level generated.
    pub transmission_risk_min: Option<i32>,
    /// Highest transmission risk level generated.
    pub transmission_risk_max: Option<i32>,
    /// Lowest days-since-onset value generated.
    pub days_since_onset_min: Option<i32>,
    /// Highest days-since-onset value generated.
    pub days_since_onset_max: Option<i32>,
}

impl TestDataSettings {
    /// Whether generation should run.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Return the hourly target, falling back to the default.
    #[must_use]
    pub fn exposures_per_hour(&self) -> i64 {
        self.exposures_per_hour
            .unwrap_or(DEFAULT_EXPOSURES_PER_HOUR)
    }

    /// Return the RNG seed, falling back to zero.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed.unwrap_or_default()
    }

    /// Return the retention window in days, falling back to the default.
    #[must_use]
    pub fn retention_days(&self) -> i64 {
        self.retention_days.unwrap_or(DEFAULT_RETENTION_DAYS)
    }

    /// Return the raw supported region list, falling back to the default.
    #[must_use]
    pub fn supported_regions(&self) -> &str {
        self.supported_regions
            .as_deref()
            .unwrap_or(DEFAULT_SUPPORTED_REGIONS)
    }

    /// Return the store path, falling back to the default.
    #[must_use]
    pub fn store_path(&self) -> PathBuf {
        self.store_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_PATH))
    }

    /// Return the transmission risk range, with per-bound defaults.
    #[must_use]
    pub fn transmission_risk_level(&self) -> AttributeRange {
        AttributeRange::new(
            self.transmission_risk_min
                .unwrap_or(DEFAULT_TRANSMISSION_RISK_LEVEL.min()),
            self.transmission_risk_max
                .unwrap_or(DEFAULT_TRANSMISSION_RISK_LEVEL.max()),
        )
    }

    /// Return the days-since-onset range, with per-bound defaults.
    #[must_use]
    pub fn days_since_onset_of_symptoms(&self) -> AttributeRange {
        AttributeRange::new(
            self.days_since_onset_min
                .unwrap_or(DEFAULT_DAYS_SINCE_ONSET_OF_SYMPTOMS.min()),
            self.days_since_onset_max
                .unwrap_or(DEFAULT_DAYS_SINCE_ONSET_OF_SYMPTOMS.max()),
        )
    }

    /// Validate the settings into a generator configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a region code is malformed or any value
    /// is out of range.
    pub fn generation_config(&self) -> Result<GenerationConfig, ConfigError> {
        let supported_regions = parse_region_list(self.supported_regions())?;
        GenerationConfig::from_parameters(GenerationParameters {
            exposures_per_hour: self.exposures_per_hour(),
            seed: self.seed(),
            retention_days: self.retention_days(),
            supported_regions,
            transmission_risk_level: self.transmission_risk_level(),
            days_since_onset_of_symptoms: self.days_since_onset_of_symptoms(),
        })
    }
}
