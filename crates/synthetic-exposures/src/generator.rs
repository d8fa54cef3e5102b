//! Deficit-driven generation of missing exposure records.
//!
//! The generator compares what already exists per (hour bucket, region)
//! against the hourly target and synthesises only the shortfall. Running it
//! twice against the same data, seed, and `now` yields identical output, and
//! running it against data that already meets the target yields nothing.

use std::collections::{HashMap, HashSet};
use std::hash::BuildHasher;

use chrono::{DateTime, Utc};

use crate::bucket::{HourBucket, compute_deficits, group_by_bucket, plan_buckets};
use crate::config::GenerationConfig;
use crate::error::ConfigError;
use crate::record::{ExposureRecord, KeyMaterial};
use crate::region::RegionCode;
use crate::synthesis::RecordSynthesizer;

/// Generates the records missing from the retention window.
///
/// For every supported region (in configuration order) and every planned hour
/// bucket (oldest first), `max(0, target - existing)` new records are
/// synthesised, each stamped with the bucket's start hour and visible only in
/// the owning region. Entries of `existing_by_region` for unsupported regions
/// are ignored, as are existing records outside the retention window.
///
/// `now` is read once by the caller and fixes the bucket boundaries for the
/// whole computation.
///
/// # Errors
///
/// Returns [`ConfigError`] only if the retention window cannot be planned,
/// which a validated [`GenerationConfig`] rules out in practice.
///
/// # Example
///
/// ```
/// use std::collections::HashMap;
///
/// use chrono::{TimeZone, Utc};
/// use synthetic_exposures::{
///     DEFAULT_DAYS_SINCE_ONSET_OF_SYMPTOMS, DEFAULT_TRANSMISSION_RISK_LEVEL, GenerationConfig,
///     GenerationParameters, RegionCode, generate_missing_exposures,
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
/// let now = Utc.with_ymd_and_hms(2020, 7, 15, 12, 0, 0).single().expect("valid time");
///
/// let records = generate_missing_exposures(&config, &HashMap::new(), now).expect("generated");
///
/// // 25 hour buckets, two records each.
/// assert_eq!(records.len(), 50);
/// let again = generate_missing_exposures(&config, &HashMap::new(), now).expect("generated");
/// assert_eq!(records, again);
/// ```
pub fn generate_missing_exposures<S: BuildHasher>(
    config: &GenerationConfig,
    existing_by_region: &HashMap<RegionCode, Vec<ExposureRecord>, S>,
    now: DateTime<Utc>,
) -> Result<Vec<ExposureRecord>, ConfigError> {
    let buckets = plan_buckets(now, i64::from(config.retention_days()))?;
    let taken_keys = existing_keys(config.supported_regions(), existing_by_region);
    let mut synthesizer = RecordSynthesizer::new(config, taken_keys);
    let mut generated = Vec::new();

    for target in config.region_targets() {
        let existing = existing_by_region
            .get(&target.region)
            .map_or(&[][..], Vec::as_slice);
        let counts = count_by_bucket(existing);

        for deficit in compute_deficits(&buckets, &counts, target.exposures_per_hour) {
            for _ in 0..deficit.missing {
                generated.push(synthesizer.synthesize(target.region, deficit.bucket));
            }
        }
    }

    Ok(generated)
}

fn count_by_bucket(records: &[ExposureRecord]) -> HashMap<HourBucket, usize> {
    group_by_bucket(records)
        .into_iter()
        .map(|(bucket, members)| (bucket, members.len()))
        .collect()
}

fn existing_keys<S: BuildHasher>(
    regions: &[RegionCode],
    existing_by_region: &HashMap<RegionCode, Vec<ExposureRecord>, S>,
) -> HashSet<KeyMaterial> {
    regions
        .iter()
        .filter_map(|region| existing_by_region.get(region))
        .flatten()
        .map(|record| record.key_data)
        .collect()
}
