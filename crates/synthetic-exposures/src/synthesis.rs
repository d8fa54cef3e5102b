//! Single-record synthesis from a seeded RNG.

use std::collections::HashSet;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::bucket::HourBucket;
use crate::config::GenerationConfig;
use crate::record::{
    ExposureRecord, HOURS_PER_DAY, INTERVALS_PER_DAY, KEY_LENGTH, KeyMaterial, ReportType,
    SubmissionHour,
};
use crate::region::RegionCode;

/// Builds records for one run, drawing every value from one RNG stream.
///
/// The synthesiser remembers every key it has handed out (plus any keys the
/// caller marks as taken) so key material is unique within the run.
pub(crate) struct RecordSynthesizer<'a> {
    config: &'a GenerationConfig,
    rng: ChaCha8Rng,
    taken_keys: HashSet<KeyMaterial>,
}

impl<'a> RecordSynthesizer<'a> {
    pub(crate) fn new(config: &'a GenerationConfig, taken_keys: HashSet<KeyMaterial>) -> Self {
        Self {
            config,
            rng: ChaCha8Rng::seed_from_u64(config.seed()),
            taken_keys,
        }
    }

    /// Synthesises one record owned by `region` and stamped with `bucket`.
    pub(crate) fn synthesize(&mut self, region: RegionCode, bucket: HourBucket) -> ExposureRecord {
        let submission_timestamp = bucket.start();
        let key_data = self.next_unique_key();
        let rolling_start_interval_number = self.rolling_start(submission_timestamp);
        let transmission_risk_level = self
            .rng
            .random_range(self.config.transmission_risk_level().as_inclusive());
        let days_since_onset_of_symptoms = self
            .rng
            .random_range(self.config.days_since_onset_of_symptoms().as_inclusive());
        let consent_to_federation = self.rng.random_ratio(1, 2);

        ExposureRecord {
            key_data,
            rolling_start_interval_number,
            rolling_period: INTERVALS_PER_DAY,
            transmission_risk_level,
            submission_timestamp,
            origin_country: region,
            visited_countries: vec![region],
            report_type: ReportType::ConfirmedTest,
            days_since_onset_of_symptoms,
            consent_to_federation,
        }
    }

    fn next_unique_key(&mut self) -> KeyMaterial {
        loop {
            let mut bytes = [0_u8; KEY_LENGTH];
            self.rng.fill(&mut bytes);
            let key = KeyMaterial::new(bytes);
            if self.taken_keys.insert(key) {
                return key;
            }
        }
    }

    /// Picks the midnight the key became active: the submission day or up to
    /// `retention_days` before it.
    fn rolling_start(&mut self, submission: SubmissionHour) -> u32 {
        let submission_day = submission.hours_since_epoch().div_euclid(HOURS_PER_DAY);
        let key_age_days = self
            .rng
            .random_range(0..=i64::from(self.config.retention_days()));
        let start_day = submission_day.saturating_sub(key_age_days);
        let interval = start_day.saturating_mul(i64::from(INTERVALS_PER_DAY));
        // Pre-epoch submissions clamp to interval zero.
        u32::try_from(interval.max(0)).unwrap_or(u32::MAX)
    }
}
