//! Exposure record types.
//!
//! An [`ExposureRecord`] is the unit of data the distribution pipeline
//! exports: an anonymised temporary exposure key plus the metadata needed to
//! decide which export it belongs to. Only the shape of the payload matters
//! here; key bytes are opaque.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::region::RegionCode;

/// Length in bytes of a temporary exposure key.
pub const KEY_LENGTH: usize = 16;

/// Number of ten-minute intervals in a day; also the rolling period of a key
/// that stays valid for a whole day.
pub const INTERVALS_PER_DAY: u32 = 144;

pub(crate) const SECONDS_PER_HOUR: i64 = 3_600;
pub(crate) const HOURS_PER_DAY: i64 = 24;

/// Opaque key material of a record.
///
/// Serialised as a lowercase hex string.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct KeyMaterial([u8; KEY_LENGTH]);

impl KeyMaterial {
    /// Wraps raw key bytes.
    #[must_use]
    pub const fn new(bytes: [u8; KEY_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Returns the raw key bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.0
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyMaterial({})", hex::encode(self.0))
    }
}

impl Serialize for KeyMaterial {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(self.0))
    }
}

impl<'de> Deserialize<'de> for KeyMaterial {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        let mut bytes = [0_u8; KEY_LENGTH];
        hex::decode_to_slice(&raw, &mut bytes).map_err(serde::de::Error::custom)?;
        Ok(Self(bytes))
    }
}

/// Submission time of a record, in whole hours since the Unix epoch.
///
/// `2020-07-15T11:00:00Z` is hour `443003`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SubmissionHour(i64);

impl SubmissionHour {
    /// Creates a submission hour from an hour count since the epoch.
    #[must_use]
    pub const fn new(hours_since_epoch: i64) -> Self {
        Self(hours_since_epoch)
    }

    /// Returns the hour containing `instant`, rounding towards the past.
    #[must_use]
    pub fn containing(instant: DateTime<Utc>) -> Self {
        Self(instant.timestamp().div_euclid(SECONDS_PER_HOUR))
    }

    /// Returns the hour count since the epoch.
    #[must_use]
    pub const fn hours_since_epoch(self) -> i64 {
        self.0
    }
}

impl fmt::Display for SubmissionHour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How the diagnosis behind a key was established.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportType {
    /// Positive laboratory test.
    #[default]
    ConfirmedTest,
    /// Clinical diagnosis without a test.
    ConfirmedClinicalDiagnosis,
    /// Self-reported by the user.
    SelfReport,
    /// Reported through a contact chain.
    Recursive,
}

/// A single anonymised exposure record.
///
/// Records are write-once: the generator builds them, the store persists
/// them, and nothing mutates them in between.
///
/// # Example
///
/// ```
/// use synthetic_exposures::{
///     ExposureRecord, INTERVALS_PER_DAY, KeyMaterial, RegionCode, ReportType, SubmissionHour,
/// };
///
/// let de = RegionCode::new("DE").expect("valid region");
/// let record = ExposureRecord {
///     key_data: KeyMaterial::new([7; 16]),
///     rolling_start_interval_number: 2_657_664,
///     rolling_period: INTERVALS_PER_DAY,
///     transmission_risk_level: 5,
///     submission_timestamp: SubmissionHour::new(443_003),
///     origin_country: de,
///     visited_countries: vec![de],
///     report_type: ReportType::ConfirmedTest,
///     days_since_onset_of_symptoms: 2,
///     consent_to_federation: true,
/// };
///
/// assert!(record.is_visible_in(de));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExposureRecord {
    /// Opaque key bytes.
    pub key_data: KeyMaterial,
    /// Ten-minute interval counter at which the key became active.
    pub rolling_start_interval_number: u32,
    /// Number of ten-minute intervals the key stays active.
    pub rolling_period: u32,
    /// Transmission risk level.
    pub transmission_risk_level: i32,
    /// Hour bucket the record was submitted in.
    pub submission_timestamp: SubmissionHour,
    /// Region the key was submitted in.
    pub origin_country: RegionCode,
    /// Regions the record is relevant to; never empty.
    pub visited_countries: Vec<RegionCode>,
    /// How the diagnosis was established.
    pub report_type: ReportType,
    /// Days between symptom onset and key validity start.
    pub days_since_onset_of_symptoms: i32,
    /// Whether the submitter consented to cross-region sharing.
    pub consent_to_federation: bool,
}

impl ExposureRecord {
    /// Returns `true` when `region` is among the visited regions.
    #[must_use]
    pub fn is_visible_in(&self, region: RegionCode) -> bool {
        self.visited_countries.contains(&region)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn de() -> RegionCode {
        RegionCode::new("DE").expect("valid region")
    }

    fn record() -> ExposureRecord {
        ExposureRecord {
            key_data: KeyMaterial::new([0xab; KEY_LENGTH]),
            rolling_start_interval_number: 2_657_664,
            rolling_period: INTERVALS_PER_DAY,
            transmission_risk_level: 3,
            submission_timestamp: SubmissionHour::new(443_003),
            origin_country: de(),
            visited_countries: vec![de()],
            report_type: ReportType::ConfirmedTest,
            days_since_onset_of_symptoms: -2,
            consent_to_federation: false,
        }
    }

    #[test]
    fn submission_hour_floors_to_the_hour() {
        let instant = Utc
            .with_ymd_and_hms(2020, 7, 15, 11, 59, 59)
            .single()
            .expect("valid timestamp");
        assert_eq!(SubmissionHour::containing(instant), SubmissionHour::new(443_003));
    }

    #[test]
    fn submission_hour_floors_before_the_epoch() {
        let instant = Utc
            .with_ymd_and_hms(1969, 12, 31, 23, 30, 0)
            .single()
            .expect("valid timestamp");
        assert_eq!(SubmissionHour::containing(instant), SubmissionHour::new(-1));
    }

    #[test]
    fn record_serializes_to_camel_case_with_hex_key() {
        let json = serde_json::to_value(record()).expect("serialize");
        assert_eq!(json["keyData"], "abababababababababababababababab");
        assert_eq!(json["submissionTimestamp"], 443_003);
        assert_eq!(json["visitedCountries"], serde_json::json!(["DE"]));
        assert_eq!(json["reportType"], "CONFIRMED_TEST");
        assert_eq!(json["daysSinceOnsetOfSymptoms"], -2);
    }

    #[test]
    fn record_deserializes_from_json() {
        let json = serde_json::to_string(&record()).expect("serialize");
        let parsed: ExposureRecord = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, record());
    }

    #[test]
    fn key_material_rejects_short_hex() {
        let result = serde_json::from_str::<KeyMaterial>("\"abcd\"");
        assert!(result.is_err());
    }

    #[test]
    fn visibility_follows_visited_countries() {
        let fr = RegionCode::new("FR").expect("valid region");
        let record = record();
        assert!(record.is_visible_in(de()));
        assert!(!record.is_visible_in(fr));
    }
}
