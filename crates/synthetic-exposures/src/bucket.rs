//! Hour-bucket planning and grouping.
//!
//! A bucket is the half-open hour `[start, start + 1h)`, identified by its
//! start [`SubmissionHour`]. Buckets only exist for the duration of a run:
//! [`plan_buckets`] derives them from the run's `now`, and
//! [`group_by_bucket`] sorts existing records into them.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use chrono::{DateTime, Utc};

use crate::config::validate_retention;
use crate::error::ConfigError;
use crate::record::{ExposureRecord, HOURS_PER_DAY, SubmissionHour};

/// An hour-aligned bucket of submissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HourBucket(SubmissionHour);

impl HourBucket {
    /// Returns the bucket starting at `start`.
    #[must_use]
    pub const fn starting_at(start: SubmissionHour) -> Self {
        Self(start)
    }

    /// Returns the bucket containing `instant`.
    #[must_use]
    pub fn containing(instant: DateTime<Utc>) -> Self {
        Self(SubmissionHour::containing(instant))
    }

    /// Returns the bucket's start hour.
    #[must_use]
    pub const fn start(self) -> SubmissionHour {
        self.0
    }
}

/// Plans the hour buckets covered by a retention window.
///
/// Buckets run oldest first from `floor_hour(now) - retention_days * 24h` up
/// to and including the bucket containing `now`, so the result always holds
/// `retention_days * 24 + 1` buckets.
///
/// # Errors
///
/// Returns [`ConfigError::NegativeRetention`] for a negative retention and
/// [`ConfigError::RetentionTooLarge`] when the window cannot be represented.
///
/// # Example
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use synthetic_exposures::{SubmissionHour, plan_buckets};
///
/// let now = Utc.with_ymd_and_hms(2020, 7, 15, 12, 30, 0).single().expect("valid time");
/// let buckets = plan_buckets(now, 1).expect("valid retention");
///
/// assert_eq!(buckets.len(), 25);
/// assert_eq!(buckets.last().map(|b| b.start()), Some(SubmissionHour::new(443_004)));
/// ```
pub fn plan_buckets(
    now: DateTime<Utc>,
    retention_days: i64,
) -> Result<Vec<HourBucket>, ConfigError> {
    let retention = i64::from(validate_retention(retention_days)?);
    let newest = HourBucket::containing(now).start().hours_since_epoch();
    let oldest = retention
        .checked_mul(HOURS_PER_DAY)
        .and_then(|span| newest.checked_sub(span))
        .ok_or(ConfigError::RetentionTooLarge {
            value: retention_days,
        })?;

    Ok((oldest..=newest)
        .map(|hour| HourBucket::starting_at(SubmissionHour::new(hour)))
        .collect())
}

/// Groups records by the bucket their submission timestamp falls in.
///
/// Pure and order-preserving within each bucket. Records are grouped
/// regardless of any retention window; callers look up only the buckets
/// they planned.
#[must_use]
pub fn group_by_bucket(
    records: &[ExposureRecord],
) -> BTreeMap<HourBucket, Vec<&ExposureRecord>> {
    let mut grouped: BTreeMap<HourBucket, Vec<&ExposureRecord>> = BTreeMap::new();
    for record in records {
        grouped
            .entry(HourBucket::starting_at(record.submission_timestamp))
            .or_default()
            .push(record);
    }
    grouped
}

/// Shortfall of one bucket against the hourly target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BucketDeficit {
    /// The bucket that is short.
    pub bucket: HourBucket,
    /// Number of records missing; always positive.
    pub missing: u32,
}

/// Computes the shortfall of each planned bucket.
///
/// Buckets already at or above `target` are omitted, so an empty result
/// means nothing needs generating. Output follows the order of `buckets`.
#[must_use]
pub fn compute_deficits<S: BuildHasher>(
    buckets: &[HourBucket],
    existing_counts: &HashMap<HourBucket, usize, S>,
    target: u32,
) -> Vec<BucketDeficit> {
    buckets
        .iter()
        .filter_map(|&bucket| {
            let existing = existing_counts
                .get(&bucket)
                .map_or(0, |&count| u32::try_from(count).unwrap_or(u32::MAX));
            let missing = target.saturating_sub(existing);
            (missing > 0).then_some(BucketDeficit { bucket, missing })
        })
        .collect()
}
