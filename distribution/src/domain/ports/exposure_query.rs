//! Port abstraction for reading the exposure records already stored.
//!
//! The generation run calls this port exactly once per run, asking for every
//! supported region at the same time. Adapters group the answer by the
//! requested region: a record belongs to region `r` when `r` appears in its
//! visited countries, so a record may be returned under several regions.

use std::collections::HashMap;

use async_trait::async_trait;
use synthetic_exposures::{ExposureRecord, RegionCode};

use super::define_port_error;

define_port_error! {
    /// Errors raised by exposure query adapters.
    pub enum ExposureQueryError {
        /// The backing store could not be reached.
        Connection { message: String } => "exposure query connection failed: {message}",
        /// The backing store answered but the query failed.
        Query { message: String } => "exposure query failed: {message}",
    }
}

/// Port for fetching the records currently held for a set of regions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExposureQuery: Send + Sync {
    /// Fetch the stored records visible in each of `regions`.
    ///
    /// Regions with no records may be absent from the map or map to an empty
    /// list; callers treat both the same.
    async fn fetch_existing(
        &self,
        regions: &[RegionCode],
    ) -> Result<HashMap<RegionCode, Vec<ExposureRecord>>, ExposureQueryError>;
}
