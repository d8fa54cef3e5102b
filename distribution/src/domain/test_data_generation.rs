//! Test data generation run orchestration.
//!
//! One run reads the clock once, fetches the stored records for every
//! supported region in a single query, asks the generator for the missing
//! records, and saves them in a single batch.

use std::sync::Arc;

use mockable::Clock;
use synthetic_exposures::{ConfigError, GenerationConfig, generate_missing_exposures};
use thiserror::Error;
use tracing::{debug, info};

use crate::domain::ports::{ExposureQuery, ExposureQueryError, ExposureStore, ExposureStoreError};

/// Result of a successful generation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestDataRunOutcome {
    /// Every bucket already met its target; nothing was saved.
    UpToDate,
    /// Missing records were generated and saved.
    Generated {
        /// Number of records saved in the batch.
        record_count: usize,
    },
}

/// Errors raised while running test data generation.
#[derive(Debug, Error)]
pub enum TestDataGenerationError {
    /// The generation window could not be planned.
    #[error("test data configuration rejected: {0}")]
    Config(#[from] ConfigError),
    /// Existing records could not be fetched.
    #[error("existing exposures could not be fetched: {0}")]
    Query(#[from] ExposureQueryError),
    /// Generated records could not be saved.
    #[error("generated exposures could not be saved: {0}")]
    Store(#[from] ExposureStoreError),
}

impl TestDataGenerationError {
    /// Whether a later run could succeed without configuration changes.
    ///
    /// Query failures are transient: nothing was written, so the next run
    /// starts from the same state.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Query(_))
    }
}

/// Service that fills the exposure store up to the hourly target.
#[derive(Clone)]
pub struct TestDataGeneration<Q, S> {
    query: Arc<Q>,
    store: Arc<S>,
    clock: Arc<dyn Clock>,
}

impl<Q, S> TestDataGeneration<Q, S> {
    /// Create a service over the given ports and clock.
    #[must_use]
    pub fn new(query: Arc<Q>, store: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self {
            query,
            store,
            clock,
        }
    }
}

impl<Q, S> TestDataGeneration<Q, S>
where
    Q: ExposureQuery,
    S: ExposureStore,
{
    /// Run one generation pass.
    ///
    /// The save port is only called when at least one record is missing.
    ///
    /// # Errors
    ///
    /// Returns [`TestDataGenerationError`] when the query fails, the window
    /// cannot be planned, or the save fails. A failed query never reaches
    /// the store.
    pub async fn run(
        &self,
        config: &GenerationConfig,
    ) -> Result<TestDataRunOutcome, TestDataGenerationError> {
        let now = self.clock.utc();
        let regions = config.supported_regions();
        let existing = self.query.fetch_existing(regions).await?;
        debug!(
            regions = regions.len(),
            existing = existing.values().map(Vec::len).sum::<usize>(),
            "fetched existing exposures"
        );

        let records = generate_missing_exposures(config, &existing, now)?;
        if records.is_empty() {
            info!(
                exposures_per_hour = config.exposures_per_hour(),
                "exposure store already meets the hourly target"
            );
            return Ok(TestDataRunOutcome::UpToDate);
        }

        let record_count = records.len();
        self.store.save(records).await?;
        info!(record_count, "generated missing exposures");

        Ok(TestDataRunOutcome::Generated { record_count })
    }
}
