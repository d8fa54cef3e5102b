//! In-process exposure store for tests and dry runs.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use synthetic_exposures::{ExposureRecord, RegionCode};

use crate::domain::ports::{ExposureQuery, ExposureQueryError, ExposureStore, ExposureStoreError};

/// Adapter keeping records in memory and counting port calls.
#[derive(Debug, Default)]
pub struct InMemoryExposureRepository {
    records: Mutex<Vec<ExposureRecord>>,
    query_failure: Option<String>,
    fetch_calls: AtomicUsize,
    save_calls: AtomicUsize,
}

impl InMemoryExposureRepository {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `records`.
    #[must_use]
    pub fn with_records(records: Vec<ExposureRecord>) -> Self {
        Self {
            records: Mutex::new(records),
            ..Self::default()
        }
    }

    /// Make every fetch fail with a connection error carrying `message`.
    #[must_use]
    pub fn failing_queries(mut self, message: impl Into<String>) -> Self {
        self.query_failure = Some(message.into());
        self
    }

    /// Snapshot of every stored record, in save order.
    #[must_use]
    pub fn records(&self) -> Vec<ExposureRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of times the query port was called.
    #[must_use]
    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    /// Number of times the store port was called.
    #[must_use]
    pub fn save_calls(&self) -> usize {
        self.save_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ExposureQuery for InMemoryExposureRepository {
    async fn fetch_existing(
        &self,
        regions: &[RegionCode],
    ) -> Result<HashMap<RegionCode, Vec<ExposureRecord>>, ExposureQueryError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = &self.query_failure {
            return Err(ExposureQueryError::connection(message.as_str()));
        }
        let stored = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(regions
            .iter()
            .map(|&region| {
                let visible = stored
                    .iter()
                    .filter(|record| record.is_visible_in(region))
                    .cloned()
                    .collect();
                (region, visible)
            })
            .collect())
    }
}

#[async_trait]
impl ExposureStore for InMemoryExposureRepository {
    async fn save(&self, records: Vec<ExposureRecord>) -> Result<(), ExposureStoreError> {
        self.save_calls.fetch_add(1, Ordering::SeqCst);
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend(records);
        Ok(())
    }
}
