//! Port abstraction for persisting newly generated exposure records.

use async_trait::async_trait;
use synthetic_exposures::ExposureRecord;

use super::define_port_error;

define_port_error! {
    /// Errors raised by exposure store adapters.
    pub enum ExposureStoreError {
        /// The backing store could not be reached.
        Connection { message: String } => "exposure store connection failed: {message}",
        /// The records could not be written.
        Write { message: String } => "exposure store write failed: {message}",
    }
}

/// Port for appending a batch of records to the store.
///
/// Implementations must either persist the whole batch or none of it. The
/// generation run never calls this port with an empty batch.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExposureStore: Send + Sync {
    /// Persist `records` in one write.
    async fn save(&self, records: Vec<ExposureRecord>) -> Result<(), ExposureStoreError>;
}
