//! Domain ports for the exposure generation run.

mod macros;
pub(crate) use macros::define_port_error;

mod exposure_query;
mod exposure_store;

#[cfg(test)]
pub use exposure_query::MockExposureQuery;
pub use exposure_query::{ExposureQuery, ExposureQueryError};
#[cfg(test)]
pub use exposure_store::MockExposureStore;
pub use exposure_store::{ExposureStore, ExposureStoreError};
