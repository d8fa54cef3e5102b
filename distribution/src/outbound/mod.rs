//! Outbound adapters implementing the exposure ports.

mod atomic_io;
mod json_file;
mod memory;

pub use json_file::{JsonFileExposureRepository, JsonFileStoreError};
pub use memory::InMemoryExposureRepository;
