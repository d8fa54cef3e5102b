//! Startup wiring for test data generation.

mod config;
mod startup;

pub use config::TestDataSettings;
pub use startup::{StartupGenerationError, generate_test_data_on_startup};
