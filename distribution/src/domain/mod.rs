//! Domain layer: ports and the generation run that drives them.

pub mod ports;
mod test_data_generation;

pub use test_data_generation::{TestDataGeneration, TestDataGenerationError, TestDataRunOutcome};
