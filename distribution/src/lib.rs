//! Service wiring for synthetic exposure test data.
//!
//! The [`domain`] layer defines the query and store ports and the run that
//! drives them. [`outbound`] holds the adapters, and [`test_data`] loads
//! settings and performs the startup run.

pub mod domain;
pub mod outbound;
pub mod test_data;
