//! Startup generation orchestration.

use std::sync::Arc;

use mockable::Clock;
use synthetic_exposures::ConfigError;
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::ports::{ExposureQuery, ExposureStore};
use crate::domain::{TestDataGeneration, TestDataGenerationError, TestDataRunOutcome};
use crate::test_data::config::TestDataSettings;

/// Errors returned while executing startup generation.
#[derive(Debug, Error)]
pub enum StartupGenerationError {
    /// Settings did not describe a valid generator configuration.
    #[error("invalid test data settings: {0}")]
    Config(#[from] ConfigError),
    /// The generation run failed for a reason a retry will not fix.
    #[error("test data generation error: {0}")]
    Generation(#[from] TestDataGenerationError),
}

/// Run test data generation on startup when enabled.
///
/// Returns `Ok(None)` when generation is disabled or when the existing
/// records could not be fetched; the latter is logged and left for the next
/// run.
///
/// # Errors
///
/// Returns [`StartupGenerationError`] when the settings are invalid or the
/// generated records cannot be saved.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
///
/// use distribution::outbound::InMemoryExposureRepository;
/// use distribution::test_data::{TestDataSettings, generate_test_data_on_startup};
/// use mockable::DefaultClock;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let settings = TestDataSettings {
///     enabled: false,
///     exposures_per_hour: None,
///     seed: None,
///     retention_days: None,
///     supported_regions: Some("DE".to_owned()),
///     store_path: None,
///     transmission_risk_min: None,
///     transmission_risk_max: None,
///     days_since_onset_min: None,
///     days_since_onset_max: None,
/// };
/// let repository = Arc::new(InMemoryExposureRepository::new());
/// let outcome = generate_test_data_on_startup(
///     &settings,
///     Arc::clone(&repository),
///     Arc::clone(&repository),
///     Arc::new(DefaultClock),
/// )
/// .await?;
/// assert!(outcome.is_none());
/// assert_eq!(repository.fetch_calls(), 0);
/// # Ok(())
/// # }
/// ```
pub async fn generate_test_data_on_startup<Q, S>(
    settings: &TestDataSettings,
    query: Arc<Q>,
    store: Arc<S>,
    clock: Arc<dyn Clock>,
) -> Result<Option<TestDataRunOutcome>, StartupGenerationError>
where
    Q: ExposureQuery,
    S: ExposureStore,
{
    if !settings.is_enabled() {
        info!(reason = "disabled", "test data generation skipped");
        return Ok(None);
    }

    let config = settings.generation_config()?;
    let generation = TestDataGeneration::new(query, store, clock);
    let outcome = match generation.run(&config).await {
        Ok(outcome) => outcome,
        Err(error) if error.is_transient() => {
            warn!(
                error = %error,
                "existing exposures unavailable; test data generation deferred"
            );
            return Ok(None);
        }
        Err(error) => return Err(error.into()),
    };

    match outcome {
        TestDataRunOutcome::Generated { record_count } => {
            info!(
                record_count,
                regions = settings.supported_regions(),
                "test data generation applied"
            );
        }
        TestDataRunOutcome::UpToDate => {
            info!(
                regions = settings.supported_regions(),
                "test data already complete; skipping"
            );
        }
    }

    Ok(Some(outcome))
}
