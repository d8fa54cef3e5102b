//! Fills the configured exposure store with synthetic test data.
//!
//! # Examples
//! ```sh
//! TEST_DATA_ENABLED=true TEST_DATA_SUPPORTED_REGIONS=DE \
//!     cargo run --bin generate-test-data -- --store-path exposures.json
//! ```

use std::process::ExitCode;
use std::sync::Arc;

use camino::Utf8PathBuf;
use distribution::outbound::JsonFileExposureRepository;
use distribution::test_data::{
    StartupGenerationError, TestDataSettings, generate_test_data_on_startup,
};
use mockable::DefaultClock;
use ortho_config::OrthoConfig;
use thiserror::Error;
use tracing::{error, warn};
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Debug, Error)]
enum RunError {
    #[error("failed to load settings: {0}")]
    Settings(String),
    #[error("store path {path} is not valid UTF-8")]
    NonUtf8StorePath { path: std::path::PathBuf },
    #[error(transparent)]
    Generation(#[from] StartupGenerationError),
}

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "test data generation failed");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), RunError> {
    let settings = TestDataSettings::load_from_iter(std::env::args_os())
        .map_err(|e| RunError::Settings(e.to_string()))?;
    let store_path = Utf8PathBuf::from_path_buf(settings.store_path())
        .map_err(|path| RunError::NonUtf8StorePath { path })?;
    let repository = Arc::new(JsonFileExposureRepository::new(store_path));

    generate_test_data_on_startup(
        &settings,
        Arc::clone(&repository),
        repository,
        Arc::new(DefaultClock),
    )
    .await?;
    Ok(())
}
