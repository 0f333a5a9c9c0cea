//! Commands
//!
//! One function per CLI subcommand. Each takes a merged `RunConfig`,
//! validates it before touching the dataset or the network, wires the
//! concrete store/classifier, and returns a serializable report.

use std::sync::Arc;

use relabel_llm::{LlmClassifier, LlmProvider, OpenAIProvider};
use tracing::{info, warn};

use crate::models::response::HealthResponse;
use crate::models::{DatasetStatus, RunConfig, RunSummary};
use crate::services::driver::{dataset_status, CheckpointDriver, DriverOptions};
use crate::storage::CsvDatasetStore;
use crate::utils::error::{AppError, AppResult};

fn build_provider(config: &RunConfig) -> AppResult<Arc<dyn LlmProvider>> {
    Ok(Arc::new(OpenAIProvider::new(config.provider_config())?))
}

fn build_store(config: &RunConfig) -> CsvDatasetStore {
    CsvDatasetStore::new(&config.input_path, &config.checkpoint_path)
}

/// Relabel every pending record, checkpointing to `checkpoint_path`.
pub async fn run(config: RunConfig) -> AppResult<RunSummary> {
    let config = config.validated()?;
    info!(
        input = %config.input_path.display(),
        checkpoint = %config.checkpoint_path.display(),
        endpoint = %config.endpoint_url,
        model = %config.model,
        interval = config.checkpoint_interval,
        "starting relabel run"
    );

    let classifier = LlmClassifier::new(build_provider(&config)?, config.label_set()?);
    let mut driver = CheckpointDriver::new(
        classifier,
        build_store(&config),
        DriverOptions::from(&config),
    )?;
    driver.run().await
}

/// Report progress of the working dataset without classifying.
pub fn status(config: &RunConfig) -> AppResult<DatasetStatus> {
    config.validate().map_err(AppError::config)?;
    dataset_status(&build_store(config), &DriverOptions::from(config))
}

/// Probe the endpoint and list its models when it exposes them.
pub async fn check(config: &RunConfig) -> AppResult<HealthResponse> {
    config.validate().map_err(AppError::config)?;
    let provider = build_provider(config)?;
    provider.health_check().await?;

    let health = HealthResponse::new(&config.endpoint_url, &config.model);
    match provider.list_models().await {
        Ok(Some(models)) => {
            let health = health.with_models(models);
            if health.model_listed == Some(false) {
                warn!(model = %config.model, "configured model not listed by endpoint");
            }
            Ok(health)
        }
        Ok(None) => Ok(health),
        Err(e) => {
            warn!(error = %e, "endpoint reachable but model listing failed");
            Ok(health)
        }
    }
}
