//! Checkpointed Batch Driver
//!
//! Resumable relabeling of a dataset:
//!
//! 1. Load the checkpoint if one exists, else the pristine input
//! 2. Ensure the tool-owned columns exist (additive, existing cells kept)
//! 3. Visit rows in order; classify each unprocessed row once
//! 4. Persist the full dataset after every `checkpoint_interval` successes
//! 5. Persist once more at the end, unconditionally
//!
//! A row marked processed is never sent to the classifier again, so re-runs
//! only repeat work lost since the last successful write. Unknown outcomes
//! leave the row untouched for the next run.

use relabel_core::{Classification, Classifier};
use tracing::{debug, info, warn};

use crate::models::{ColumnNames, DatasetStatus, LoadSource, RunConfig, RunSummary};
use crate::storage::{Dataset, DatasetStore, Schema};
use crate::utils::error::{AppError, AppResult};

/// Driver settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverOptions {
    /// Successful classifications between checkpoint writes (>= 1)
    pub checkpoint_interval: usize,
    pub columns: ColumnNames,
    /// Attempt cap for the quarantine extension; `None` retries forever
    pub max_attempts: Option<u32>,
}

impl Default for DriverOptions {
    fn default() -> Self {
        Self {
            checkpoint_interval: crate::models::DEFAULT_CHECKPOINT_INTERVAL,
            columns: ColumnNames::default(),
            max_attempts: None,
        }
    }
}

impl From<&RunConfig> for DriverOptions {
    fn from(config: &RunConfig) -> Self {
        Self {
            checkpoint_interval: config.checkpoint_interval,
            columns: config.columns.clone(),
            max_attempts: config.max_attempts,
        }
    }
}

fn load_working<S: DatasetStore + ?Sized>(
    store: &S,
    options: &DriverOptions,
) -> AppResult<(Dataset, Schema, LoadSource)> {
    let (mut dataset, source) = store.load()?;
    let schema = dataset.ensure_schema(&options.columns, options.max_attempts.is_some())?;
    Ok((dataset, schema, source))
}

fn is_quarantined(options: &DriverOptions, attempts: Option<u32>) -> bool {
    match (options.max_attempts, attempts) {
        (Some(max), Some(attempts)) => attempts >= max,
        _ => false,
    }
}

fn count_quarantined(options: &DriverOptions, dataset: &Dataset, schema: &Schema) -> usize {
    dataset
        .records(schema)
        .filter(|r| !r.is_processed() && is_quarantined(options, r.attempts()))
        .count()
}

/// Report dataset progress without classifying or writing.
pub fn dataset_status<S: DatasetStore + ?Sized>(
    store: &S,
    options: &DriverOptions,
) -> AppResult<DatasetStatus> {
    let (dataset, schema, source) = load_working(store, options)?;
    let processed = dataset.records(&schema).filter(|r| r.is_processed()).count();
    let changed = dataset
        .records(&schema)
        .filter(|r| r.is_processed() && r.is_changed())
        .count();

    Ok(DatasetStatus {
        source,
        total_rows: dataset.len(),
        processed,
        pending: dataset.len() - processed,
        changed,
        quarantined: count_quarantined(options, &dataset, &schema),
    })
}

/// Single-threaded, resumable classification driver.
pub struct CheckpointDriver<C, S> {
    classifier: C,
    store: S,
    options: DriverOptions,
}

impl<C, S> CheckpointDriver<C, S>
where
    C: Classifier,
    S: DatasetStore,
{
    pub fn new(classifier: C, store: S, options: DriverOptions) -> AppResult<Self> {
        if options.checkpoint_interval == 0 {
            return Err(AppError::config("checkpoint_interval must be at least 1"));
        }
        if options.max_attempts == Some(0) {
            return Err(AppError::config("max_attempts must be at least 1"));
        }
        options.columns.validate().map_err(AppError::config)?;
        Ok(Self {
            classifier,
            store,
            options,
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Classify every eligible unprocessed row once, checkpointing as it goes.
    ///
    /// Returns without writing when no row is eligible. Load and write
    /// failures are fatal; classification failures are not.
    pub async fn run(&mut self) -> AppResult<RunSummary> {
        let (mut dataset, schema, source) = load_working(&self.store, &self.options)?;
        let total_rows = dataset.len();

        let unprocessed = dataset.records(&schema).filter(|r| !r.is_processed()).count();
        let quarantined_at_start = count_quarantined(&self.options, &dataset, &schema);
        let pending_at_start = unprocessed - quarantined_at_start;

        info!(
            source = %source,
            total_rows,
            pending = pending_at_start,
            quarantined = quarantined_at_start,
            "Rows needing classification: {}",
            pending_at_start
        );

        if pending_at_start == 0 {
            info!("All rows have already been classified. Exiting.");
            return Ok(RunSummary {
                source,
                total_rows,
                pending_at_start,
                newly_processed: 0,
                unknown: 0,
                quarantined: quarantined_at_start,
                persists: 0,
                remaining: unprocessed,
                skipped_run: true,
            });
        }

        let interval = self.options.checkpoint_interval;
        let mut classified = 0usize;
        let mut unknown = 0usize;
        let mut persists = 0usize;

        for idx in 0..total_rows {
            let record = dataset.record(idx, &schema);
            if record.is_processed() || is_quarantined(&self.options, record.attempts()) {
                continue;
            }
            let text = record.text().to_string();

            match self.classifier.classify(&text).await {
                Classification::Labeled(label) => {
                    let changed = dataset.mark_classified(idx, &schema, &label);
                    classified += 1;

                    info!(
                        row = idx,
                        new_label = %label,
                        changed,
                        remaining = pending_at_start - classified,
                        "Classified row"
                    );

                    if classified % interval == 0 {
                        self.store.persist(&dataset)?;
                        persists += 1;
                        info!(
                            classified,
                            "[Checkpoint] Saved after {} classifications in this run", classified
                        );
                    }
                }
                Classification::Unknown => {
                    unknown += 1;
                    match dataset.record_failed_attempt(idx, &schema) {
                        Some(attempts) if is_quarantined(&self.options, Some(attempts)) => {
                            warn!(
                                row = idx,
                                attempts, "row quarantined after repeated unknown outcomes"
                            );
                        }
                        Some(attempts) => {
                            debug!(row = idx, attempts, "no usable label; row left pending")
                        }
                        None => debug!(row = idx, "no usable label; row left pending"),
                    }
                }
            }
        }

        self.store.persist(&dataset)?;
        persists += 1;

        let remaining = dataset.records(&schema).filter(|r| !r.is_processed()).count();
        let quarantined = count_quarantined(&self.options, &dataset, &schema);

        info!(
            newly_processed = classified,
            unknown,
            remaining,
            "Total newly classified rows in this run: {}",
            classified
        );

        Ok(RunSummary {
            source,
            total_rows,
            pending_at_start,
            newly_processed: classified,
            unknown,
            quarantined,
            persists,
            remaining,
            skipped_run: false,
        })
    }

    /// Report progress without classifying or writing.
    pub fn status(&self) -> AppResult<DatasetStatus> {
        dataset_status(&self.store, &self.options)
    }
}
