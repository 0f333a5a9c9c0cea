//! Command-Line Interface
//!
//! `relabel [--config FILE] [--verbose] [--json] <run|status|check>`.
//! Flags override the config file, which overrides built-in defaults.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::models::RunConfig;
use crate::utils::error::AppResult;

#[derive(Parser, Debug)]
#[command(name = "relabel")]
#[command(version, about = "Resumable LLM relabeling of CSV datasets", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (.json or .toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Classify pending rows, checkpointing as it goes
    Run {
        #[command(flatten)]
        dataset: DatasetArgs,

        #[command(flatten)]
        endpoint: EndpointArgs,

        /// Successful classifications between checkpoint writes
        #[arg(long)]
        interval: Option<usize>,

        /// Allowed label (repeat for each label; replaces the configured set)
        #[arg(long = "label")]
        labels: Vec<String>,

        /// Stop retrying a row after this many unusable replies
        #[arg(long)]
        max_attempts: Option<u32>,
    },

    /// Show progress of the working dataset without classifying
    Status {
        #[command(flatten)]
        dataset: DatasetArgs,

        /// Attempt cap used to count quarantined rows
        #[arg(long)]
        max_attempts: Option<u32>,
    },

    /// Check that the endpoint is reachable
    Check {
        #[command(flatten)]
        endpoint: EndpointArgs,
    },
}

/// Dataset location flags
#[derive(Args, Debug, Default, Clone)]
pub struct DatasetArgs {
    /// Pristine input CSV
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Checkpoint/output CSV
    #[arg(long)]
    pub checkpoint: Option<PathBuf>,
}

/// Endpoint flags
#[derive(Args, Debug, Default, Clone)]
pub struct EndpointArgs {
    /// Chat-completions URL
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Model name
    #[arg(short, long)]
    pub model: Option<String>,

    /// Bearer token for the endpoint
    #[arg(long)]
    pub api_key: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,
}

impl DatasetArgs {
    fn apply(&self, config: &mut RunConfig) {
        if let Some(input) = &self.input {
            config.input_path = input.clone();
        }
        if let Some(checkpoint) = &self.checkpoint {
            config.checkpoint_path = checkpoint.clone();
        }
    }
}

impl EndpointArgs {
    fn apply(&self, config: &mut RunConfig) {
        if let Some(endpoint) = &self.endpoint {
            config.endpoint_url = endpoint.clone();
        }
        if let Some(model) = &self.model {
            config.model = model.clone();
        }
        if let Some(api_key) = &self.api_key {
            config.api_key = Some(api_key.clone());
        }
        if let Some(timeout) = self.timeout {
            config.request_timeout_secs = Some(timeout);
        }
    }
}

impl Cli {
    /// Merge defaults, the optional config file, and this command's flags.
    /// The result is not validated yet.
    pub fn resolve_config(&self) -> AppResult<RunConfig> {
        let mut config = match &self.config {
            Some(path) => RunConfig::load(path)?,
            None => RunConfig::default(),
        };

        match &self.command {
            Commands::Run {
                dataset,
                endpoint,
                interval,
                labels,
                max_attempts,
            } => {
                dataset.apply(&mut config);
                endpoint.apply(&mut config);
                if let Some(interval) = interval {
                    config.checkpoint_interval = *interval;
                }
                if !labels.is_empty() {
                    config.labels = labels.clone();
                }
                if max_attempts.is_some() {
                    config.max_attempts = *max_attempts;
                }
            }
            Commands::Status {
                dataset,
                max_attempts,
            } => {
                dataset.apply(&mut config);
                if max_attempts.is_some() {
                    config.max_attempts = *max_attempts;
                }
            }
            Commands::Check { endpoint } => endpoint.apply(&mut config),
        }

        Ok(config)
    }
}
