//! Orchestration of one ingestion run: fetch -> split -> write.

use crate::config::IngestionConfig;
use crate::error::DatasplitError;
use crate::fetch::{HttpFetcher, RawDataFetcher};
use crate::split::split_dataset;
use crate::write::{SplitSummary, write_splits};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::Instrument;
use uuid::Uuid;

/// Summary of a completed run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestionReport {
    pub run_id: Uuid,
    pub url: String,
    pub total_rows: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub splits: Vec<SplitSummary>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Downloads a CSV, splits its rows and writes the three subsets.
///
/// A fetch error aborts the run before anything touches the filesystem.
/// Nothing is cleaned up when a later step fails.
pub struct DataIngestion {
    config: IngestionConfig,
    fetcher: Arc<dyn RawDataFetcher>,
}

impl DataIngestion {
    /// Build a run that downloads over HTTPS.
    pub fn new(config: IngestionConfig) -> Result<Self, DatasplitError> {
        let fetcher = match config.timeout_secs {
            Some(secs) => HttpFetcher::with_timeout(Duration::from_secs(secs))?,
            None => HttpFetcher::new(),
        };
        Ok(Self::with_fetcher(config, Arc::new(fetcher)))
    }

    /// Build a run that pulls its text from `fetcher`.
    pub fn with_fetcher(config: IngestionConfig, fetcher: Arc<dyn RawDataFetcher>) -> Self {
        Self { config, fetcher }
    }

    pub fn config(&self) -> &IngestionConfig {
        &self.config
    }

    pub fn url(&self) -> String {
        self.config.url()
    }

    pub async fn run(&self) -> Result<IngestionReport, DatasplitError> {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("ingestion", %run_id);
        self.run_inner(run_id).instrument(span).await
    }

    async fn run_inner(&self, run_id: Uuid) -> Result<IngestionReport, DatasplitError> {
        let started_at = Utc::now();
        let url = self.config.url();
        tracing::info!(%url, "Data ingestion started");

        for warning in self.config.config_warnings() {
            tracing::warn!("{warning}");
        }

        let raw = self.fetcher.fetch(&url).await?;
        let splits = split_dataset(&raw, self.config.ratios(), self.config.seed);
        let summaries = write_splits(&self.config.raw_dir(), &splits).await?;

        tracing::info!("Data ingestion completed successfully");

        Ok(IngestionReport {
            run_id,
            url,
            total_rows: splits.total_rows(),
            seed: self.config.seed,
            splits: summaries,
            started_at,
            finished_at: Utc::now(),
        })
    }
}
