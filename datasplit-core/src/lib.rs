//! # datasplit-core — CSV ingestion and train/validation/test splitting
//!
//! One sequential flow per run:
//! 1. **Fetch** the raw CSV text over HTTPS ([`fetch`])
//! 2. **Split** the data rows into train / validation / test by ratio ([`split`])
//! 3. **Write** each subset, header first, under `<artifact_dir>/raw/` ([`write`])
//!
//! [`pipeline::DataIngestion`] sequences the three steps and returns an
//! [`IngestionReport`] describing what was written.

pub mod config;
pub mod error;
pub mod fetch;
pub mod pipeline;
pub mod split;
pub mod write;

// Re-exports
pub use config::{DatasplitConfig, IngestionConfig, load_config};
pub use error::DatasplitError;
pub use fetch::{HttpFetcher, RawDataFetcher};
pub use pipeline::{DataIngestion, IngestionReport};
pub use split::{DatasetSplits, RawDataset, Split, SplitRatios};
pub use write::SplitSummary;
