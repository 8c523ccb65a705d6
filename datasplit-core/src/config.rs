//! Configuration for the ingestion step.
//!
//! Uses `figment` for layered configuration: defaults -> workspace file -> explicit file
//! -> environment. The ingestion settings live under a `data_ingestion` section:
//!
//! ```toml
//! [data_ingestion]
//! bucket_name = "my-datasets"
//! object_name = "hotel_bookings.csv"
//! storage_path = "s3.amazonaws.com"
//! train_ratio = 0.8
//! val_ratio = 0.1
//! artifact_dir = "artifacts"
//! ```

use crate::error::DatasplitError;
use crate::split::SplitRatios;
use figment::{
    Figment,
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name looked up in the workspace root.
pub const WORKSPACE_CONFIG_FILE: &str = "datasplit.toml";

/// Pipeline-style YAML config looked up under the workspace.
pub const WORKSPACE_YAML_CONFIG: &str = "config/config.yaml";

/// Prefix for environment overrides (`DATASPLIT_DATA_INGESTION__TRAIN_RATIO`, ...).
pub const ENV_PREFIX: &str = "DATASPLIT_";

/// Root of the configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatasplitConfig {
    #[serde(default)]
    pub data_ingestion: IngestionConfig,
}

/// Settings for one ingestion run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestionConfig {
    /// Bucket (host prefix) holding the raw CSV.
    #[serde(default)]
    pub bucket_name: String,
    /// Object key of the CSV within the bucket.
    #[serde(default)]
    pub object_name: String,
    /// Storage host suffix, e.g. `s3.amazonaws.com`.
    #[serde(default = "default_storage_path")]
    pub storage_path: String,
    /// Fraction of rows assigned to the train split.
    #[serde(default = "default_train_ratio")]
    pub train_ratio: f64,
    /// Fraction of rows assigned to the validation split. Test gets the remainder.
    #[serde(default = "default_val_ratio")]
    pub val_ratio: f64,
    /// Root directory for pipeline outputs; splits land in `<artifact_dir>/raw`.
    #[serde(default = "default_artifact_dir")]
    pub artifact_dir: PathBuf,
    /// Seed for the shuffle. Unseeded runs are not reproducible.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Transport timeout for the download in seconds. Unset means no timeout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            bucket_name: String::new(),
            object_name: String::new(),
            storage_path: default_storage_path(),
            train_ratio: default_train_ratio(),
            val_ratio: default_val_ratio(),
            artifact_dir: default_artifact_dir(),
            seed: None,
            timeout_secs: None,
        }
    }
}

fn default_storage_path() -> String {
    "s3.amazonaws.com".to_string()
}

fn default_train_ratio() -> f64 {
    0.8
}

fn default_val_ratio() -> f64 {
    0.1
}

fn default_artifact_dir() -> PathBuf {
    PathBuf::from("artifacts")
}

impl IngestionConfig {
    /// Source URL: `https://{bucket_name}.{storage_path}/{object_name}`.
    pub fn url(&self) -> String {
        format!(
            "https://{}.{}/{}",
            self.bucket_name, self.storage_path, self.object_name
        )
    }

    /// Directory receiving `train.csv`, `validation.csv` and `test.csv`.
    pub fn raw_dir(&self) -> PathBuf {
        self.artifact_dir.join("raw")
    }

    pub fn ratios(&self) -> SplitRatios {
        SplitRatios::new(self.train_ratio, self.val_ratio)
    }

    /// Describe settings that will run but likely produce surprising output.
    ///
    /// Nothing here is enforced: the run proceeds with the values as given.
    pub fn config_warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.bucket_name.trim().is_empty() {
            warnings.push("bucket_name is empty; the source URL will be malformed".to_string());
        }
        if self.object_name.trim().is_empty() {
            warnings.push("object_name is empty; the source URL will be malformed".to_string());
        }
        for (name, value) in [
            ("train_ratio", self.train_ratio),
            ("val_ratio", self.val_ratio),
        ] {
            if !(0.0..=1.0).contains(&value) {
                warnings.push(format!("{name} = {value} is outside [0, 1]"));
            }
        }
        let sum = self.train_ratio + self.val_ratio;
        if sum > 1.0 {
            warnings.push(format!(
                "train_ratio + val_ratio = {sum} exceeds 1; the test split will be empty"
            ));
        }

        warnings
    }
}

/// Load configuration from layered sources.
///
/// Priority (highest to lowest):
/// 1. Environment variables (prefixed with `DATASPLIT_`, `__` for nesting)
/// 2. Explicit config file (TOML, YAML or JSON by extension)
/// 3. Workspace config (`datasplit.toml`, then `config/config.yaml`)
/// 4. Built-in defaults
pub fn load_config(
    workspace: Option<&Path>,
    explicit: Option<&Path>,
) -> Result<DatasplitConfig, DatasplitError> {
    let mut figment = Figment::from(Serialized::defaults(DatasplitConfig::default()));

    if let Some(ws) = workspace {
        let yaml_config = ws.join(WORKSPACE_YAML_CONFIG);
        if yaml_config.exists() {
            figment = figment.merge(Yaml::file(&yaml_config));
        }
        let toml_config = ws.join(WORKSPACE_CONFIG_FILE);
        if toml_config.exists() {
            figment = figment.merge(Toml::file(&toml_config));
        }
    }

    if let Some(path) = explicit {
        if !path.exists() {
            return Err(DatasplitError::config(format!(
                "config file not found: {}",
                path.display()
            )));
        }
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        figment = match ext.as_deref() {
            Some("toml") => figment.merge(Toml::file(path)),
            Some("yaml") | Some("yml") => figment.merge(Yaml::file(path)),
            Some("json") => figment.merge(Json::file(path)),
            _ => {
                return Err(DatasplitError::config(format!(
                    "unsupported config format: {} (expected .toml, .yaml or .json)",
                    path.display()
                )));
            }
        };
    }

    // DATASPLIT_DATA_INGESTION__BUCKET_NAME, DATASPLIT_DATA_INGESTION__SEED, etc.
    figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

    Ok(figment.extract()?)
}

/// Whether a workspace config file exists.
pub fn config_exists(workspace: &Path) -> bool {
    workspace.join(WORKSPACE_CONFIG_FILE).exists() || workspace.join(WORKSPACE_YAML_CONFIG).exists()
}
