//! Random train/validation/test partitioning of CSV rows.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// A named subset of the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Split {
    Train,
    Validation,
    Test,
}

impl Split {
    /// All splits, in write order.
    pub const ALL: [Split; 3] = [Split::Train, Split::Validation, Split::Test];

    /// File stem used for this split's output (`train.csv`, ...).
    pub fn file_stem(self) -> &'static str {
        match self {
            Self::Train => "train",
            Self::Validation => "validation",
            Self::Test => "test",
        }
    }

    pub fn file_name(self) -> String {
        format!("{}.csv", self.file_stem())
    }
}

impl std::fmt::Display for Split {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.file_stem())
    }
}

/// Target fractions for train and validation; test takes whatever is left.
///
/// Ratios are used as given. A sum above 1 yields an empty test split.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SplitRatios {
    pub train: f64,
    pub validation: f64,
}

impl SplitRatios {
    pub fn new(train: f64, validation: f64) -> Self {
        Self { train, validation }
    }

    /// Row boundaries `(train_end, val_end)` for `total` rows.
    ///
    /// Each share is floored independently, so up to two rows drift into test.
    pub fn boundaries(&self, total: usize) -> (usize, usize) {
        let train_end = floor_share(total, self.train).min(total);
        let val_end = train_end
            .saturating_add(floor_share(total, self.validation))
            .min(total);
        (train_end, val_end)
    }
}

impl Default for SplitRatios {
    fn default() -> Self {
        Self {
            train: 0.8,
            validation: 0.1,
        }
    }
}

// Negative and NaN products saturate to 0 in the cast.
fn floor_share(total: usize, ratio: f64) -> usize {
    (total as f64 * ratio).floor() as usize
}

/// Header line plus data rows, as downloaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDataset {
    pub header: String,
    pub rows: Vec<String>,
}

impl RawDataset {
    /// Parse newline-delimited text: the first line is the header, the rest are rows.
    ///
    /// Surrounding whitespace of the whole text is trimmed first, so a trailing
    /// newline does not produce an empty final row. Blank lines inside the body
    /// are kept as rows.
    pub fn parse(text: &str) -> Self {
        let mut lines = text.trim().split('\n');
        let header = lines.next().unwrap_or_default().to_string();
        let rows = lines.map(str::to_string).collect();
        Self { header, rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Header plus three disjoint row groups.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DatasetSplits {
    pub header: String,
    pub train: Vec<String>,
    pub validation: Vec<String>,
    pub test: Vec<String>,
}

impl DatasetSplits {
    pub fn rows(&self, split: Split) -> &[String] {
        match split {
            Split::Train => &self.train,
            Split::Validation => &self.validation,
            Split::Test => &self.test,
        }
    }

    pub fn total_rows(&self) -> usize {
        self.train.len() + self.validation.len() + self.test.len()
    }
}

/// Shuffle `rows` with `rng` and cut them into train, validation and test.
pub fn split_rows<R: Rng + ?Sized>(
    mut rows: Vec<String>,
    ratios: SplitRatios,
    rng: &mut R,
) -> (Vec<String>, Vec<String>, Vec<String>) {
    rows.shuffle(rng);

    let (train_end, val_end) = ratios.boundaries(rows.len());
    let test = rows.split_off(val_end);
    let validation = rows.split_off(train_end);
    (rows, validation, test)
}

/// Parse `text` and split its rows.
///
/// With a seed the permutation is reproducible; without one it draws from the
/// thread-local RNG.
pub fn split_dataset(text: &str, ratios: SplitRatios, seed: Option<u64>) -> DatasetSplits {
    let raw = RawDataset::parse(text);
    let total = raw.row_count();
    let RawDataset { header, rows } = raw;

    let (train, validation, test) = match seed {
        Some(seed) => split_rows(rows, ratios, &mut StdRng::seed_from_u64(seed)),
        None => split_rows(rows, ratios, &mut rand::thread_rng()),
    };

    tracing::info!(
        total,
        train = train.len(),
        validation = validation.len(),
        test = test.len(),
        "Split summary"
    );

    DatasetSplits {
        header,
        train,
        validation,
        test,
    }
}
