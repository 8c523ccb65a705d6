//! Persisting split row groups as CSV files.

use crate::error::DatasplitError;
use crate::split::{DatasetSplits, Split};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::io::{AsyncWriteExt, BufWriter};

/// What was written for one split.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitSummary {
    pub split: Split,
    pub rows: usize,
    pub path: PathBuf,
}

/// Write `train.csv`, `validation.csv` and `test.csv` into `dir`.
///
/// `dir` is created if absent. Existing files are truncated. Every line,
/// the header included, is terminated with `\n`. A failure stops the loop and
/// leaves files already written in place.
pub async fn write_splits(
    dir: &Path,
    splits: &DatasetSplits,
) -> Result<Vec<SplitSummary>, DatasplitError> {
    tokio::fs::create_dir_all(dir).await.map_err(|e| {
        tracing::error!(path = %dir.display(), error = %e, "Failed to create output directory");
        DatasplitError::filesystem(dir, e)
    })?;

    let mut summaries = Vec::with_capacity(Split::ALL.len());
    for split in Split::ALL {
        let path = dir.join(split.file_name());
        let rows = splits.rows(split);

        if let Err(e) = write_csv(&path, &splits.header, rows).await {
            tracing::error!(path = %path.display(), error = %e, %split, "Failed to write split");
            return Err(DatasplitError::filesystem(path, e));
        }

        tracing::info!(
            %split,
            records = rows.len(),
            path = %path.display(),
            "Saved split data"
        );
        summaries.push(SplitSummary {
            split,
            rows: rows.len(),
            path,
        });
    }

    Ok(summaries)
}

async fn write_csv(path: &Path, header: &str, rows: &[String]) -> std::io::Result<()> {
    let file = tokio::fs::File::create(path).await?;
    let mut out = BufWriter::new(file);
    write_line(&mut out, header).await?;
    for row in rows {
        write_line(&mut out, row).await?;
    }
    out.flush().await?;
    Ok(())
}

async fn write_line(out: &mut BufWriter<tokio::fs::File>, line: &str) -> std::io::Result<()> {
    out.write_all(line.as_bytes()).await?;
    out.write_all(b"\n").await
}
