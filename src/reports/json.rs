//! JSON result file: one document per release.

use crate::aggregate::{Dataset, DriftEntry};
use crate::error::{DownspeedsError, ErrorContext, Result};
use crate::model::{Advisory, Distribution, Release};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name of the result document of one release.
#[must_use]
pub fn result_file_name(release: Release) -> String {
    format!("downspeeds-{release}.json")
}

/// The document written for one release.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultFile {
    pub release: Release,
    pub generated_at: DateTime<Utc>,
    /// Advisories of all distributions in time-series order
    pub advisories: Vec<ResultEntry>,
    /// Lag of the rebuilds behind each RHEL advisory
    pub drift: Vec<DriftEntry>,
    /// Distributions that could not be fetched; their drift columns are null
    #[serde(default)]
    pub failed_sources: Vec<Distribution>,
}

/// One advisory line of the result file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultEntry {
    pub distribution: Distribution,
    pub advisory_id: String,
    pub issue_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub synopsis: Option<String>,
}

impl From<&Advisory> for ResultEntry {
    fn from(advisory: &Advisory) -> Self {
        Self {
            distribution: advisory.distribution,
            advisory_id: advisory.advisory_id.clone(),
            issue_date: advisory.issue_date,
            severity: advisory.severity.clone(),
            synopsis: advisory.synopsis.clone(),
        }
    }
}

impl ResultFile {
    /// Build the document for a dataset and its drift entries.
    #[must_use]
    pub fn new(
        dataset: &Dataset,
        drift: Vec<DriftEntry>,
        failed_sources: Vec<Distribution>,
    ) -> Self {
        Self {
            release: dataset.release(),
            generated_at: Utc::now(),
            advisories: dataset.ordered().into_iter().map(ResultEntry::from).collect(),
            drift,
            failed_sources,
        }
    }

    /// Rebuild the dataset the document was written from.
    ///
    /// Advisory kinds are not persisted, so the records come back without one.
    pub fn into_dataset(self) -> Result<Dataset> {
        let release = self.release;
        let mut dataset = Dataset::new(release);
        dataset.extend(self.advisories.into_iter().map(|entry| Advisory {
            distribution: entry.distribution,
            release,
            advisory_id: entry.advisory_id,
            issue_date: entry.issue_date,
            severity: entry.severity,
            kind: None,
            synopsis: entry.synopsis,
        }))?;
        Ok(dataset)
    }

    fn to_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }
}

/// Write `<dir>/downspeeds-<release>.json`, creating `dir` when missing.
///
/// An existing file is overwritten in place. `failed_sources` lists the
/// distributions whose fetch failed during this run.
pub fn write_result_file(
    dir: &Path,
    dataset: &Dataset,
    drift: &[DriftEntry],
    failed_sources: &[Distribution],
    pretty: bool,
) -> Result<PathBuf> {
    std::fs::create_dir_all(dir).map_err(|e| DownspeedsError::io(dir, e))?;

    let path = dir.join(result_file_name(dataset.release()));
    let json = ResultFile::new(dataset, drift.to_vec(), failed_sources.to_vec())
        .to_json(pretty)
        .with_context(|| format!("serializing release {}", dataset.release()))?;
    std::fs::write(&path, json).map_err(|e| DownspeedsError::io(&path, e))?;

    tracing::info!(
        "Wrote {} advisories and {} drift entries to {}",
        dataset.len(),
        drift.len(),
        path.display()
    );
    Ok(path)
}

/// Read a result file back.
pub fn read_result_file(path: &Path) -> Result<ResultFile> {
    let content = std::fs::read_to_string(path).map_err(|e| DownspeedsError::io(path, e))?;
    let file: ResultFile = serde_json::from_str(&content)
        .with_context(|| format!("parsing {}", path.display()))?;
    Ok(file)
}
