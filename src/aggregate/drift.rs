//! Publication lag of downstream rebuilds behind RHEL.
//!
//! Every RHEL advisory is matched with the rebuild that carries the same
//! year and sequence number under the downstream prefix
//! (`RHSA-2023:1234` -> `RLSA-2023:1234`, `ALSA-2023:1234`).

use super::Dataset;
use crate::model::{Advisory, Distribution};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Lag of both rebuilds for one RHEL advisory. `None` means no rebuild was
/// found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriftEntry {
    pub rhel_name: String,
    pub rhel_date: NaiveDate,
    pub rockylinux_name: Option<String>,
    pub rockylinux_date: Option<NaiveDate>,
    /// Days between RHEL and Rocky Linux publication
    pub rockylinux_drift: Option<i64>,
    pub almalinux_name: Option<String>,
    pub almalinux_date: Option<NaiveDate>,
    /// Days between RHEL and AlmaLinux publication
    pub almalinux_drift: Option<i64>,
}

impl DriftEntry {
    fn unmatched(rhel: &Advisory) -> Self {
        Self {
            rhel_name: rhel.advisory_id.clone(),
            rhel_date: rhel.issue_date,
            rockylinux_name: None,
            rockylinux_date: None,
            rockylinux_drift: None,
            almalinux_name: None,
            almalinux_date: None,
            almalinux_drift: None,
        }
    }

    fn set_match(&mut self, downstream: &Advisory) {
        let name = Some(downstream.advisory_id.clone());
        let date = Some(downstream.issue_date);
        let drift = Some((downstream.issue_date - self.rhel_date).num_days());
        match downstream.distribution {
            Distribution::RockyLinux => {
                self.rockylinux_name = name;
                self.rockylinux_date = date;
                self.rockylinux_drift = drift;
            }
            Distribution::AlmaLinux => {
                self.almalinux_name = name;
                self.almalinux_date = date;
                self.almalinux_drift = drift;
            }
            Distribution::Rhel => {}
        }
    }

    /// Drift in days for one downstream distribution.
    #[must_use]
    pub const fn drift(&self, distribution: Distribution) -> Option<i64> {
        match distribution {
            Distribution::RockyLinux => self.rockylinux_drift,
            Distribution::AlmaLinux => self.almalinux_drift,
            Distribution::Rhel => Some(0),
        }
    }
}

/// Match every RHEL advisory of the dataset against both rebuilds.
///
/// Entries follow the dataset's RHEL order. When a downstream partition
/// holds the same identifier twice, the earliest record wins.
#[must_use]
pub fn compute_drift(dataset: &Dataset) -> Vec<DriftEntry> {
    let indexes: Vec<HashMap<&str, &Advisory>> = Distribution::DOWNSTREAM
        .iter()
        .map(|dist| {
            let mut index = HashMap::new();
            for advisory in dataset.records(*dist) {
                index.entry(advisory.advisory_id.as_str()).or_insert(advisory);
            }
            index
        })
        .collect();

    dataset
        .records(Distribution::Rhel)
        .iter()
        .map(|rhel| {
            let mut entry = DriftEntry::unmatched(rhel);
            for (dist, index) in Distribution::DOWNSTREAM.iter().zip(&indexes) {
                let found = dist
                    .rebrand(&rhel.advisory_id)
                    .and_then(|id| index.get(id.as_str()).copied());
                match found {
                    Some(downstream) => {
                        tracing::debug!(
                            "Found matching {} erratum '{}' from {} for '{}'",
                            dist,
                            downstream.advisory_id,
                            downstream.issue_date,
                            rhel.advisory_id
                        );
                        entry.set_match(downstream);
                    }
                    None => tracing::debug!(
                        "Found no matching {} erratum for '{}' ({})",
                        dist,
                        rhel.advisory_id,
                        rhel.synopsis.as_deref().unwrap_or("no synopsis")
                    ),
                }
            }
            entry
        })
        .collect()
}

/// Aggregate lag statistics of one downstream distribution.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DownstreamSummary {
    /// RHEL advisories with a rebuild
    pub matched: usize,
    /// RHEL advisories without a rebuild
    pub missing: usize,
    pub mean_days: Option<f64>,
    /// Mean of the two middle values when the count is even
    pub median_days: Option<f64>,
    pub max_days: Option<i64>,
}

/// Lag statistics over a set of drift entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DriftSummary {
    /// Number of RHEL advisories compared
    pub rhel_total: usize,
    pub downstream: BTreeMap<Distribution, DownstreamSummary>,
}

impl DriftSummary {
    #[must_use]
    pub fn from_entries(entries: &[DriftEntry]) -> Self {
        let downstream = Distribution::DOWNSTREAM
            .iter()
            .map(|dist| {
                let mut drifts: Vec<i64> = entries.iter().filter_map(|e| e.drift(*dist)).collect();
                drifts.sort_unstable();

                let summary = DownstreamSummary {
                    matched: drifts.len(),
                    missing: entries.len() - drifts.len(),
                    mean_days: (!drifts.is_empty())
                        .then(|| drifts.iter().sum::<i64>() as f64 / drifts.len() as f64),
                    median_days: median(&drifts),
                    max_days: drifts.last().copied(),
                };
                (*dist, summary)
            })
            .collect();

        Self {
            rhel_total: entries.len(),
            downstream,
        }
    }

    /// Log one line per downstream distribution.
    pub fn log_summary(&self) {
        for (dist, summary) in &self.downstream {
            tracing::info!(
                "{}: {}/{} RHEL advisories rebuilt, mean lag {} days, median {} days, max {} days",
                dist,
                summary.matched,
                self.rhel_total,
                summary
                    .mean_days
                    .map_or_else(|| "-".to_string(), |d| format!("{d:.1}")),
                summary
                    .median_days
                    .map_or_else(|| "-".to_string(), |d| format!("{d:.1}")),
                summary
                    .max_days
                    .map_or_else(|| "-".to_string(), |d| d.to_string()),
            );
        }
    }
}

/// Median of sorted values.
fn median(sorted: &[i64]) -> Option<f64> {
    let mid = sorted.len() / 2;
    match sorted.len() {
        0 => None,
        n if n % 2 == 1 => Some(sorted[mid] as f64),
        _ => Some((sorted[mid - 1] + sorted[mid]) as f64 / 2.0),
    }
}
