//! Per-release accumulation of normalized advisories.

mod drift;

pub use drift::{compute_drift, DownstreamSummary, DriftEntry, DriftSummary};

use crate::error::{DownspeedsError, Result};
use crate::model::{Advisory, Distribution, Release};
use std::collections::BTreeMap;

/// All advisories of one release, partitioned by distribution.
///
/// Each partition is kept sorted by issue date with ties broken by advisory
/// identifier; records with identical keys keep their arrival order.
/// Duplicates are not removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    release: Release,
    partitions: BTreeMap<Distribution, Vec<Advisory>>,
}

impl Dataset {
    /// Create an empty dataset for `release`.
    #[must_use]
    pub fn new(release: Release) -> Self {
        Self {
            release,
            partitions: BTreeMap::new(),
        }
    }

    /// Release this dataset covers.
    #[must_use]
    pub const fn release(&self) -> Release {
        self.release
    }

    /// Add one advisory at its ordered position.
    pub fn push(&mut self, advisory: Advisory) -> Result<()> {
        self.check_release(&advisory)?;
        let partition = self.partitions.entry(advisory.distribution).or_default();
        let index = partition.partition_point(|a| a.sort_key() <= advisory.sort_key());
        partition.insert(index, advisory);
        Ok(())
    }

    /// Add many advisories, sorting each touched partition once.
    pub fn extend<I>(&mut self, advisories: I) -> Result<()>
    where
        I: IntoIterator<Item = Advisory>,
    {
        let mut touched = Vec::new();
        for advisory in advisories {
            self.check_release(&advisory)?;
            if !touched.contains(&advisory.distribution) {
                touched.push(advisory.distribution);
            }
            self.partitions
                .entry(advisory.distribution)
                .or_default()
                .push(advisory);
        }
        for distribution in touched {
            if let Some(partition) = self.partitions.get_mut(&distribution) {
                partition.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
            }
        }
        Ok(())
    }

    fn check_release(&self, advisory: &Advisory) -> Result<()> {
        if advisory.release == self.release {
            Ok(())
        } else {
            Err(DownspeedsError::validation(format!(
                "{} advisory {} belongs to release {}, not {}",
                advisory.distribution, advisory.advisory_id, advisory.release, self.release
            )))
        }
    }

    /// Ordered advisories of one distribution.
    #[must_use]
    pub fn records(&self, distribution: Distribution) -> &[Advisory] {
        self.partitions
            .get(&distribution)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Number of advisories of one distribution.
    #[must_use]
    pub fn count(&self, distribution: Distribution) -> usize {
        self.records(distribution).len()
    }

    /// Advisory counts per distribution, zero counts omitted.
    #[must_use]
    pub fn counts(&self) -> BTreeMap<Distribution, usize> {
        self.partitions
            .iter()
            .filter(|(_, records)| !records.is_empty())
            .map(|(dist, records)| (*dist, records.len()))
            .collect()
    }

    /// Total number of advisories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.partitions.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every advisory in time-series order: issue date, then identifier,
    /// then distribution.
    #[must_use]
    pub fn ordered(&self) -> Vec<&Advisory> {
        let mut all: Vec<&Advisory> = self.partitions.values().flatten().collect();
        all.sort_by(|a, b| {
            a.sort_key()
                .cmp(&b.sort_key())
                .then(a.distribution.cmp(&b.distribution))
        });
        all
    }
}
