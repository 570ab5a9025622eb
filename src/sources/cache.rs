//! On-disk copy of the raw records of each source.
//!
//! Every successful fetch is written to `<dir>/<distribution>-<release>.json`.
//! With `--use-cache` a valid copy is read back instead of hitting the
//! network, which is mostly useful while working on normalization.

use super::RawRecord;
use crate::error::{DownspeedsError, Result};
use crate::model::{Distribution, Release};
use std::fs;
use std::path::PathBuf;

/// Raw record cache rooted at one directory.
#[derive(Debug, Clone)]
pub struct RawCache {
    dir: PathBuf,
}

impl RawCache {
    /// Create a cache; the directory is created on first store.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Cache file for one source and release.
    #[must_use]
    pub fn path(&self, distribution: Distribution, release: Release) -> PathBuf {
        self.dir
            .join(format!("{}-{}.json", distribution.slug(), release))
    }

    /// Load cached records if the file is present and usable.
    ///
    /// A missing, unreadable, empty or foreign cache file yields `None`
    /// and the caller fetches instead.
    pub fn load(&self, distribution: Distribution, release: Release) -> Option<Vec<RawRecord>> {
        let path = self.path(distribution, release);
        tracing::debug!("Checking {} cache file {}", distribution, path.display());

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                tracing::info!("No usable {} cache at {}: {}", distribution, path.display(), e);
                return None;
            }
        };

        let records: Vec<RawRecord> = match serde_json::from_str(&content) {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!("Cache file {} is invalid, re-downloading: {}", path.display(), e);
                return None;
            }
        };

        if records.is_empty() {
            tracing::warn!("Cache file {} contains no errata, re-downloading", path.display());
            return None;
        }

        if records.iter().any(|r| r.distribution() != distribution) {
            tracing::warn!(
                "Cache file {} holds records of another distribution, re-downloading",
                path.display()
            );
            return None;
        }

        tracing::info!("Using cached {} {} errata ({} records)", distribution, release, records.len());
        Some(records)
    }

    /// Store the raw records of one source and release.
    pub fn store(
        &self,
        distribution: Distribution,
        release: Release,
        records: &[RawRecord],
    ) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir).map_err(|e| DownspeedsError::io(&self.dir, e))?;

        let path = self.path(distribution, release);
        let content = serde_json::to_string(records)?;
        fs::write(&path, content).map_err(|e| DownspeedsError::io(&path, e))?;

        tracing::debug!("Wrote {} raw records to {}", records.len(), path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::{AlmaErratum, RhelErratum};
    use tempfile::TempDir;

    fn alma(id: &str) -> RawRecord {
        RawRecord::AlmaLinux(AlmaErratum {
            updateinfo_id: Some(id.to_string()),
            ..AlmaErratum::default()
        })
    }

    #[test]
    fn test_store_then_load() {
        let temp_dir = TempDir::new().unwrap();
        let cache = RawCache::new(temp_dir.path().join("nested"));
        let records = vec![alma("ALSA-2023:0001"), alma("ALSA-2023:0002")];

        let path = cache.store(Distribution::AlmaLinux, Release::R8, &records).unwrap();
        assert!(path.ends_with("almalinux-8.json"));

        let loaded = cache.load(Distribution::AlmaLinux, Release::R8).unwrap();
        assert_eq!(loaded, records);
    }

    #[test]
    fn test_missing_cache() {
        let temp_dir = TempDir::new().unwrap();
        let cache = RawCache::new(temp_dir.path());
        assert!(cache.load(Distribution::Rhel, Release::R9).is_none());
    }

    #[test]
    fn test_empty_cache_is_ignored() {
        let temp_dir = TempDir::new().unwrap();
        let cache = RawCache::new(temp_dir.path());
        cache.store(Distribution::Rhel, Release::R9, &[]).unwrap();
        assert!(cache.load(Distribution::Rhel, Release::R9).is_none());
    }

    #[test]
    fn test_corrupt_cache_is_ignored() {
        let temp_dir = TempDir::new().unwrap();
        let cache = RawCache::new(temp_dir.path());
        fs::write(cache.path(Distribution::Rhel, Release::R8), "{not json").unwrap();
        assert!(cache.load(Distribution::Rhel, Release::R8).is_none());
    }

    #[test]
    fn test_foreign_records_are_ignored() {
        let temp_dir = TempDir::new().unwrap();
        let cache = RawCache::new(temp_dir.path());
        let records = vec![RawRecord::Rhel(RhelErratum::default())];
        fs::write(
            cache.path(Distribution::AlmaLinux, Release::R8),
            serde_json::to_string(&records).unwrap(),
        )
        .unwrap();
        assert!(cache.load(Distribution::AlmaLinux, Release::R8).is_none());
    }
}
