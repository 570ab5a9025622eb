//! Fetch and normalize the records of one source.

use crate::error::FetchError;
use crate::model::{Advisory, Distribution, Release};
use crate::normalize::normalize;
use crate::sources::{ErrataSource, RawCache, RawRecord};

/// What happened to the records of one source during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceStats {
    pub distribution: Distribution,
    pub release: Release,
    /// Raw records received
    pub fetched: usize,
    /// Records that became advisories
    pub normalized: usize,
    /// Records rejected by the normalizer
    pub skipped: usize,
    /// Non-security records dropped
    pub filtered: usize,
    /// HTTP requests issued; zero when served from cache
    pub requests: u32,
    pub from_cache: bool,
}

impl SourceStats {
    const fn new(distribution: Distribution, release: Release) -> Self {
        Self {
            distribution,
            release,
            fetched: 0,
            normalized: 0,
            skipped: 0,
            filtered: 0,
            requests: 0,
            from_cache: false,
        }
    }

    pub fn log_summary(&self) {
        tracing::info!(
            "{} {}: {} advisories from {} records ({} skipped, {} filtered, {})",
            self.distribution,
            self.release,
            self.normalized,
            self.fetched,
            self.skipped,
            self.filtered,
            if self.from_cache {
                "cached".to_string()
            } else {
                format!("{} requests", self.requests)
            }
        );
    }
}

/// Retrieve the raw records of a source, from cache when allowed.
///
/// A failed fetch discards whatever was already received.
fn retrieve(
    source: &dyn ErrataSource,
    release: Release,
    cache: Option<&RawCache>,
    use_cache: bool,
    stats: &mut SourceStats,
) -> Result<Vec<RawRecord>, FetchError> {
    let distribution = source.distribution();

    if use_cache {
        if let Some(records) = cache.and_then(|c| c.load(distribution, release)) {
            stats.from_cache = true;
            return Ok(records);
        }
    }

    tracing::info!(
        "Downloading {} {} errata from {}",
        distribution,
        release,
        source.endpoint(release)
    );
    let mut stream = source.records(release);
    let mut records = Vec::new();
    for record in stream.by_ref() {
        records.push(record?);
    }
    stats.requests = stream.requests();

    if let Some(cache) = cache {
        if let Err(e) = cache.store(distribution, release, &records) {
            tracing::warn!("Failed to cache {} {} errata: {}", distribution, release, e);
        }
    }
    Ok(records)
}

/// Fetch one source for one release and normalize its records.
///
/// Records the normalizer rejects are skipped with a warning. Records with
/// a non-security kind are dropped.
pub fn gather_source(
    source: &dyn ErrataSource,
    release: Release,
    cache: Option<&RawCache>,
    use_cache: bool,
) -> Result<(Vec<Advisory>, SourceStats), FetchError> {
    let mut stats = SourceStats::new(source.distribution(), release);
    let raw = retrieve(source, release, cache, use_cache, &mut stats)?;
    stats.fetched = raw.len();

    let mut advisories = Vec::with_capacity(raw.len());
    for record in &raw {
        match normalize(record, release) {
            Ok(advisory) if !advisory.is_security() => {
                tracing::debug!(
                    "Skipping non-security {} advisory {}",
                    advisory.distribution,
                    advisory.advisory_id
                );
                stats.filtered += 1;
            }
            Ok(advisory) => advisories.push(advisory),
            Err(e) => {
                tracing::warn!("Skipping record: {}", e);
                stats.skipped += 1;
            }
        }
    }
    stats.normalized = advisories.len();

    Ok((advisories, stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AlmaLinuxSourceConfig;
    use crate::sources::testing::ScriptedTransport;
    use crate::sources::{AlmaErratum, AlmaLinuxSource, HttpTransport, RawDate};
    use std::rc::Rc;
    use tempfile::TempDir;

    const DOCUMENT: &str = r#"[
        {"updateinfo_id": "ALSA-2023:0001", "type": "security", "issued_date": {"$date": 1673308800000}},
        {"updateinfo_id": "ALBA-2023:0002", "type": "bugfix", "issued_date": {"$date": 1673308800000}},
        {"updateinfo_id": "ALSA-2023:0003", "type": "security"},
        {"updateinfo_id": "ALSA-2023:0004", "type": "security", "issued_date": {"$date": 1673481600000}}
    ]"#;

    fn alma(transport: &Rc<ScriptedTransport>) -> AlmaLinuxSource {
        let transport: Rc<dyn HttpTransport> = transport.clone();
        AlmaLinuxSource::new(AlmaLinuxSourceConfig::default(), transport)
    }

    #[test]
    fn test_counts_filtered_and_skipped() {
        let transport = Rc::new(ScriptedTransport::new(vec![Ok(DOCUMENT.to_string())]));
        let (advisories, stats) = gather_source(&alma(&transport), Release::R8, None, false).unwrap();

        let ids: Vec<_> = advisories.iter().map(|a| a.advisory_id.as_str()).collect();
        assert_eq!(ids, vec!["ALSA-2023:0001", "ALSA-2023:0004"]);
        assert_eq!(stats.fetched, 4);
        assert_eq!(stats.normalized, 2);
        assert_eq!(stats.filtered, 1);
        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.requests, 1);
        assert!(!stats.from_cache);
    }

    #[test]
    fn test_fetch_error_propagates() {
        let transport = Rc::new(ScriptedTransport::new(vec![Err(FetchError::HttpStatus {
            url: "https://errata.almalinux.org/8/errata.json".to_string(),
            status: 503,
        })]));
        let err = gather_source(&alma(&transport), Release::R8, None, false).unwrap_err();
        assert!(matches!(err, FetchError::HttpStatus { status: 503, .. }));
    }

    #[test]
    fn test_fetch_stores_cache_and_cache_avoids_network() {
        let tmp = TempDir::new().unwrap();
        let cache = RawCache::new(tmp.path());

        let transport = Rc::new(ScriptedTransport::new(vec![Ok(DOCUMENT.to_string())]));
        gather_source(&alma(&transport), Release::R8, Some(&cache), false).unwrap();
        assert!(cache.path(Distribution::AlmaLinux, Release::R8).exists());

        let offline = Rc::new(ScriptedTransport::default());
        let (advisories, stats) =
            gather_source(&alma(&offline), Release::R8, Some(&cache), true).unwrap();
        assert!(offline.requests().is_empty());
        assert!(stats.from_cache);
        assert_eq!(stats.requests, 0);
        assert_eq!(advisories.len(), 2);
    }

    #[test]
    fn test_corrupt_cache_falls_back_to_fetch() {
        let tmp = TempDir::new().unwrap();
        let cache = RawCache::new(tmp.path());
        std::fs::write(cache.path(Distribution::AlmaLinux, Release::R9), "[]").unwrap();

        let transport = Rc::new(ScriptedTransport::new(vec![Ok(DOCUMENT.to_string())]));
        let (_, stats) = gather_source(&alma(&transport), Release::R9, Some(&cache), true).unwrap();
        assert!(!stats.from_cache);
        assert_eq!(transport.requests().len(), 1);
    }

    #[test]
    fn test_cached_records_are_normalized_for_release() {
        let tmp = TempDir::new().unwrap();
        let cache = RawCache::new(tmp.path());
        let record = RawRecord::AlmaLinux(AlmaErratum {
            updateinfo_id: Some("ALSA-2023:0100".to_string()),
            issued_date: Some(RawDate::Text("2023-06-01".to_string())),
            ..AlmaErratum::default()
        });
        cache
            .store(Distribution::AlmaLinux, Release::R9, &[record])
            .unwrap();

        let offline = Rc::new(ScriptedTransport::default());
        let (advisories, _) =
            gather_source(&alma(&offline), Release::R9, Some(&cache), true).unwrap();
        assert_eq!(advisories[0].release, Release::R9);
    }
}
