//! One full run for one release: gather, aggregate, compare, write.

use super::gather::{gather_source, SourceStats};
use super::PipelineError;
use crate::aggregate::{compute_drift, Dataset, DriftEntry, DriftSummary};
use crate::config::{AppConfig, OutputConfig};
use crate::model::{Distribution, Release};
use crate::reports::write_result_file;
use crate::sources::{ErrataSource, RawCache};
use std::path::PathBuf;

/// Run-wide settings shared by every release.
#[derive(Debug, Clone)]
pub struct RunSettings {
    /// Where raw records are stored after fetching
    pub cache: Option<RawCache>,
    /// Read raw records from the cache when usable
    pub use_cache: bool,
    pub output: OutputConfig,
}

impl RunSettings {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            cache: Some(RawCache::new(config.cache.dir.clone())),
            use_cache: config.cache.use_cache,
            output: config.output.clone(),
        }
    }
}

/// Everything a release run produced.
#[derive(Debug)]
pub struct ReleaseOutcome {
    pub release: Release,
    pub dataset: Dataset,
    pub drift: Vec<DriftEntry>,
    pub stats: Vec<SourceStats>,
    /// Sources that could not be fetched
    pub failures: Vec<PipelineError>,
    /// Result file that was written
    pub output: PathBuf,
}

impl ReleaseOutcome {
    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Gather every source for `release` and write the result file.
///
/// A source that fails to fetch contributes no records; the others are
/// still aggregated and written. Only a failure to write is an error.
pub fn run_release(
    release: Release,
    sources: &[Box<dyn ErrataSource>],
    settings: &RunSettings,
) -> Result<ReleaseOutcome, PipelineError> {
    let mut dataset = Dataset::new(release);
    let mut stats = Vec::with_capacity(sources.len());
    let mut failures = Vec::new();

    for source in sources {
        let distribution = source.distribution();
        match gather_source(source.as_ref(), release, settings.cache.as_ref(), settings.use_cache)
        {
            Ok((advisories, source_stats)) => {
                source_stats.log_summary();
                dataset
                    .extend(advisories)
                    .map_err(|source| PipelineError::Aggregate { release, source })?;
                stats.push(source_stats);
            }
            Err(source) => {
                tracing::error!("Unable to get {} {} errata: {}", distribution, release, source);
                failures.push(PipelineError::SourceFailed {
                    distribution,
                    release,
                    source,
                });
            }
        }
    }

    let drift = compute_drift(&dataset);
    DriftSummary::from_entries(&drift).log_summary();

    let failed_sources: Vec<Distribution> =
        failures.iter().filter_map(PipelineError::distribution).collect();
    let output = write_result_file(
        &settings.output.dir,
        &dataset,
        &drift,
        &failed_sources,
        settings.output.pretty,
    )
    .map_err(|source| PipelineError::WriteFailed { release, source })?;

    Ok(ReleaseOutcome {
        release,
        dataset,
        drift,
        stats,
        failures,
        output,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SourcesConfig;
    use crate::error::FetchError;
    use crate::reports::read_result_file;
    use crate::sources::testing::ScriptedTransport;
    use crate::sources::{default_sources, HttpTransport};
    use std::rc::Rc;
    use tempfile::TempDir;

    fn settings(dir: &TempDir) -> RunSettings {
        RunSettings {
            cache: None,
            use_cache: false,
            output: OutputConfig {
                dir: dir.path().to_path_buf(),
                pretty: true,
            },
        }
    }

    fn responses(alma: Result<String, FetchError>) -> Vec<Result<String, FetchError>> {
        vec![
            Ok(r#"{"response": {"numFound": 1, "docs": [
                {"id": "RHSA-2023:0001", "portal_publication_date": "2023-01-10T00:00:00Z"}
            ]}}"#
                .to_string()),
            alma,
            Ok(r#"{"advisories": [
                {"name": "RLSA-2023:0001", "type": "TYPE_SECURITY", "publishedAt": "2023-01-13T08:00:00Z"}
            ], "total": 1}"#
                .to_string()),
        ]
    }

    #[test]
    fn test_run_release_writes_dataset_and_drift() {
        let tmp = TempDir::new().unwrap();
        let transport: Rc<dyn HttpTransport> = Rc::new(ScriptedTransport::new(responses(Ok(
            r#"[{"updateinfo_id": "ALSA-2023:0001", "type": "security", "issued_date": {"$date": 1673308800000}}]"#
                .to_string(),
        ))));
        let sources = default_sources(&SourcesConfig::default(), &transport);

        let outcome = run_release(Release::R8, &sources, &settings(&tmp)).unwrap();
        assert!(!outcome.has_failures());
        assert_eq!(outcome.dataset.len(), 3);
        assert_eq!(outcome.stats.len(), 3);
        assert_eq!(outcome.drift[0].rockylinux_drift, Some(3));
        assert_eq!(outcome.drift[0].almalinux_drift, Some(0));

        let file = read_result_file(&outcome.output).unwrap();
        assert_eq!(file.advisories.len(), 3);
        assert_eq!(file.drift, outcome.drift);
        assert!(file.failed_sources.is_empty());
    }

    #[test]
    fn test_failed_source_is_recorded_and_others_written() {
        let tmp = TempDir::new().unwrap();
        let transport: Rc<dyn HttpTransport> = Rc::new(ScriptedTransport::new(responses(Err(
            FetchError::Network {
                url: "https://errata.almalinux.org/8/errata.json".to_string(),
                message: "connection refused".to_string(),
            },
        ))));
        let sources = default_sources(&SourcesConfig::default(), &transport);

        let outcome = run_release(Release::R8, &sources, &settings(&tmp)).unwrap();
        assert!(outcome.has_failures());
        assert!(matches!(
            outcome.failures[0],
            PipelineError::SourceFailed {
                distribution: Distribution::AlmaLinux,
                ..
            }
        ));
        assert_eq!(outcome.dataset.count(Distribution::AlmaLinux), 0);
        assert_eq!(outcome.dataset.count(Distribution::RockyLinux), 1);
        assert!(outcome.output.exists());

        let file = read_result_file(&outcome.output).unwrap();
        assert_eq!(file.failed_sources, vec![Distribution::AlmaLinux]);
        assert_eq!(file.drift[0].almalinux_drift, None);
        assert_eq!(file.drift[0].rockylinux_drift, Some(3));
    }
}
