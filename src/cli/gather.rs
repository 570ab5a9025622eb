//! Gather command handler.
//!
//! Runs every selected release through the pipeline and maps the outcome
//! onto an exit code.

use crate::config::{AppConfig, Validatable};
use crate::model::Release;
use crate::pipeline::{exit_code, exit_codes, run_release, RunSettings};
use crate::sources::{default_sources, HttpClient, HttpTransport};
use anyhow::{Context, Result};
use std::rc::Rc;

/// Gather command configuration
#[derive(Debug, Clone)]
pub struct GatherConfig {
    /// Releases to process, in order
    pub releases: Vec<Release>,
    pub app: AppConfig,
}

impl GatherConfig {
    /// Process `release` only, or every release when `None`.
    #[must_use]
    pub fn new(release: Option<Release>, app: AppConfig) -> Self {
        let releases = release.map_or_else(|| Release::ALL.to_vec(), |r| vec![r]);
        Self { releases, app }
    }
}

/// Run the gather command against the live errata sources, returning the
/// desired exit code.
///
/// The caller is responsible for calling `std::process::exit()` with the
/// returned code when it is non-zero.
pub fn run_gather(config: &GatherConfig) -> Result<i32> {
    if let Some(code) = check_config(&config.app) {
        return Ok(code);
    }
    let client = HttpClient::new(&config.app.http).context("Failed to build HTTP client")?;
    run_gather_with(config, Rc::new(client))
}

/// Run the gather command over an arbitrary transport.
pub fn run_gather_with(config: &GatherConfig, transport: Rc<dyn HttpTransport>) -> Result<i32> {
    if let Some(code) = check_config(&config.app) {
        return Ok(code);
    }

    let sources = default_sources(&config.app.sources, &transport);
    let settings = RunSettings::from_config(&config.app);

    let mut outcomes = Vec::with_capacity(config.releases.len());
    for release in &config.releases {
        tracing::info!("Processing release {}", release);
        let outcome = run_release(*release, &sources, &settings)
            .with_context(|| format!("Release {release} failed"))?;
        for failure in &outcome.failures {
            tracing::warn!("{}", failure);
        }
        outcomes.push(outcome);
    }

    let code = exit_code(&outcomes);
    if code != exit_codes::SUCCESS {
        tracing::error!("Some errata sources could not be fetched; result files are incomplete");
    }
    Ok(code)
}

fn check_config(config: &AppConfig) -> Option<i32> {
    let errors = config.validate();
    if errors.is_empty() {
        return None;
    }
    for error in &errors {
        tracing::error!("Invalid configuration: {}", error);
    }
    Some(exit_codes::ERROR)
}
