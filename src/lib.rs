//! **Security errata publication lag of RHEL and its rebuilds.**
//!
//! `downspeeds` downloads the security advisories that Red Hat Enterprise
//! Linux, AlmaLinux and Rocky Linux publish for a major release, brings them
//! into one record shape and writes a per-release result file. The file
//! holds every advisory in time-series order plus, for each RHEL advisory,
//! how many days each rebuild took to publish its counterpart.
//!
//! ## Core Concepts & Modules
//!
//! - **[`sources`]**: one adapter per upstream errata database. Adapters
//!   stream [`RawRecord`](sources::RawRecord)s lazily through an
//!   [`HttpTransport`](sources::HttpTransport).
//! - **[`normalize`]**: pure mapping of a raw record onto an [`Advisory`].
//! - **[`aggregate`]**: the per-release [`Dataset`] and the drift comparison.
//! - **[`reports`]**: the JSON result file read by the static viewer.
//! - **[`pipeline`]**: wires the above together for one release.
//!
//! ## Getting Started
//!
//! ```no_run
//! use downspeeds::cli::{run_gather, GatherConfig};
//! use downspeeds::model::Release;
//! use downspeeds::AppConfig;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = AppConfig::builder().output_dir("public").build();
//!     let code = run_gather(&GatherConfig::new(Some(Release::R9), config))?;
//!     std::process::exit(code);
//! }
//! ```
//!
//! ### Reading a result file
//!
//! ```no_run
//! use downspeeds::model::Distribution;
//! use downspeeds::reports::read_result_file;
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let file = read_result_file(Path::new("downspeeds-8.json"))?;
//!     let dataset = file.into_dataset()?;
//!     println!("{} Rocky Linux advisories", dataset.count(Distribution::RockyLinux));
//!     Ok(())
//! }
//! ```

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
#![allow(
    // Mean drift is computed from day counts far below f64 precision limits
    clippy::cast_precision_loss,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod aggregate;
pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod normalize;
pub mod pipeline;
pub mod reports;
pub mod sources;

// Re-export main types for convenience
pub use aggregate::{compute_drift, Dataset, DriftEntry, DriftSummary};
pub use config::{AppConfig, AppConfigBuilder, ConfigError, Validatable};
pub use error::{DownspeedsError, ErrorContext, FetchError, NormalizationError, Result};
pub use model::{Advisory, Distribution, Release};
pub use normalize::normalize;
pub use pipeline::{run_release, ReleaseOutcome, RunSettings, SourceStats};
pub use reports::{read_result_file, write_result_file, ResultFile};
pub use sources::{default_sources, ErrataSource, HttpClient, HttpTransport, RawRecord};
