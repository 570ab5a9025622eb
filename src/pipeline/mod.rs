//! Run orchestration: sources -> normalizer -> dataset -> drift -> result file.

mod gather;
mod release;

pub use gather::{gather_source, SourceStats};
pub use release::{run_release, ReleaseOutcome, RunSettings};

use crate::error::{DownspeedsError, FetchError};
use crate::model::{Distribution, Release};

/// Structured pipeline error types for better diagnostics.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// A source could not be fetched; the release continues without it
    #[error("{distribution} {release} errata unavailable: {source}")]
    SourceFailed {
        distribution: Distribution,
        release: Release,
        #[source]
        source: FetchError,
    },

    /// Normalized records could not be added to the dataset
    #[error("Aggregating release {release} failed: {source}")]
    Aggregate {
        release: Release,
        #[source]
        source: DownspeedsError,
    },

    /// The result file could not be written
    #[error("Writing release {release} failed: {source}")]
    WriteFailed {
        release: Release,
        #[source]
        source: DownspeedsError,
    },
}

impl PipelineError {
    /// Distribution of a failed source.
    #[must_use]
    pub const fn distribution(&self) -> Option<Distribution> {
        match self {
            Self::SourceFailed { distribution, .. } => Some(*distribution),
            Self::Aggregate { .. } | Self::WriteFailed { .. } => None,
        }
    }
}

/// Process exit codes
pub mod exit_codes {
    /// Every source of every selected release was fetched
    pub const SUCCESS: i32 = 0;
    /// At least one source could not be fetched
    pub const FETCH_FAILED: i32 = 1;
    /// Configuration, IO or other error
    pub const ERROR: i32 = 3;
}

/// Exit code for a set of completed release runs.
#[must_use]
pub fn exit_code(outcomes: &[ReleaseOutcome]) -> i32 {
    if outcomes.iter().any(ReleaseOutcome::has_failures) {
        exit_codes::FETCH_FAILED
    } else {
        exit_codes::SUCCESS
    }
}
