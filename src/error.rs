//! Unified error types for downspeeds.
//!
//! Two domain kinds live next to the crate-wide [`DownspeedsError`]:
//! [`FetchError`] for anything that goes wrong talking to an errata source and
//! [`NormalizationError`] for a single record that cannot be mapped onto an
//! [`Advisory`](crate::model::Advisory). Both are terminal for one source or
//! one record only, so the pipeline handles them where they occur instead of
//! converting them. [`DownspeedsError`] covers file IO, (de)serialization and
//! dataset validation.

use crate::model::Distribution;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for downspeeds operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum DownspeedsError {
    /// IO errors with context
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Result or cache file (de)serialization errors
    #[error("Serialization failed: {0}")]
    Serialization(String),

    /// Validation errors
    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Failure to retrieve a page or document from an errata source.
///
/// Any of these is terminal for the source within a run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum FetchError {
    #[error("Network error for {url}: {message}")]
    Network { url: String, message: String },

    #[error("{url} returned HTTP status {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("Invalid response from {url}: {message}")]
    InvalidResponse { url: String, message: String },

    #[error("Failed to create HTTP client: {0}")]
    Client(String),
}

impl FetchError {
    /// Create an invalid-response error from a JSON decoding failure.
    pub fn invalid_json(url: impl Into<String>, err: &serde_json::Error) -> Self {
        Self::InvalidResponse {
            url: url.into(),
            message: err.to_string(),
        }
    }
}

/// A single raw record that could not be turned into an advisory.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NormalizationError {
    #[error("{distribution} record is missing required field '{field}'")]
    MissingField {
        distribution: Distribution,
        field: &'static str,
    },

    #[error("{distribution} advisory {id} has unparseable date '{value}'")]
    InvalidDate {
        distribution: Distribution,
        id: String,
        value: String,
    },

    #[error("{distribution} advisory identifier '{id}' is malformed")]
    InvalidIdentifier { distribution: Distribution, id: String },
}

// ============================================================================
// Result type alias
// ============================================================================

/// Convenient Result type for downspeeds operations
pub type Result<T> = std::result::Result<T, DownspeedsError>;

// ============================================================================
// Error construction helpers
// ============================================================================

impl DownspeedsError {
    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        let message = format!("{source}");
        Self::Io {
            path: Some(path),
            message,
            source,
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

// ============================================================================
// Conversions from existing error types
// ============================================================================

impl From<std::io::Error> for DownspeedsError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: None,
            message: format!("{err}"),
            source: err,
        }
    }
}

impl From<serde_json::Error> for DownspeedsError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

// ============================================================================
// Error context extension trait
// ============================================================================

/// Extension trait for adding context to errors.
///
/// Context strings are chained outermost first, so a nested failure reads
/// like `writing release 8: serializing release 8: ...`.
///
/// # Example
///
/// ```ignore
/// use downspeeds::error::ErrorContext;
///
/// let file = read_result_file(&path)
///     .with_context(|| format!("reading {}", path.display()))?;
/// ```
pub trait ErrorContext<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context from a closure, only evaluated on error.
    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: Into<DownspeedsError>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        let ctx: String = context.into();
        self.map_err(|e| add_context_to_error(e.into(), &ctx))
    }

    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| {
            let ctx: String = f().into();
            add_context_to_error(e.into(), &ctx)
        })
    }
}

/// Add context to an error, chaining with any existing context.
fn add_context_to_error(err: DownspeedsError, new_ctx: &str) -> DownspeedsError {
    match err {
        DownspeedsError::Io {
            path,
            message,
            source,
        } => DownspeedsError::Io {
            path,
            message: chain_context(new_ctx, &message),
            source,
        },
        DownspeedsError::Serialization(msg) => {
            DownspeedsError::Serialization(chain_context(new_ctx, &msg))
        }
        DownspeedsError::Validation(msg) => {
            DownspeedsError::Validation(chain_context(new_ctx, &msg))
        }
    }
}

/// Chain two context strings together.
///
/// If the existing context is empty, returns just the new context.
/// Otherwise, returns "`new_context`: `existing_context`".
fn chain_context(new: &str, existing: &str) -> String {
    if existing.is_empty() {
        new.to_string()
    } else {
        format!("{new}: {existing}")
    }
}
