//! Configuration types for downspeeds.

use super::defaults::{
    APP_DIR_NAME, DEFAULT_ALMALINUX_URL, DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_RHEL_ROWS,
    DEFAULT_RHEL_URL, DEFAULT_ROCKYLINUX_LIMIT, DEFAULT_ROCKYLINUX_URL,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

// ============================================================================
// Application Configuration
// ============================================================================

/// Top-level configuration, as read from `.downspeeds.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Upstream errata endpoints
    pub sources: SourcesConfig,
    /// HTTP client settings
    pub http: HttpConfig,
    /// Result file settings
    pub output: OutputConfig,
    /// Raw response cache settings
    pub cache: CacheConfig,
}

impl AppConfig {
    /// Create a new builder for `AppConfig`.
    #[must_use]
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }
}

// ============================================================================
// Source Configuration
// ============================================================================

/// Endpoints and paging of the three errata sources.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    pub rhel: RhelSourceConfig,
    pub almalinux: AlmaLinuxSourceConfig,
    pub rockylinux: RockyLinuxSourceConfig,
}

/// Red Hat customer portal search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RhelSourceConfig {
    /// Search endpoint
    pub url: String,
    /// Page size
    pub rows: usize,
}

impl Default for RhelSourceConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_RHEL_URL.to_string(),
            rows: DEFAULT_RHEL_ROWS,
        }
    }
}

/// AlmaLinux static errata documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlmaLinuxSourceConfig {
    /// Base URL; `<url>/<release>/errata.json` is fetched
    pub url: String,
}

impl Default for AlmaLinuxSourceConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_ALMALINUX_URL.to_string(),
        }
    }
}

/// Rocky Linux advisory API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RockyLinuxSourceConfig {
    /// Advisory listing endpoint
    pub url: String,
    /// Page size, at most 100
    pub limit: usize,
}

impl Default for RockyLinuxSourceConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_ROCKYLINUX_URL.to_string(),
            limit: DEFAULT_ROCKYLINUX_LIMIT,
        }
    }
}

// ============================================================================
// Sub-configuration Types
// ============================================================================

/// HTTP client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// User-Agent header; defaults to `downspeeds/<version>`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl HttpConfig {
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            user_agent: None,
        }
    }
}

/// Result file configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receiving `downspeeds-<release>.json`
    pub dir: PathBuf,
    /// Pretty-print the JSON
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            pretty: false,
        }
    }
}

/// Raw response cache configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Cache directory
    pub dir: PathBuf,
    /// Read raw records from the cache instead of the network when present
    pub use_cache: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: default_cache_dir(),
            use_cache: false,
        }
    }
}

fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR_NAME)
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for `AppConfig`
#[derive(Debug, Default)]
#[must_use]
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    /// Set the result file directory
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output.dir = dir.into();
        self
    }

    /// Pretty-print result files
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.config.output.pretty = pretty;
        self
    }

    /// Set the cache directory
    pub fn cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.cache.dir = dir.into();
        self
    }

    /// Enable reading raw records from the cache
    pub fn use_cache(mut self, enabled: bool) -> Self {
        self.config.cache.use_cache = enabled;
        self
    }

    /// Set the HTTP timeout in seconds
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.http.timeout_secs = secs;
        self
    }

    /// Build the configuration
    #[must_use]
    pub fn build(self) -> AppConfig {
        self.config
    }
}
