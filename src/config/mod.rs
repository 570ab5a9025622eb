//! Configuration for downspeeds.
//!
//! Settings come from a YAML file, discovered automatically or given with
//! `--config`, with command line flags layered on top:
//!
//! ```yaml
//! sources:
//!   rhel:
//!     rows: 500
//!   rockylinux:
//!     limit: 100
//! http:
//!   timeout_secs: 60
//! output:
//!   dir: /var/www/downspeeds
//!   pretty: true
//! cache:
//!   use_cache: true
//! ```

mod defaults;
pub mod file;
mod types;
mod validation;

pub use defaults::{
    DEFAULT_ALMALINUX_URL, DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_RHEL_ROWS, DEFAULT_RHEL_URL,
    DEFAULT_ROCKYLINUX_LIMIT, DEFAULT_ROCKYLINUX_URL,
};
pub use file::{
    discover_config_file, generate_example_config, load_config_file, load_or_default,
    CliOverrides, ConfigFileError,
};
pub use types::{
    AlmaLinuxSourceConfig, AppConfig, AppConfigBuilder, CacheConfig, HttpConfig, OutputConfig,
    RhelSourceConfig, RockyLinuxSourceConfig, SourcesConfig,
};
pub use validation::{ConfigError, Validatable};
