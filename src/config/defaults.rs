//! Default values for downspeeds configuration.

/// Red Hat customer portal search endpoint (Hydra KCS).
pub const DEFAULT_RHEL_URL: &str = "https://access.redhat.com/hydra/rest/search/kcs";

/// Base URL of the AlmaLinux errata mirror.
pub const DEFAULT_ALMALINUX_URL: &str = "https://errata.almalinux.org";

/// Rocky Linux Apollo advisory API.
pub const DEFAULT_ROCKYLINUX_URL: &str = "https://errata.rockylinux.org/api/v2/advisories";

/// Rows per RHEL search page.
pub const DEFAULT_RHEL_ROWS: usize = 1000;

/// Advisories per Rocky Linux page. The API refuses anything larger.
pub const DEFAULT_ROCKYLINUX_LIMIT: usize = 100;

/// Per-request network timeout in seconds.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Directory name used below the platform cache and config directories.
pub const APP_DIR_NAME: &str = "downspeeds";
