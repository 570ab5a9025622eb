//! Configuration file loading and discovery.

use super::defaults::APP_DIR_NAME;
use super::types::AppConfig;
use std::path::{Path, PathBuf};

// ============================================================================
// Configuration File Discovery
// ============================================================================

/// Standard config file names to search for.
const CONFIG_FILE_NAMES: &[&str] = &[".downspeeds.yaml", ".downspeeds.yml", "downspeeds.yaml"];

/// Discover a config file by searching standard locations.
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Current directory
/// 3. User config directory (~/.config/downspeeds/)
/// 4. Home directory
#[must_use]
pub fn discover_config_file(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        if path.exists() {
            return Some(path.to_path_buf());
        }
        tracing::warn!("Config file {} does not exist", path.display());
    }

    let cwd = std::env::current_dir().ok();
    let user_config = dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME));
    let home = dirs::home_dir();

    [cwd, user_config, home]
        .into_iter()
        .flatten()
        .find_map(|dir| find_config_in_dir(&dir))
}

/// Find a config file in a specific directory.
fn find_config_in_dir(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}

// ============================================================================
// Configuration File Loading
// ============================================================================

/// Error type for config file operations.
#[derive(Debug)]
pub enum ConfigFileError {
    /// File not found
    NotFound(PathBuf),
    /// IO error reading file
    Io(std::io::Error),
    /// YAML parsing error
    Parse(serde_yaml_ng::Error),
}

impl std::fmt::Display for ConfigFileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(path) => {
                write!(f, "Config file not found: {}", path.display())
            }
            Self::Io(e) => write!(f, "Failed to read config file: {e}"),
            Self::Parse(e) => write!(f, "Failed to parse config file: {e}"),
        }
    }
}

impl std::error::Error for ConfigFileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NotFound(_) => None,
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for ConfigFileError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_yaml_ng::Error> for ConfigFileError {
    fn from(err: serde_yaml_ng::Error) -> Self {
        Self::Parse(err)
    }
}

/// Load an `AppConfig` from a YAML file.
pub fn load_config_file(path: &Path) -> Result<AppConfig, ConfigFileError> {
    if !path.exists() {
        return Err(ConfigFileError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(AppConfig::default());
    }
    let config: AppConfig = serde_yaml_ng::from_str(&content)?;
    Ok(config)
}

/// Load config from discovered file, or return default.
#[must_use]
pub fn load_or_default(explicit_path: Option<&Path>) -> (AppConfig, Option<PathBuf>) {
    discover_config_file(explicit_path).map_or_else(
        || (AppConfig::default(), None),
        |path| match load_config_file(&path) {
            Ok(config) => (config, Some(path)),
            Err(e) => {
                tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                (AppConfig::default(), None)
            }
        },
    )
}

// ============================================================================
// CLI Overrides
// ============================================================================

/// Values given on the command line. `None`/`false` leave the file value.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub output_dir: Option<PathBuf>,
    pub use_cache: bool,
}

impl AppConfig {
    /// Layer command line values over the file configuration.
    pub fn apply_overrides(&mut self, overrides: &CliOverrides) {
        if let Some(dir) = &overrides.output_dir {
            self.output.dir.clone_from(dir);
        }
        if overrides.use_cache {
            self.cache.use_cache = true;
        }
    }
}

// ============================================================================
// Example Config Generation
// ============================================================================

/// Render the default configuration as a commented YAML document.
#[must_use]
pub fn generate_example_config() -> String {
    let body = serde_yaml_ng::to_string(&AppConfig::default()).unwrap_or_default();
    format!("# downspeeds configuration\n# Place this file at ./.downspeeds.yaml or ~/.config/downspeeds/downspeeds.yaml\n\n{body}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_find_config_in_dir() {
        let tmp = TempDir::new().unwrap();
        assert!(find_config_in_dir(tmp.path()).is_none());

        let path = tmp.path().join(".downspeeds.yml");
        std::fs::write(&path, "output:\n  pretty: true\n").unwrap();
        assert_eq!(find_config_in_dir(tmp.path()), Some(path));
    }

    #[test]
    fn test_load_config_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("downspeeds.yaml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "http:\n  timeout_secs: 5\ncache:\n  use_cache: true").unwrap();

        let config = load_config_file(&path).unwrap();
        assert_eq!(config.http.timeout_secs, 5);
        assert!(config.cache.use_cache);
    }

    #[test]
    fn test_load_empty_file_gives_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("downspeeds.yaml");
        std::fs::write(&path, "").unwrap();
        assert_eq!(load_config_file(&path).unwrap(), AppConfig::default());
    }

    #[test]
    fn test_load_missing_and_invalid() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("nope.yaml");
        assert!(matches!(
            load_config_file(&missing),
            Err(ConfigFileError::NotFound(_))
        ));

        let broken = tmp.path().join("broken.yaml");
        std::fs::write(&broken, "http: [unterminated").unwrap();
        assert!(matches!(
            load_config_file(&broken),
            Err(ConfigFileError::Parse(_))
        ));
    }

    #[test]
    fn test_load_or_default_falls_back_on_parse_error() {
        let tmp = TempDir::new().unwrap();
        let broken = tmp.path().join("broken.yaml");
        std::fs::write(&broken, "sources: 12").unwrap();
        let (config, loaded) = load_or_default(Some(&broken));
        assert_eq!(config, AppConfig::default());
        assert!(loaded.is_none());
    }

    #[test]
    fn test_apply_overrides() {
        let mut config = AppConfig::default();
        config.output.dir = PathBuf::from("from-file");

        config.apply_overrides(&CliOverrides::default());
        assert_eq!(config.output.dir, PathBuf::from("from-file"));
        assert!(!config.cache.use_cache);

        config.apply_overrides(&CliOverrides {
            output_dir: Some(PathBuf::from("from-cli")),
            use_cache: true,
        });
        assert_eq!(config.output.dir, PathBuf::from("from-cli"));
        assert!(config.cache.use_cache);
    }

    #[test]
    fn test_example_config_parses() {
        let example = generate_example_config();
        let config: AppConfig = serde_yaml_ng::from_str(&example).unwrap();
        assert_eq!(config.sources, AppConfig::default().sources);
    }
}
