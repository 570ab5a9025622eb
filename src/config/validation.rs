//! Configuration validation for downspeeds.

use super::types::{
    AlmaLinuxSourceConfig, AppConfig, HttpConfig, RhelSourceConfig, RockyLinuxSourceConfig,
    SourcesConfig,
};
use crate::sources::ROCKY_MAX_LIMIT;

// ============================================================================
// Configuration Error
// ============================================================================

/// Error type for configuration validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    /// The field that failed validation
    pub field: String,
    /// Description of the validation error
    pub message: String,
}

impl ConfigError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Validation Trait
// ============================================================================

/// Trait for validatable configuration types.
pub trait Validatable {
    /// Validate the configuration, returning any errors found.
    fn validate(&self) -> Vec<ConfigError>;

    /// Check if the configuration is valid.
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

// ============================================================================
// Validation Implementations
// ============================================================================

impl Validatable for AppConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = self.sources.validate();
        errors.extend(self.http.validate());
        errors
    }
}

impl Validatable for SourcesConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = self.rhel.validate();
        errors.extend(self.almalinux.validate());
        errors.extend(self.rockylinux.validate());
        errors
    }
}

impl Validatable for RhelSourceConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        check_url(&mut errors, "sources.rhel.url", &self.url);
        if self.rows == 0 {
            errors.push(ConfigError::new(
                "sources.rhel.rows",
                "Page size must be at least 1",
            ));
        }
        errors
    }
}

impl Validatable for AlmaLinuxSourceConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        check_url(&mut errors, "sources.almalinux.url", &self.url);
        errors
    }
}

impl Validatable for RockyLinuxSourceConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        check_url(&mut errors, "sources.rockylinux.url", &self.url);
        if self.limit == 0 || self.limit > ROCKY_MAX_LIMIT {
            errors.push(ConfigError::new(
                "sources.rockylinux.limit",
                format!(
                    "Page size must be between 1 and {ROCKY_MAX_LIMIT}, got {}",
                    self.limit
                ),
            ));
        }
        errors
    }
}

impl Validatable for HttpConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if self.timeout_secs == 0 {
            errors.push(ConfigError::new(
                "http.timeout_secs",
                "Timeout must be at least 1 second",
            ));
        }
        if matches!(self.user_agent.as_deref(), Some(ua) if ua.trim().is_empty()) {
            errors.push(ConfigError::new(
                "http.user_agent",
                "User agent must not be empty",
            ));
        }
        errors
    }
}

fn check_url(errors: &mut Vec<ConfigError>, field: &str, url: &str) {
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        errors.push(ConfigError::new(
            field,
            format!("Expected an http(s) URL, got '{url}'"),
        ));
    }
}
