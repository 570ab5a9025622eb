//! The normalized advisory record shared by every errata source.

use super::{Distribution, Release};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Upstream type values that mark a security advisory.
const SECURITY_KINDS: &[&str] = &["security", "type_security"];

/// A security advisory as published by one distribution for one release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advisory {
    /// Distribution that published the advisory
    pub distribution: Distribution,
    /// Major release the advisory applies to
    pub release: Release,
    /// Advisory identifier (e.g. `RLSA-2023:1234`)
    pub advisory_id: String,
    /// Publication date
    pub issue_date: NaiveDate,
    /// Canonical severity (`Critical`, `Important`, `Moderate`, `Low`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    /// Upstream advisory type, when the source reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// One-line summary
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub synopsis: Option<String>,
}

impl Advisory {
    /// Create an advisory with only the required fields.
    pub fn new(
        distribution: Distribution,
        release: Release,
        advisory_id: impl Into<String>,
        issue_date: NaiveDate,
    ) -> Self {
        Self {
            distribution,
            release,
            advisory_id: advisory_id.into(),
            issue_date,
            severity: None,
            kind: None,
            synopsis: None,
        }
    }

    /// Set the severity
    #[must_use]
    pub fn with_severity(mut self, severity: impl Into<String>) -> Self {
        self.severity = Some(severity.into());
        self
    }

    /// Set the upstream type
    #[must_use]
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// Set the synopsis
    #[must_use]
    pub fn with_synopsis(mut self, synopsis: impl Into<String>) -> Self {
        self.synopsis = Some(synopsis.into());
        self
    }

    /// Whether this is a security advisory.
    ///
    /// Records without a type are assumed to come from a source that
    /// already filters on the server side.
    #[must_use]
    pub fn is_security(&self) -> bool {
        self.kind.as_deref().map_or(true, |kind| {
            SECURITY_KINDS.contains(&kind.trim().to_lowercase().as_str())
        })
    }

    /// Ordering key used by the aggregator.
    #[must_use]
    pub fn sort_key(&self) -> (NaiveDate, &str) {
        (self.issue_date, self.advisory_id.as_str())
    }
}
