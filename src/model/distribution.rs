//! Distribution and release identifiers.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A Linux distribution whose errata database is compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Distribution {
    /// Red Hat Enterprise Linux, the upstream
    Rhel,
    /// AlmaLinux rebuild
    AlmaLinux,
    /// Rocky Linux rebuild
    RockyLinux,
}

impl Distribution {
    /// All distributions, upstream first.
    pub const ALL: [Self; 3] = [Self::Rhel, Self::AlmaLinux, Self::RockyLinux];

    /// Downstream rebuilds compared against RHEL.
    pub const DOWNSTREAM: [Self; 2] = [Self::RockyLinux, Self::AlmaLinux];

    /// Stable lowercase slug used in file names and result files.
    #[must_use]
    pub const fn slug(&self) -> &'static str {
        match self {
            Self::Rhel => "rhel",
            Self::AlmaLinux => "almalinux",
            Self::RockyLinux => "rockylinux",
        }
    }

    /// Human-readable name.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Rhel => "RHEL",
            Self::AlmaLinux => "AlmaLinux",
            Self::RockyLinux => "Rocky Linux",
        }
    }

    /// Prefix of security advisory identifiers (`RHSA-2023:1234`).
    #[must_use]
    pub const fn advisory_prefix(&self) -> &'static str {
        match self {
            Self::Rhel => "RHSA",
            Self::AlmaLinux => "ALSA",
            Self::RockyLinux => "RLSA",
        }
    }

    /// Rewrite an advisory identifier from another distribution into this
    /// distribution's naming, keeping the year and sequence number.
    ///
    /// `RockyLinux.rebrand("RHSA-2023:1234")` yields `RLSA-2023:1234`.
    #[must_use]
    pub fn rebrand(&self, advisory_id: &str) -> Option<String> {
        let (_, rest) = advisory_id.split_once('-')?;
        if rest.is_empty() {
            return None;
        }
        Some(format!("{}-{rest}", self.advisory_prefix()))
    }
}

impl std::fmt::Display for Distribution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A major release line tracked independently per distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Release {
    R8,
    R9,
}

impl Release {
    /// Every supported release, oldest first.
    pub const ALL: [Self; 2] = [Self::R8, Self::R9];

    /// Major version number.
    #[must_use]
    pub const fn number(&self) -> u8 {
        match self {
            Self::R8 => 8,
            Self::R9 => 9,
        }
    }
}

impl std::fmt::Display for Release {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.number())
    }
}

impl From<Release> for u8 {
    fn from(release: Release) -> Self {
        release.number()
    }
}

impl TryFrom<u8> for Release {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            8 => Ok(Self::R8),
            9 => Ok(Self::R9),
            other => Err(format!("unsupported release {other} (expected 8 or 9)")),
        }
    }
}

/// Accepts `8`, `9`, `r8` and `r9`, which lets clap take `-r8` as well as `-r 8`.
impl FromStr for Release {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix('r')
            .or_else(|| trimmed.strip_prefix('R'))
            .unwrap_or(trimmed);
        let number: u8 = digits
            .parse()
            .map_err(|_| format!("invalid release '{s}' (expected 8 or 9)"))?;
        Self::try_from(number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rebrand_swaps_prefix() {
        assert_eq!(
            Distribution::RockyLinux.rebrand("RHSA-2023:1234").as_deref(),
            Some("RLSA-2023:1234")
        );
        assert_eq!(
            Distribution::AlmaLinux.rebrand("RHSA-2024:0007").as_deref(),
            Some("ALSA-2024:0007")
        );
        assert_eq!(Distribution::AlmaLinux.rebrand("RHSA"), None);
        assert_eq!(Distribution::AlmaLinux.rebrand("RHSA-"), None);
    }

    #[test]
    fn test_distribution_serde_slug() {
        let json = serde_json::to_string(&Distribution::AlmaLinux).unwrap();
        assert_eq!(json, "\"almalinux\"");
        let parsed: Distribution = serde_json::from_str("\"rockylinux\"").unwrap();
        assert_eq!(parsed, Distribution::RockyLinux);
        for dist in Distribution::ALL {
            assert_eq!(serde_json::to_string(&dist).unwrap(), format!("\"{}\"", dist.slug()));
        }
    }

    #[test]
    fn test_release_parsing() {
        assert_eq!("8".parse::<Release>(), Ok(Release::R8));
        assert_eq!("r9".parse::<Release>(), Ok(Release::R9));
        assert_eq!(" R8 ".parse::<Release>(), Ok(Release::R8));
        assert!("7".parse::<Release>().is_err());
        assert!("nine".parse::<Release>().is_err());
    }

    #[test]
    fn test_release_serde_as_number() {
        assert_eq!(serde_json::to_string(&Release::R9).unwrap(), "9");
        let parsed: Release = serde_json::from_str("8").unwrap();
        assert_eq!(parsed, Release::R8);
        assert!(serde_json::from_str::<Release>("10").is_err());
    }
}
