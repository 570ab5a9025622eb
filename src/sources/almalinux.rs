//! AlmaLinux errata from the static `errata.json` document.

use super::{ErrataSource, HttpTransport, Paginated, RawDate, RawRecord, RecordStream};
use crate::config::AlmaLinuxSourceConfig;
use crate::error::FetchError;
use crate::model::{Distribution, Release};
use serde::{Deserialize, Serialize};
use std::rc::Rc;

/// One entry of the AlmaLinux errata document.
///
/// The document covers every advisory type; `type` is used later to keep
/// only security advisories.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlmaErratum {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updateinfo_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issued_date: Option<RawDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// AlmaLinux errata, one unpaged document per release.
pub struct AlmaLinuxSource {
    config: AlmaLinuxSourceConfig,
    transport: Rc<dyn HttpTransport>,
}

impl AlmaLinuxSource {
    pub fn new(config: AlmaLinuxSourceConfig, transport: Rc<dyn HttpTransport>) -> Self {
        Self { config, transport }
    }
}

impl ErrataSource for AlmaLinuxSource {
    fn distribution(&self) -> Distribution {
        Distribution::AlmaLinux
    }

    fn endpoint(&self, release: Release) -> String {
        format!(
            "{}/{}/errata.json",
            self.config.url.trim_end_matches('/'),
            release
        )
    }

    fn records(&self, release: Release) -> RecordStream<'_> {
        Paginated::single(move |_| {
            let url = self.endpoint(release);
            let body = self.transport.get(&url, &[])?;
            let errata: Vec<AlmaErratum> =
                serde_json::from_str(&body).map_err(|e| FetchError::invalid_json(&url, &e))?;

            tracing::debug!("AlmaLinux {}: {} errata in document", release, errata.len());
            Ok(errata.into_iter().map(RawRecord::AlmaLinux).collect())
        })
    }
}
