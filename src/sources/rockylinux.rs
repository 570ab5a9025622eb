//! Rocky Linux advisories from the errata API.

use super::{ErrataSource, HttpTransport, Paginated, RawDate, RawRecord, RecordStream};
use crate::config::RockyLinuxSourceConfig;
use crate::error::FetchError;
use crate::model::{Distribution, Release};
use serde::{Deserialize, Serialize};
use std::rc::Rc;

/// Largest page the advisories API serves.
pub const ROCKY_MAX_LIMIT: usize = 100;

#[derive(Debug, Deserialize)]
struct RockyAdvisoriesResponse {
    advisories: Vec<RockyAdvisory>,
    #[serde(default)]
    total: Option<u64>,
}

/// One advisory of the Rocky Linux errata API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RockyAdvisory {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub synopsis: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(rename = "publishedAt", default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<RawDate>,
}

/// Rocky Linux security advisories, paged with `page`/`limit`.
pub struct RockyLinuxSource {
    config: RockyLinuxSourceConfig,
    transport: Rc<dyn HttpTransport>,
}

impl RockyLinuxSource {
    pub fn new(config: RockyLinuxSourceConfig, transport: Rc<dyn HttpTransport>) -> Self {
        Self { config, transport }
    }

    /// Page size actually requested, capped at the API maximum.
    fn limit(&self) -> usize {
        self.config.limit.min(ROCKY_MAX_LIMIT)
    }
}

/// Query parameters for 0-based `page` of `release`.
fn advisories_query(release: Release, page: u32, limit: usize) -> Vec<(&'static str, String)> {
    vec![
        ("filters.product", format!("Rocky Linux {release}")),
        ("filters.type", "TYPE_SECURITY".to_string()),
        ("filters.fetchRelated", "false".to_string()),
        ("page", page.to_string()),
        ("limit", limit.to_string()),
    ]
}

impl ErrataSource for RockyLinuxSource {
    fn distribution(&self) -> Distribution {
        Distribution::RockyLinux
    }

    fn endpoint(&self, _release: Release) -> String {
        self.config.url.clone()
    }

    fn records(&self, release: Release) -> RecordStream<'_> {
        let limit = self.limit();
        Paginated::new(limit, move |page| {
            let url = &self.config.url;
            let body = self
                .transport
                .get(url, &advisories_query(release, page, limit))?;
            let parsed: RockyAdvisoriesResponse =
                serde_json::from_str(&body).map_err(|e| FetchError::invalid_json(url, &e))?;

            tracing::debug!(
                "Rocky Linux {} page {}: {} advisories (total {:?})",
                release,
                page,
                parsed.advisories.len(),
                parsed.total
            );
            Ok(parsed
                .advisories
                .into_iter()
                .map(RawRecord::RockyLinux)
                .collect())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::testing::ScriptedTransport;

    fn page(count: u32) -> Result<String, FetchError> {
        let advisories: Vec<_> = (0..count)
            .map(|i| {
                serde_json::json!({
                    "name": format!("RLSA-2023:{i:04}"),
                    "synopsis": "Important: kernel security update",
                    "severity": "SEVERITY_IMPORTANT",
                    "type": "TYPE_SECURITY",
                    "publishedAt": "2023-05-18T12:34:56.789Z"
                })
            })
            .collect();
        Ok(serde_json::json!({ "advisories": advisories, "total": 250 }).to_string())
    }

    fn source(transport: &Rc<ScriptedTransport>, limit: usize) -> RockyLinuxSource {
        let config = RockyLinuxSourceConfig {
            limit,
            ..RockyLinuxSourceConfig::default()
        };
        RockyLinuxSource::new(config, Rc::clone(transport) as Rc<dyn HttpTransport>)
    }

    #[test]
    fn test_pages_until_short_page() {
        let transport = Rc::new(ScriptedTransport::new(vec![page(100), page(100), page(50)]));
        let rocky = source(&transport, 100);

        assert_eq!(rocky.records(Release::R9).count(), 250);

        let requests = transport.requests();
        assert_eq!(requests.len(), 3);
        let pages: Vec<_> = requests
            .iter()
            .map(|r| ScriptedTransport::param(r, "page").unwrap())
            .collect();
        assert_eq!(pages, ["0", "1", "2"]);
        assert_eq!(
            ScriptedTransport::param(&requests[0], "filters.product").as_deref(),
            Some("Rocky Linux 9")
        );
        assert_eq!(
            ScriptedTransport::param(&requests[0], "filters.type").as_deref(),
            Some("TYPE_SECURITY")
        );
        assert_eq!(
            ScriptedTransport::param(&requests[0], "filters.fetchRelated").as_deref(),
            Some("false")
        );
    }

    #[test]
    fn test_limit_capped_at_api_maximum() {
        let transport = Rc::new(ScriptedTransport::new(vec![page(2)]));
        let rocky = source(&transport, 500);

        assert_eq!(rocky.records(Release::R8).count(), 2);
        let requests = transport.requests();
        assert_eq!(ScriptedTransport::param(&requests[0], "limit").as_deref(), Some("100"));
    }

    #[test]
    fn test_http_error_mid_stream() {
        let transport = Rc::new(ScriptedTransport::new(vec![
            page(2),
            Err(FetchError::HttpStatus {
                url: "x".to_string(),
                status: 502,
            }),
        ]));
        let rocky = source(&transport, 2);
        let results: Vec<_> = rocky.records(Release::R8).collect();
        assert_eq!(results.len(), 3);
        assert!(results[..2].iter().all(Result::is_ok));
        assert!(results[2].is_err());
    }
}
