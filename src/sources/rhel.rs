//! Red Hat errata from the Customer Portal search API.

use super::{ErrataSource, HttpTransport, Paginated, RawDate, RawRecord, RecordStream};
use crate::config::RhelSourceConfig;
use crate::error::FetchError;
use crate::model::{Distribution, Release};
use serde::{Deserialize, Serialize};
use std::rc::Rc;

/// Fields requested from the search index.
pub const RHEL_FIELDS: &str = "id,portal_severity,portal_product_names,portal_publication_date,portal_synopsis,view_uri,allTitle";

/// Search response envelope. The API reports `numFound` but it is only
/// logged; the end of the result set is inferred from a short page.
#[derive(Debug, Deserialize)]
struct RhelSearchResponse {
    response: RhelSearchBody,
}

#[derive(Debug, Deserialize)]
struct RhelSearchBody {
    #[serde(rename = "numFound", default)]
    num_found: Option<u64>,
    docs: Vec<RhelErratum>,
}

/// One document of the RHEL errata search index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RhelErratum {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portal_severity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portal_publication_date: Option<RawDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portal_synopsis: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub portal_product_names: Vec<String>,
}

/// RHEL security advisories, paged with `rows`/`p`.
pub struct RhelSource {
    config: RhelSourceConfig,
    transport: Rc<dyn HttpTransport>,
}

impl RhelSource {
    pub fn new(config: RhelSourceConfig, transport: Rc<dyn HttpTransport>) -> Self {
        Self { config, transport }
    }
}

/// Query parameters for page `p` (1-based) of `release`.
fn search_query(release: Release, rows: usize, p: u32) -> Vec<(&'static str, String)> {
    vec![
        ("q", "*:*".to_string()),
        (
            "fq",
            "portal_advisory_type:(\"Security Advisory\") AND documentKind:(\"Errata\")"
                .to_string(),
        ),
        (
            "fq",
            format!("portal_product_filter:Red\\ Hat\\ Enterprise\\ Linux|*|{release}|*"),
        ),
        ("fl", RHEL_FIELDS.to_string()),
        ("sort", "portal_publication_date desc".to_string()),
        ("rows", rows.to_string()),
        ("p", p.to_string()),
    ]
}

impl ErrataSource for RhelSource {
    fn distribution(&self) -> Distribution {
        Distribution::Rhel
    }

    fn endpoint(&self, _release: Release) -> String {
        self.config.url.clone()
    }

    fn records(&self, release: Release) -> RecordStream<'_> {
        let rows = self.config.rows;
        Paginated::new(rows, move |page| {
            let p = page + 1;
            let url = &self.config.url;
            let body = self.transport.get(url, &search_query(release, rows, p))?;
            let parsed: RhelSearchResponse =
                serde_json::from_str(&body).map_err(|e| FetchError::invalid_json(url, &e))?;

            tracing::debug!(
                "RHEL {} page {}: {} errata (numFound {:?})",
                release,
                p,
                parsed.response.docs.len(),
                parsed.response.num_found
            );
            Ok(parsed.response.docs.into_iter().map(RawRecord::Rhel).collect())
        })
    }
}
