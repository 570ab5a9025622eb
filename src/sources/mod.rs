//! Errata source adapters.
//!
//! Each upstream database has its own adapter that knows the endpoint, the
//! pagination contract and the raw response shape:
//!
//! | Source     | Endpoint                          | Paging                     |
//! |------------|-----------------------------------|----------------------------|
//! | RHEL       | Hydra KCS search                  | `rows`/`p`, short page ends |
//! | AlmaLinux  | static `<release>/errata.json`    | single document            |
//! | RockyLinux | `api/v2/advisories`               | `page`/`limit` (max 100)   |
//!
//! Adapters hand out [`RawRecord`]s lazily through a [`RecordStream`]; the
//! [`normalize`](crate::normalize) module turns them into advisories.

mod almalinux;
mod cache;
mod paging;
mod rhel;
mod rockylinux;
mod transport;

pub use almalinux::{AlmaErratum, AlmaLinuxSource};
pub use cache::RawCache;
pub use paging::Paginated;
pub use rhel::{RhelErratum, RhelSource, RHEL_FIELDS};
pub use rockylinux::{RockyAdvisory, RockyLinuxSource, ROCKY_MAX_LIMIT};
pub use transport::{HttpClient, HttpTransport};

use crate::config::SourcesConfig;
use crate::model::{Distribution, Release};
use serde::{Deserialize, Serialize};
use std::rc::Rc;

/// Lazily fetched records of one source for one release.
pub type RecordStream<'a> = Paginated<'a, RawRecord>;

/// A record exactly as one upstream delivered it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RawRecord {
    Rhel(RhelErratum),
    AlmaLinux(AlmaErratum),
    RockyLinux(RockyAdvisory),
}

impl RawRecord {
    /// Distribution the record came from.
    #[must_use]
    pub const fn distribution(&self) -> Distribution {
        match self {
            Self::Rhel(_) => Distribution::Rhel,
            Self::AlmaLinux(_) => Distribution::AlmaLinux,
            Self::RockyLinux(_) => Distribution::RockyLinux,
        }
    }
}

/// Date values as the upstreams encode them.
///
/// RHEL and Rocky send ISO 8601 strings, AlmaLinux sends MongoDB extended
/// JSON (`{"$date": 1684195200000}`), occasionally with a `$numberLong`
/// wrapper around the milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawDate {
    /// Milliseconds since the Unix epoch
    Millis(i64),
    /// ISO 8601 / RFC 3339 text
    Text(String),
    /// `{"$date": ...}`
    Extended {
        #[serde(rename = "$date")]
        date: Box<RawDate>,
    },
    /// `{"$numberLong": "..."}`
    NumberLong {
        #[serde(rename = "$numberLong")]
        millis: String,
    },
}

/// An upstream errata database.
pub trait ErrataSource {
    /// Distribution this source publishes.
    fn distribution(&self) -> Distribution;

    /// Endpoint queried for `release`, for logging.
    fn endpoint(&self, release: Release) -> String;

    /// Stream every raw record for `release`.
    ///
    /// Nothing is requested until the stream is polled.
    fn records(&self, release: Release) -> RecordStream<'_>;
}

/// Build the three upstream adapters in upstream-first order.
pub fn default_sources(
    config: &SourcesConfig,
    transport: &Rc<dyn HttpTransport>,
) -> Vec<Box<dyn ErrataSource>> {
    vec![
        Box::new(RhelSource::new(config.rhel.clone(), Rc::clone(transport))),
        Box::new(AlmaLinuxSource::new(
            config.almalinux.clone(),
            Rc::clone(transport),
        )),
        Box::new(RockyLinuxSource::new(
            config.rockylinux.clone(),
            Rc::clone(transport),
        )),
    ]
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted transport for adapter tests.

    use super::HttpTransport;
    use crate::error::FetchError;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    /// A recorded request: URL plus query pairs.
    pub type Request = (String, Vec<(String, String)>);

    /// Replays canned responses in order and records every request.
    #[derive(Default)]
    pub struct ScriptedTransport {
        responses: RefCell<VecDeque<Result<String, FetchError>>>,
        requests: RefCell<Vec<Request>>,
    }

    impl ScriptedTransport {
        pub fn new(responses: Vec<Result<String, FetchError>>) -> Self {
            Self {
                responses: RefCell::new(responses.into()),
                requests: RefCell::default(),
            }
        }

        pub fn requests(&self) -> Vec<Request> {
            self.requests.borrow().clone()
        }

        pub fn param(request: &Request, key: &str) -> Option<String> {
            request
                .1
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
        }
    }

    impl HttpTransport for ScriptedTransport {
        fn get(&self, url: &str, query: &[(&str, String)]) -> Result<String, FetchError> {
            self.requests.borrow_mut().push((
                url.to_string(),
                query
                    .iter()
                    .map(|(k, v)| ((*k).to_string(), v.clone()))
                    .collect(),
            ));
            self.responses
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(FetchError::Client("no scripted response left".to_string())))
        }
    }
}
