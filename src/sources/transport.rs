//! HTTP transport used by the errata sources.

use crate::config::HttpConfig;
use crate::error::FetchError;
use reqwest::blocking::Client;

/// Minimal blocking GET interface the sources are written against.
///
/// The production implementation is [`HttpClient`]; tests script responses
/// without touching the network.
pub trait HttpTransport {
    /// Fetch `url` with the given query parameters and return the body.
    ///
    /// Non-success statuses are errors. Repeated keys are sent as repeated
    /// parameters.
    fn get(&self, url: &str, query: &[(&str, String)]) -> Result<String, FetchError>;
}

/// Blocking `reqwest` client with a per-request timeout.
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Create a new client from the HTTP configuration.
    pub fn new(config: &HttpConfig) -> Result<Self, FetchError> {
        let user_agent = config.user_agent.clone().unwrap_or_else(|| {
            concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string()
        });
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(user_agent)
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self { client })
    }
}

impl HttpTransport for HttpClient {
    fn get(&self, url: &str, query: &[(&str, String)]) -> Result<String, FetchError> {
        tracing::debug!("GET {} {:?}", url, query);

        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .query(query)
            .send()
            .map_err(|e| FetchError::Network {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().map_err(|e| FetchError::Network {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}
