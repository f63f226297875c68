use async_trait::async_trait;
use padron_core::error::{FetchError, PadronError, Result};
use padron_core::models::{Query, Report};
use padron_core::ports::DemographicsSource;
use reqwest::Url;
use serde::Deserialize;

/// Demographics source backed by the HTTP data service
pub struct HttpDemographicsSource {
    /// Endpoint URL (e.g., "http://localhost:5328/api/demographics")
    endpoint: Url,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpDemographicsSource {
    /// Create a source for the given endpoint URL
    pub fn new(endpoint: &str) -> Result<Self> {
        let endpoint = endpoint.trim();
        if endpoint.is_empty() {
            return Err(PadronError::ConfigMissing { key: "endpoint".to_string() });
        }

        let endpoint = Url::parse(endpoint).map_err(|e| PadronError::ConfigInvalid {
            key: "endpoint".to_string(),
            reason: format!("Invalid URL '{}': {}", endpoint, e),
        })?;

        let client = reqwest::Client::builder()
            .user_agent(concat!("padron/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| PadronError::ClientInit(e.to_string()))?;

        Ok(Self { endpoint, client })
    }

    /// Create with the local development server URL
    pub fn localhost() -> Result<Self> {
        Self::new(padron_core::config::DEFAULT_ENDPOINT)
    }

    /// Full request URL for a query, with the name URL-encoded
    pub fn request_url(&self, query: &Query) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair("municipality", query.as_str());
        url
    }
}

#[async_trait]
impl DemographicsSource for HttpDemographicsSource {
    async fn fetch(&self, query: &Query) -> std::result::Result<Report, FetchError> {
        let url = self.request_url(query);
        tracing::debug!(url = %url, "Fetching demographics");

        let response = self.client.get(url).send().await.map_err(|e| {
            tracing::warn!(endpoint = %self.endpoint, error = %e, "Demographics request failed");
            FetchError::transport(e)
        })?;

        let status = response.status();
        let body = response.bytes().await.map_err(FetchError::transport)?;

        tracing::debug!(status = %status, bytes = body.len(), "Demographics response received");

        interpret_response(status.is_success(), &body)
    }

    fn name(&self) -> &str {
        self.endpoint.as_str()
    }
}

/// Error body sent by the service alongside a failure
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Turn a status class and raw body into a report or a failure.
///
/// The service also reports some failures with a success status and an
/// `error` field, so that field wins over the report shape.
fn interpret_response(success: bool, body: &[u8]) -> std::result::Result<Report, FetchError> {
    if !success {
        let message = serde_json::from_slice::<ErrorBody>(body).ok().and_then(|b| b.error);
        return Err(FetchError::application(message));
    }

    let value: serde_json::Value = serde_json::from_slice(body)
        .map_err(|e| FetchError::transport(format!("Malformed response body: {}", e)))?;

    if let Some(message) = value.get("error").and_then(|e| e.as_str()) {
        return Err(FetchError::application(Some(message)));
    }

    serde_json::from_value(value)
        .map_err(|e| FetchError::transport(format!("Malformed response body: {}", e)))
}
