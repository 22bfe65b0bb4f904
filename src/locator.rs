//! Address search client for the GSI address-search API
//!
//! Turns a free-text place name into the ordered list of address features
//! the service returns. One request per call, bounded by the configured
//! timeout, never retried.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info, instrument, warn};

use crate::config::SearchConfig;
use crate::models::{LocationFeature, SearchResponse};
use crate::{OfficeMapError, Result};

/// Anything that can resolve a place name to address features
#[async_trait]
pub trait AddressSearch: Send + Sync {
    async fn search(&self, place: &str) -> Result<Vec<LocationFeature>>;
}

/// Client for `https://msearch.gsi.go.jp/address-search/AddressSearch`
pub struct GsiLocator {
    client: Client,
    base_url: String,
    path: String,
    timeout: Duration,
}

impl GsiLocator {
    /// Create a new locator from the search configuration
    pub fn new(config: &SearchConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.timeout_seconds);

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("OfficeMap/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| OfficeMapError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            path: config.path.clone(),
            timeout,
        })
    }

    /// Build the request URL for `path` with URL-encoded query pairs
    #[must_use]
    pub fn request_url(&self, path: &str, query: &[(&str, &str)]) -> String {
        let query = query
            .iter()
            .map(|(key, value)| {
                format!("{}={}", urlencoding::encode(key), urlencoding::encode(value))
            })
            .collect::<Vec<_>>()
            .join("&");

        if query.is_empty() {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}{}?{}", self.base_url, path, query)
        }
    }

    /// GET `path` on the search host and decode the body as a feature list
    #[instrument(skip(self))]
    pub async fn get_features(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<LocationFeature>> {
        let url = self.request_url(path, query);
        debug!("Address search request URL: {}", url);
        let start_time = Instant::now();

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            warn!("Address search answered with HTTP {}", status);
            return Err(OfficeMapError::Protocol {
                status: status.as_u16(),
            });
        }

        let body: SearchResponse = response.json().await.map_err(|e| self.classify(e))?;
        let features = body.into_features();

        info!(
            "Received {} features in {:.3}s",
            features.len(),
            start_time.elapsed().as_secs_f64()
        );

        Ok(features)
    }

    fn classify(&self, err: reqwest::Error) -> OfficeMapError {
        if err.is_timeout() {
            warn!("Address search timed out after {:?}", self.timeout);
            OfficeMapError::Timeout {
                seconds: self.timeout.as_secs(),
            }
        } else if err.is_decode() {
            warn!("Failed to decode address search response: {}", err);
            OfficeMapError::decode(err.to_string())
        } else {
            warn!("Address search request failed: {}", err);
            OfficeMapError::connectivity(err.to_string())
        }
    }
}

#[async_trait]
impl AddressSearch for GsiLocator {
    async fn search(&self, place: &str) -> Result<Vec<LocationFeature>> {
        self.get_features(&self.path, &[("q", place)]).await
    }
}
