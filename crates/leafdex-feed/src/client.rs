//! HTTP client for the live listing feed.

use std::future::Future;
use std::time::Duration;

use leafdex_core::Listing;
use leafdex_engine::{ListingSource, SourceError};

use crate::error::FeedError;
use crate::types::RawListing;

/// Client for the remote listing collection.
///
/// The feed is a black box returning a JSON array of raw records; this client
/// only owns transport, decoding, and normalization into [`Listing`].
#[derive(Debug, Clone)]
pub struct ListingFeed {
    client: reqwest::Client,
    endpoint: String,
    user_agent: String,
}

impl ListingFeed {
    /// Build a feed client with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Http`] if the underlying HTTP client cannot be
    /// constructed.
    pub fn new(
        endpoint: impl Into<String>,
        timeout_secs: u64,
        user_agent: impl Into<String>,
    ) -> Result<Self, FeedError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            user_agent: user_agent.into(),
        })
    }

    /// Fetch the raw feed records.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError`] on transport failure, a non-2xx status, or a
    /// body that does not decode as a JSON array of listings.
    pub async fn fetch_raw(&self) -> Result<Vec<RawListing>, FeedError> {
        let response = self
            .client
            .get(&self.endpoint)
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FeedError::HttpStatus {
                status: response.status().as_u16(),
                url: self.endpoint.clone(),
            });
        }

        let body = response.text().await?;
        let raw: Vec<RawListing> = serde_json::from_str(&body)?;
        Ok(raw)
    }

    /// Fetch and normalize the current live listing set.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError`] under the same conditions as [`Self::fetch_raw`].
    pub async fn fetch(&self) -> Result<Vec<Listing>, FeedError> {
        let raw = self.fetch_raw().await?;
        tracing::debug!(count = raw.len(), endpoint = %self.endpoint, "live feed fetched");
        Ok(raw.into_iter().map(RawListing::into_listing).collect())
    }
}

impl ListingSource for ListingFeed {
    fn fetch_listings(&self) -> impl Future<Output = Result<Vec<Listing>, SourceError>> + Send {
        async move { self.fetch().await.map_err(SourceError::from) }
    }
}
