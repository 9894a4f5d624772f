use thiserror::Error;

/// Errors that can occur while fetching or decoding the live listing feed.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("HTTP error fetching listing feed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("listing feed returned HTTP {status} for {url}")]
    HttpStatus { status: u16, url: String },
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<FeedError> for leafdex_engine::SourceError {
    fn from(e: FeedError) -> Self {
        leafdex_engine::SourceError::Unavailable(e.to_string())
    }
}
