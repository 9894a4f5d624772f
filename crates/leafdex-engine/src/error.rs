use thiserror::Error;

/// Failure fetching the live listing collection.
///
/// Always recoverable: the refresh cycle logs it, keeps serving the last
/// published snapshot, and retries on the next tick.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("live listing feed unavailable: {0}")]
    Unavailable(String),
}
