use std::net::SocketAddr;
use std::path::PathBuf;

use crate::geo::Coordinate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Endpoint returning the live listing collection as a JSON array.
    pub feed_url: String,
    pub feed_timeout_secs: u64,
    pub feed_user_agent: String,
    /// Cron expression driving the refresh loop.
    pub refresh_schedule: String,
    /// Optional previously-persisted catalogue snapshot overriding the
    /// bundled static listings at startup.
    pub snapshot_path: Option<PathBuf>,
    pub fallback_latitude: f64,
    pub fallback_longitude: f64,
}

impl AppConfig {
    /// Origin used when a consumer supplies no (or an invalid) location.
    #[must_use]
    pub fn fallback_coordinate(&self) -> Coordinate {
        Coordinate::new(self.fallback_latitude, self.fallback_longitude)
    }
}
