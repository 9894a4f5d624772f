//! Shared domain types and configuration for the leafdex store directory.

mod app_config;
mod catalog;
mod config;
mod geo;
mod listing;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use catalog::{
    bundled_catalog, load_catalog, resolve_static_listings, CatalogEntry,
    PLACEHOLDER_LISTING_NAME,
};
pub use config::{load_app_config, load_app_config_from_env};
pub use geo::{haversine_km, Coordinate, EARTH_RADIUS_KM};
pub use listing::{Listing, RankedListing, SourceTier};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
    #[error("failed to read listings file {path}: {source}")]
    CatalogIo {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse listings file: {0}")]
    CatalogParse(#[from] serde_yaml::Error),
    #[error("invalid listings file: {0}")]
    Validation(String),
}
