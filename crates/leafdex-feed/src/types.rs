//! Wire types for the live listing feed.

use serde::Deserialize;

use leafdex_core::{Listing, SourceTier};

/// A record identifier as it appears on the wire; some deployments expose
/// numeric row ids, others string/UUID ids.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Text(String),
    Number(i64),
}

impl std::fmt::Display for RawId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RawId::Text(s) => write!(f, "{s}"),
            RawId::Number(n) => write!(f, "{n}"),
        }
    }
}

/// A raw listing record from the feed.
///
/// Only `id` and `name` are required; everything else is optional and
/// normalized during conversion.
#[derive(Debug, Clone, Deserialize)]
pub struct RawListing {
    pub id: RawId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default, alias = "google_place_id")]
    pub place_id: Option<String>,
}

impl RawListing {
    /// Convert to the domain shape, tagged as live-source data.
    #[must_use]
    pub fn into_listing(self) -> Listing {
        Listing {
            id: self.id.to_string(),
            name: self.name,
            address: self.address.unwrap_or_default(),
            city: self.city.unwrap_or_default(),
            latitude: self.latitude,
            longitude: self.longitude,
            // Treat empty string as absent.
            place_id: self.place_id.filter(|s| !s.trim().is_empty()),
            source: SourceTier::Live,
        }
    }
}
