//! Domain types for the store directory.

use serde::{Deserialize, Serialize};

/// Which source produced a listing.
///
/// Variant order matters: the derived `Ord` makes `Live` outrank `Static`,
/// and the reconciler resolves dedup-key collisions by comparing tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceTier {
    /// Bundled baseline catalogue, available without a network round-trip.
    Static,
    /// Remote feed fetched at runtime; wins collisions against the catalogue.
    Live,
}

impl std::fmt::Display for SourceTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceTier::Static => write!(f, "static"),
            SourceTier::Live => write!(f, "live"),
        }
    }
}

/// A store listing from either source.
///
/// `id` is opaque and only unique within its originating source; cross-source
/// identity is exactly what reconciliation resolves. Missing address fields
/// are carried as empty strings so the text dedup tier can normalize them
/// uniformly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Identifier from an external place registry, the strongest dedup signal.
    pub place_id: Option<String>,
    pub source: SourceTier,
}

/// A listing annotated with its distance from a resolved origin.
///
/// Created fresh on every ranking pass; never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct RankedListing {
    #[serde(flatten)]
    pub listing: Listing,
    pub distance_km: f64,
}
