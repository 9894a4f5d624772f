//! Offline ranking of the static catalogue, with no network access.

use std::path::PathBuf;

use leafdex_core::Coordinate;
use leafdex_engine::{rank_by_distance, reconcile, resolve_location};

use crate::output::print_ranked;

/// Fallback origin for offline use, matching the server default.
const DEFAULT_ORIGIN: Coordinate = Coordinate {
    latitude: 48.8566,
    longitude: 2.3522,
};

pub fn run(
    lat: Option<f64>,
    lng: Option<f64>,
    limit: usize,
    snapshot: Option<PathBuf>,
) -> anyhow::Result<()> {
    let static_listings = leafdex_core::resolve_static_listings(snapshot.as_deref())?;

    let requested = match (lat, lng) {
        (Some(lat), Some(lng)) => Some(Coordinate::new(lat, lng)),
        _ => None,
    };
    let resolved = resolve_location(requested, DEFAULT_ORIGIN);
    if resolved.fallback_used {
        println!(
            "no origin supplied; ranking from fallback ({:.4}, {:.4})",
            resolved.coordinate.latitude, resolved.coordinate.longitude
        );
    }

    // Reconciling against an empty live set still deduplicates the catalogue.
    let outcome = reconcile(&static_listings, &[]);
    let ranked = rank_by_distance(&outcome.listings, resolved.coordinate);
    print_ranked(&ranked, limit);
    Ok(())
}
