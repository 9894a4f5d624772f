//! Proximity ranking of reconciled listings.

use leafdex_core::{haversine_km, Coordinate, Listing, RankedListing};

/// Annotate every listing with its haversine distance from `origin` and sort
/// nearest-first.
///
/// The sort is stable, so ties keep input order. Listings without coordinates
/// are treated as located at `(0, 0)` and still ranked; callers wanting to
/// exclude them must filter before ranking. Inputs are never mutated.
#[must_use]
pub fn rank_by_distance(listings: &[Listing], origin: Coordinate) -> Vec<RankedListing> {
    let mut ranked: Vec<RankedListing> = listings
        .iter()
        .map(|listing| {
            let at = Coordinate::new(
                listing.latitude.unwrap_or(0.0),
                listing.longitude.unwrap_or(0.0),
            );
            RankedListing {
                listing: listing.clone(),
                distance_km: haversine_km(origin, at),
            }
        })
        .collect();

    ranked.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use leafdex_core::SourceTier;

    const PARIS: Coordinate = Coordinate {
        latitude: 48.8566,
        longitude: 2.3522,
    };

    fn listing_at(id: &str, coords: Option<(f64, f64)>) -> Listing {
        Listing {
            id: id.to_string(),
            name: format!("Shop {id}"),
            address: String::new(),
            city: String::new(),
            latitude: coords.map(|(lat, _)| lat),
            longitude: coords.map(|(_, lng)| lng),
            place_id: None,
            source: SourceTier::Static,
        }
    }

    #[test]
    fn empty_input_ranks_to_empty() {
        assert!(rank_by_distance(&[], PARIS).is_empty());
    }

    #[test]
    fn distances_are_non_decreasing() {
        let listings = vec![
            listing_at("marseille", Some((43.2965, 5.3698))),
            listing_at("versailles", Some((48.8049, 2.1204))),
            listing_at("lyon", Some((45.7578, 4.8320))),
        ];
        let ranked = rank_by_distance(&listings, PARIS);
        assert_eq!(ranked[0].listing.id, "versailles");
        for pair in ranked.windows(2) {
            assert!(pair[0].distance_km <= pair[1].distance_km);
        }
    }

    #[test]
    fn lyon_from_paris_is_about_392_km() {
        let listings = vec![listing_at("lyon", Some((45.7578, 4.8320)))];
        let ranked = rank_by_distance(&listings, PARIS);
        assert!((ranked[0].distance_km - 392.0).abs() < 2.0);
    }

    #[test]
    fn ties_keep_input_order() {
        let listings = vec![
            listing_at("first", Some((45.7578, 4.8320))),
            listing_at("second", Some((45.7578, 4.8320))),
            listing_at("third", Some((45.7578, 4.8320))),
        ];
        let ranked = rank_by_distance(&listings, PARIS);
        let order: Vec<&str> = ranked.iter().map(|r| r.listing.id.as_str()).collect();
        assert_eq!(order, vec!["first", "second", "third"]);
    }

    #[test]
    fn missing_coordinates_rank_as_null_island() {
        let listings = vec![
            listing_at("nowhere", None),
            listing_at("versailles", Some((48.8049, 2.1204))),
        ];
        let ranked = rank_by_distance(&listings, PARIS);
        assert_eq!(ranked.len(), 2, "ranker must never drop records");
        assert_eq!(ranked[0].listing.id, "versailles");
        let expected = haversine_km(PARIS, Coordinate::new(0.0, 0.0));
        assert!((ranked[1].distance_km - expected).abs() < 1e-9);
    }

    #[test]
    fn inputs_are_not_mutated() {
        let listings = vec![
            listing_at("lyon", Some((45.7578, 4.8320))),
            listing_at("versailles", Some((48.8049, 2.1204))),
        ];
        let before: Vec<String> = listings.iter().map(|l| l.id.clone()).collect();
        let _ = rank_by_distance(&listings, PARIS);
        let after: Vec<String> = listings.iter().map(|l| l.id.clone()).collect();
        assert_eq!(before, after);
    }
}
