//! Resolution of the acting user's origin coordinate.

use serde::Serialize;

use leafdex_core::Coordinate;

/// The origin used for ranking, plus whether the configured fallback had to
/// stand in for the requested location.
///
/// `fallback_used` is the informational signal consumers may surface; a
/// missing or bogus location is never an error.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResolvedLocation {
    pub coordinate: Coordinate,
    pub fallback_used: bool,
}

/// Resolve the ranking origin from an optional requested coordinate.
///
/// A well-formed request passes through untouched; an absent or out-of-range
/// one resolves to `fallback`.
#[must_use]
pub fn resolve_location(requested: Option<Coordinate>, fallback: Coordinate) -> ResolvedLocation {
    match requested {
        Some(coordinate) if coordinate.is_valid() => ResolvedLocation {
            coordinate,
            fallback_used: false,
        },
        Some(coordinate) => {
            tracing::warn!(
                latitude = coordinate.latitude,
                longitude = coordinate.longitude,
                "requested location out of range; using fallback origin"
            );
            ResolvedLocation {
                coordinate: fallback,
                fallback_used: true,
            }
        }
        None => ResolvedLocation {
            coordinate: fallback,
            fallback_used: true,
        },
    }
}
