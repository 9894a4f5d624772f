//! Multi-source listing reconciliation.
//!
//! Merges the static catalogue and the live feed into one deduplicated set.
//! Identity is decided by a prioritized key (place id, then rounded
//! coordinates, then normalized text); collisions are resolved by comparing
//! source tiers, so the merge result does not depend on which source is
//! processed first.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use serde::Serialize;

use leafdex_core::Listing;

/// Which dedup rule produced a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyTier {
    /// External place registry id, the strongest identity signal.
    Place,
    /// Coordinates rounded to 5 decimal places (~1.1 m).
    Geo,
    /// Normalized name/address/city: the weakest tier, last resort for
    /// records lacking both other signals.
    Text,
}

/// Counters describing one merge pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MergeStats {
    /// Records received across both sources.
    pub input: usize,
    /// Records surviving deduplication.
    pub kept: usize,
    /// Records dropped because their key was claimed by a higher- or
    /// equal-priority record.
    pub duplicates_dropped: usize,
    /// Exact same-id repeats skipped within a single source pass.
    pub repeats_skipped: usize,
    /// Records that fell through to the text tier. A rising value signals a
    /// data-quality regression in the sources.
    pub text_keyed: usize,
}

/// Result of [`reconcile`]: the merged listings (in no particular order; ranking
/// imposes order downstream) plus the pass counters.
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    pub listings: Vec<Listing>,
    pub stats: MergeStats,
}

/// Compute a listing's dedup key and the tier that produced it.
///
/// Rules, first match wins: non-empty place id; both coordinates present and
/// non-zero, rounded to 5 decimals; normalized name/address/city.
#[must_use]
pub fn dedup_key(listing: &Listing) -> (String, KeyTier) {
    if let Some(place_id) = listing
        .place_id
        .as_deref()
        .filter(|s| !s.trim().is_empty())
    {
        return (format!("place:{place_id}"), KeyTier::Place);
    }

    if let (Some(lat), Some(lng)) = (listing.latitude, listing.longitude) {
        if lat != 0.0 && lng != 0.0 {
            // 5 decimal places is roughly 1.1 m: absorbs GPS and geocoder jitter while
            // keeping genuinely distinct addresses apart.
            return (format!("geo:{lat:.5}_{lng:.5}"), KeyTier::Geo);
        }
    }

    let key = format!(
        "name:{}|addr:{}|city:{}",
        normalize(&listing.name),
        normalize(&listing.address),
        normalize(&listing.city)
    );
    (key, KeyTier::Text)
}

/// Lower-case and strip all whitespace.
fn normalize(s: &str) -> String {
    s.to_lowercase().split_whitespace().collect()
}

/// Merge both sources into one deduplicated set.
///
/// On a key collision the record from the strictly higher-priority source
/// replaces the incumbent; lower or equal priority is dropped whole (records
/// are never merged field-by-field). Empty inputs are fine and simply produce
/// a smaller (possibly empty) output.
#[must_use]
pub fn reconcile(static_listings: &[Listing], live_listings: &[Listing]) -> MergeOutcome {
    let mut winners: HashMap<String, Listing> = HashMap::new();
    let mut stats = MergeStats {
        input: static_listings.len() + live_listings.len(),
        ..MergeStats::default()
    };

    for batch in [live_listings, static_listings] {
        // Guards against the same record appearing twice in one source pass;
        // cross-source identity is the key map's job.
        let mut seen_ids: HashSet<&str> = HashSet::with_capacity(batch.len());

        for listing in batch {
            if !seen_ids.insert(listing.id.as_str()) {
                stats.repeats_skipped += 1;
                continue;
            }

            let (key, tier) = dedup_key(listing);
            if tier == KeyTier::Text {
                stats.text_keyed += 1;
                tracing::debug!(
                    id = %listing.id,
                    source = %listing.source,
                    key = %key,
                    "listing keyed by weakest dedup tier"
                );
            }

            match winners.entry(key) {
                Entry::Vacant(slot) => {
                    slot.insert(listing.clone());
                }
                Entry::Occupied(mut slot) => {
                    if listing.source > slot.get().source {
                        slot.insert(listing.clone());
                    }
                    stats.duplicates_dropped += 1;
                }
            }
        }
    }

    stats.kept = winners.len();
    if stats.text_keyed > 0 {
        tracing::debug!(
            text_keyed = stats.text_keyed,
            input = stats.input,
            "merge used the text fallback tier"
        );
    }

    MergeOutcome {
        listings: winners.into_values().collect(),
        stats,
    }
}
