//! Reconciliation and proximity-ranking engine for the leafdex directory.
//!
//! Merges the bundled static catalogue with the periodically-fetched live
//! feed, deduplicates by prioritized identity keys, ranks by haversine
//! distance from a resolved origin, and owns the refresh cycle that keeps
//! the published ordering current.

pub mod error;
pub mod location;
pub mod rank;
pub mod reconcile;
pub mod refresh;

pub use error::SourceError;
pub use location::{resolve_location, ResolvedLocation};
pub use rank::rank_by_distance;
pub use reconcile::{dedup_key, reconcile, KeyTier, MergeOutcome, MergeStats};
pub use refresh::{CycleOutcome, ListingSource, RefreshState, Snapshot};
