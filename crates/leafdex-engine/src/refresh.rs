//! The periodic fetch → reconcile → rank cycle.
//!
//! [`RefreshState`] is the single owner of the published read model. Cycles
//! are serialized: a tick landing while a cycle is in flight is skipped, and
//! a monotonic cycle counter guards publication so a stale cycle can never
//! overwrite a newer one. Fetch failures are absorbed: the previous snapshot
//! keeps serving and the next tick retries.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, RwLock};

use leafdex_core::{Coordinate, Listing, RankedListing};

use crate::error::SourceError;
use crate::rank::rank_by_distance;
use crate::reconcile::{reconcile, MergeOutcome, MergeStats};

/// The live listing collection, fetched as a whole. Each successful fetch
/// replaces the previous live snapshot wholesale.
pub trait ListingSource {
    fn fetch_listings(&self) -> impl Future<Output = Result<Vec<Listing>, SourceError>> + Send;
}

/// Output of one complete cycle. Always built in full before publication, so
/// consumers never observe a partial merge.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Reconciled set, unordered. Consumers re-rank this for per-request
    /// origins.
    pub merged: Vec<Listing>,
    /// The merged set ranked by the configured default origin.
    pub ranked: Vec<RankedListing>,
    pub cycle: u64,
    pub refreshed_at: DateTime<Utc>,
    /// Live records received this cycle (0 for static-only snapshots).
    pub live_count: usize,
    pub stats: MergeStats,
}

#[derive(Debug)]
struct ReadModel {
    snapshot: Option<Arc<Snapshot>>,
    is_loading: bool,
}

/// Shared owner of the refresh cycle and its published result.
#[derive(Debug)]
pub struct RefreshState {
    model: RwLock<ReadModel>,
    in_flight: Mutex<()>,
    cycles: AtomicU64,
}

/// What a single [`RefreshState::run_cycle`] call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// A fresh snapshot was published.
    Completed {
        cycle: u64,
        merged: usize,
        live: usize,
    },
    /// The live fetch failed. `retained` is true when a previous snapshot
    /// kept serving; false means a static-only snapshot was published
    /// because nothing had been published yet.
    FetchFailed { cycle: u64, retained: bool },
    /// Another cycle was already in flight; this tick did nothing.
    Skipped,
}

impl Default for RefreshState {
    fn default() -> Self {
        Self::new()
    }
}

impl RefreshState {
    #[must_use]
    pub fn new() -> Self {
        Self {
            model: RwLock::new(ReadModel {
                snapshot: None,
                is_loading: false,
            }),
            in_flight: Mutex::new(()),
            cycles: AtomicU64::new(0),
        }
    }

    /// Current snapshot (if any cycle has published) and the loading flag.
    pub async fn read(&self) -> (Option<Arc<Snapshot>>, bool) {
        let model = self.model.read().await;
        (model.snapshot.clone(), model.is_loading)
    }

    /// Publish a static-only snapshot so consumers have data before the
    /// first live cycle lands. Does nothing once anything is published.
    pub async fn seed(&self, static_listings: &[Listing], origin: Coordinate) {
        let snapshot = build_snapshot(0, reconcile(static_listings, &[]), origin, 0);
        let mut model = self.model.write().await;
        if model.snapshot.is_none() {
            tracing::info!(
                merged = snapshot.merged.len(),
                "seeded static-only snapshot"
            );
            model.snapshot = Some(Arc::new(snapshot));
        }
    }

    /// Run one fetch → reconcile → rank cycle and publish the result.
    ///
    /// Returns [`CycleOutcome::Skipped`] when a cycle is already in flight;
    /// cycles never run concurrently with themselves.
    pub async fn run_cycle<S>(
        &self,
        source: &S,
        static_listings: &[Listing],
        origin: Coordinate,
    ) -> CycleOutcome
    where
        S: ListingSource + Sync,
    {
        let Ok(_guard) = self.in_flight.try_lock() else {
            tracing::debug!("refresh cycle already in flight; skipping tick");
            return CycleOutcome::Skipped;
        };

        let cycle = self.cycles.fetch_add(1, Ordering::SeqCst) + 1;
        self.set_loading(true).await;

        let live = match source.fetch_listings().await {
            Ok(listings) => listings,
            Err(e) => {
                tracing::warn!(
                    cycle,
                    error = %e,
                    "live fetch failed; serving last published snapshot"
                );
                let retained = {
                    let model = self.model.read().await;
                    model.snapshot.is_some()
                };
                if !retained {
                    // First cycle and nothing seeded: degrade to the static
                    // catalogue alone rather than serving nothing.
                    let snapshot =
                        build_snapshot(cycle, reconcile(static_listings, &[]), origin, 0);
                    self.publish(snapshot).await;
                }
                self.set_loading(false).await;
                return CycleOutcome::FetchFailed { cycle, retained };
            }
        };

        let live_count = live.len();
        let snapshot = build_snapshot(
            cycle,
            reconcile(static_listings, &live),
            origin,
            live_count,
        );
        let merged = snapshot.merged.len();
        self.publish(snapshot).await;
        self.set_loading(false).await;

        CycleOutcome::Completed {
            cycle,
            merged,
            live: live_count,
        }
    }

    async fn publish(&self, snapshot: Snapshot) {
        let mut model = self.model.write().await;
        if let Some(existing) = &model.snapshot {
            // Most-recent-completed-cycle wins; a slow older cycle must not
            // clobber a newer publication.
            if snapshot.cycle <= existing.cycle {
                tracing::warn!(
                    stale = snapshot.cycle,
                    current = existing.cycle,
                    "discarding stale cycle result"
                );
                return;
            }
        }
        model.snapshot = Some(Arc::new(snapshot));
    }

    async fn set_loading(&self, is_loading: bool) {
        let mut model = self.model.write().await;
        model.is_loading = is_loading;
    }
}

fn build_snapshot(
    cycle: u64,
    outcome: MergeOutcome,
    origin: Coordinate,
    live_count: usize,
) -> Snapshot {
    let ranked = rank_by_distance(&outcome.listings, origin);
    Snapshot {
        merged: outcome.listings,
        ranked,
        cycle,
        refreshed_at: Utc::now(),
        live_count,
        stats: outcome.stats,
    }
}
