//! One-shot refresh: fetch the live feed, reconcile, rank, print.

use leafdex_core::Coordinate;
use leafdex_engine::{resolve_location, CycleOutcome, RefreshState};
use leafdex_feed::ListingFeed;

use crate::output::print_ranked;

/// Run a single refresh cycle against the configured feed and print the
/// nearest listings for the requested (or fallback) origin.
pub async fn run(lat: Option<f64>, lng: Option<f64>, limit: usize) -> anyhow::Result<()> {
    let config = leafdex_core::load_app_config()?;
    let static_listings =
        leafdex_core::resolve_static_listings(config.snapshot_path.as_deref())?;
    let feed = ListingFeed::new(
        config.feed_url.clone(),
        config.feed_timeout_secs,
        config.feed_user_agent.clone(),
    )?;

    let requested = match (lat, lng) {
        (Some(lat), Some(lng)) => Some(Coordinate::new(lat, lng)),
        _ => None,
    };
    let resolved = resolve_location(requested, config.fallback_coordinate());

    let refresh = RefreshState::new();
    match refresh
        .run_cycle(&feed, &static_listings, resolved.coordinate)
        .await
    {
        CycleOutcome::Completed {
            merged, live, ..
        } => {
            println!("refreshed: {live} live records, {merged} after reconciliation");
        }
        CycleOutcome::FetchFailed { .. } => {
            println!("live feed unavailable; showing static catalogue only");
        }
        // A freshly-created state has no cycle in flight.
        CycleOutcome::Skipped => {}
    }

    if resolved.fallback_used {
        println!(
            "no origin supplied; ranking from fallback ({:.4}, {:.4})",
            resolved.coordinate.latitude, resolved.coordinate.longitude
        );
    }

    let (snapshot, _) = refresh.read().await;
    if let Some(snapshot) = snapshot {
        print_ranked(&snapshot.ranked, limit);
        if snapshot.stats.text_keyed > 0 {
            println!(
                "note: {} record(s) deduplicated by text fallback",
                snapshot.stats.text_keyed
            );
        }
    }
    Ok(())
}
