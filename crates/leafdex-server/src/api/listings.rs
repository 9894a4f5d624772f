use axum::{extract::Query, extract::State, Extension, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use leafdex_core::{Coordinate, RankedListing};
use leafdex_engine::{rank_by_distance, resolve_location, MergeStats};

use crate::middleware::RequestId;

use super::{normalize_limit, ApiResponse, AppState, ResponseMeta};

/// Query parameters for the listings endpoint. `lat`/`lng`/`limit` arrive as
/// strings so an unparsable value degrades to the fallback origin instead of
/// rejecting the request. A bogus location is informational, never an error.
#[derive(Debug, Default, Deserialize)]
pub(super) struct ListingsQuery {
    lat: Option<String>,
    lng: Option<String>,
    limit: Option<String>,
}

impl ListingsQuery {
    fn requested_origin(&self) -> Option<Coordinate> {
        let lat = self.lat.as_deref()?.parse::<f64>().ok()?;
        let lng = self.lng.as_deref()?.parse::<f64>().ok()?;
        Some(Coordinate::new(lat, lng))
    }

    fn limit(&self) -> usize {
        normalize_limit(self.limit.as_deref().and_then(|s| s.parse().ok()))
    }
}

#[derive(Debug, Serialize)]
pub(super) struct LocationInfo {
    pub latitude: f64,
    pub longitude: f64,
    /// True when the configured fallback origin stood in for the request.
    pub fallback_used: bool,
}

#[derive(Debug, Serialize)]
pub(super) struct ListingsData {
    pub listings: Vec<RankedListing>,
    pub is_loading: bool,
    pub location: LocationInfo,
}

pub(super) async fn list_listings(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<ListingsQuery>,
) -> Json<ApiResponse<ListingsData>> {
    let resolved = resolve_location(query.requested_origin(), state.fallback);
    let (snapshot, is_loading) = state.refresh.read().await;

    let mut listings = match snapshot {
        // The published ranking already uses the fallback origin; only an
        // explicit origin needs a fresh ranking pass over the merged set.
        Some(snap) if resolved.fallback_used => snap.ranked.clone(),
        Some(snap) => rank_by_distance(&snap.merged, resolved.coordinate),
        None => Vec::new(),
    };
    listings.truncate(query.limit());

    Json(ApiResponse {
        data: ListingsData {
            listings,
            is_loading,
            location: LocationInfo {
                latitude: resolved.coordinate.latitude,
                longitude: resolved.coordinate.longitude,
                fallback_used: resolved.fallback_used,
            },
        },
        meta: ResponseMeta::new(req_id.0),
    })
}

#[derive(Debug, Serialize)]
pub(super) struct RefreshStatusData {
    pub is_loading: bool,
    pub cycle: Option<u64>,
    pub refreshed_at: Option<DateTime<Utc>>,
    pub merged_count: usize,
    pub live_count: usize,
    pub stats: Option<MergeStats>,
}

pub(super) async fn refresh_status(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<RefreshStatusData>> {
    let (snapshot, is_loading) = state.refresh.read().await;

    let data = snapshot.map_or(
        RefreshStatusData {
            is_loading,
            cycle: None,
            refreshed_at: None,
            merged_count: 0,
            live_count: 0,
            stats: None,
        },
        |snap| RefreshStatusData {
            is_loading,
            cycle: Some(snap.cycle),
            refreshed_at: Some(snap.refreshed_at),
            merged_count: snap.merged.len(),
            live_count: snap.live_count,
            stats: Some(snap.stats),
        },
    );

    Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    })
}
