mod listings;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use leafdex_core::Coordinate;
use leafdex_engine::RefreshState;

use crate::middleware::{enforce_rate_limit, request_id, RateLimitState, RequestId};

#[derive(Clone)]
pub struct AppState {
    pub refresh: Arc<RefreshState>,
    /// Origin used when a request supplies no usable location.
    pub fallback: Coordinate,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    catalog: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

pub(super) fn normalize_limit(limit: Option<usize>) -> usize {
    limit.unwrap_or(50).clamp(1, 200)
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static("x-request-id"),
        ])
}

fn limited_router(rate_limit: RateLimitState) -> Router<AppState> {
    Router::new()
        .route("/api/v1/listings", get(listings::list_listings))
        .route(
            "/api/v1/listings/status",
            get(listings::refresh_status),
        )
        .layer(ServiceBuilder::new().layer(axum::middleware::from_fn_with_state(
            rate_limit,
            enforce_rate_limit,
        )))
}

pub fn build_app(state: AppState, rate_limit: RateLimitState) -> Router {
    let public_routes = Router::new().route("/api/v1/health", get(health));

    Router::new()
        .merge(public_routes)
        .merge(limited_router(rate_limit))
        .layer(
            ServiceBuilder::new()
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let meta = ResponseMeta::new(req_id.0);
    let (snapshot, _) = state.refresh.read().await;

    // "warming" only lasts until the startup seed or the first cycle lands.
    let catalog = if snapshot.is_some() { "ready" } else { "warming" };
    (
        StatusCode::OK,
        Json(ApiResponse {
            data: HealthData {
                status: "ok",
                catalog,
            },
            meta,
        }),
    )
}

pub fn default_rate_limit_state() -> RateLimitState {
    RateLimitState::new(120, Duration::from_secs(60))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use leafdex_core::{Listing, SourceTier};
    use tower::ServiceExt;

    const PARIS: Coordinate = Coordinate {
        latitude: 48.8566,
        longitude: 2.3522,
    };

    fn static_listing(id: &str, name: &str, coords: (f64, f64)) -> Listing {
        Listing {
            id: id.to_string(),
            name: name.to_string(),
            address: String::new(),
            city: String::new(),
            latitude: Some(coords.0),
            longitude: Some(coords.1),
            place_id: None,
            source: SourceTier::Static,
        }
    }

    async fn seeded_state() -> AppState {
        let refresh = Arc::new(RefreshState::new());
        let listings = vec![
            static_listing("lyon", "Lyon Shop", (45.7578, 4.8320)),
            static_listing("versailles", "Versailles Shop", (48.8049, 2.1204)),
            static_listing("marseille", "Marseille Shop", (43.2965, 5.3698)),
        ];
        refresh.seed(&listings, PARIS).await;
        AppState {
            refresh,
            fallback: PARIS,
        }
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .uri(uri)
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json = serde_json::from_slice(&body).expect("json parse");
        (status, json)
    }

    #[test]
    fn normalize_limit_applies_defaults_and_bounds() {
        assert_eq!(normalize_limit(None), 50);
        assert_eq!(normalize_limit(Some(0)), 1);
        assert_eq!(normalize_limit(Some(1_000)), 200);
        assert_eq!(normalize_limit(Some(25)), 25);
    }

    #[tokio::test]
    async fn health_reports_ready_once_seeded() {
        let app = build_app(seeded_state().await, default_rate_limit_state());
        let (status, json) = get_json(app, "/api/v1/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["status"].as_str(), Some("ok"));
        assert_eq!(json["data"]["catalog"].as_str(), Some("ready"));
        assert!(json["meta"]["request_id"].is_string());
    }

    #[tokio::test]
    async fn health_reports_warming_before_any_snapshot() {
        let state = AppState {
            refresh: Arc::new(RefreshState::new()),
            fallback: PARIS,
        };
        let app = build_app(state, default_rate_limit_state());
        let (status, json) = get_json(app, "/api/v1/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["catalog"].as_str(), Some("warming"));
    }

    #[tokio::test]
    async fn listings_are_ranked_nearest_first_for_explicit_origin() {
        let app = build_app(seeded_state().await, default_rate_limit_state());
        let (status, json) =
            get_json(app, "/api/v1/listings?lat=48.8566&lng=2.3522").await;
        assert_eq!(status, StatusCode::OK);

        let listings = json["data"]["listings"].as_array().expect("listings array");
        let order: Vec<&str> = listings
            .iter()
            .map(|l| l["id"].as_str().expect("id"))
            .collect();
        assert_eq!(order, vec!["versailles", "lyon", "marseille"]);

        let mut last = 0.0_f64;
        for item in listings {
            let d = item["distance_km"].as_f64().expect("distance_km");
            assert!(d >= last, "distances must be non-decreasing");
            last = d;
        }
        assert_eq!(json["data"]["location"]["fallback_used"].as_bool(), Some(false));
    }

    #[tokio::test]
    async fn listings_without_origin_fall_back() {
        let app = build_app(seeded_state().await, default_rate_limit_state());
        let (status, json) = get_json(app, "/api/v1/listings").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["location"]["fallback_used"].as_bool(), Some(true));
        assert!(
            (json["data"]["location"]["latitude"].as_f64().unwrap() - 48.8566).abs() < 1e-9
        );
    }

    #[tokio::test]
    async fn listings_with_unparsable_origin_fall_back() {
        let app = build_app(seeded_state().await, default_rate_limit_state());
        let (status, json) =
            get_json(app, "/api/v1/listings?lat=somewhere&lng=2.35").await;
        assert_eq!(status, StatusCode::OK, "bogus location is never an error");
        assert_eq!(json["data"]["location"]["fallback_used"].as_bool(), Some(true));
    }

    #[tokio::test]
    async fn listings_respect_limit() {
        let app = build_app(seeded_state().await, default_rate_limit_state());
        let (_, json) = get_json(app, "/api/v1/listings?limit=2").await;
        assert_eq!(
            json["data"]["listings"].as_array().map(Vec::len),
            Some(2)
        );
    }

    #[tokio::test]
    async fn listings_before_any_snapshot_are_empty_and_loading_flag_present() {
        let state = AppState {
            refresh: Arc::new(RefreshState::new()),
            fallback: PARIS,
        };
        let app = build_app(state, default_rate_limit_state());
        let (status, json) = get_json(app, "/api/v1/listings").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["listings"].as_array().map(Vec::len), Some(0));
        assert_eq!(json["data"]["is_loading"].as_bool(), Some(false));
    }

    #[tokio::test]
    async fn status_endpoint_reports_cycle_and_counts() {
        let app = build_app(seeded_state().await, default_rate_limit_state());
        let (status, json) = get_json(app, "/api/v1/listings/status").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["cycle"].as_u64(), Some(0));
        assert_eq!(json["data"]["merged_count"].as_u64(), Some(3));
        assert_eq!(json["data"]["live_count"].as_u64(), Some(0));
        assert_eq!(json["data"]["is_loading"].as_bool(), Some(false));
        assert!(json["data"]["refreshed_at"].is_string());
    }

    #[tokio::test]
    async fn rate_limit_returns_429_when_exhausted() {
        let state = seeded_state().await;
        let rate_limit = RateLimitState::new(1, Duration::from_secs(60));
        let app = build_app(state, rate_limit);

        let first = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/listings")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(first.status(), StatusCode::OK);

        let second = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/listings")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[tokio::test]
    async fn responses_echo_request_id_header() {
        let app = build_app(seeded_state().await, default_rate_limit_state());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/health")
                    .header("x-request-id", "req-test-1")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(
            response
                .headers()
                .get("x-request-id")
                .and_then(|v| v.to_str().ok()),
            Some("req-test-1")
        );
    }
}
