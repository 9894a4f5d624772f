mod api;
mod middleware;
mod scheduler;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::api::{build_app, default_rate_limit_state, AppState};
use crate::scheduler::RefreshContext;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = leafdex_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let static_listings = leafdex_core::resolve_static_listings(config.snapshot_path.as_deref())?;
    tracing::info!(count = static_listings.len(), "static catalogue loaded");

    let feed = leafdex_feed::ListingFeed::new(
        config.feed_url.clone(),
        config.feed_timeout_secs,
        config.feed_user_agent.clone(),
    )?;

    let origin = config.fallback_coordinate();
    let refresh = Arc::new(leafdex_engine::RefreshState::new());
    // Consumers get the static catalogue immediately; the first live cycle
    // replaces it as soon as the feed answers.
    refresh.seed(&static_listings, origin).await;

    let ctx = Arc::new(RefreshContext {
        refresh: Arc::clone(&refresh),
        feed,
        static_listings,
        origin,
    });

    // First refresh on startup; the scheduler owns every tick after that.
    let startup_ctx = Arc::clone(&ctx);
    tokio::spawn(async move {
        startup_ctx.run_and_log().await;
    });

    let _scheduler = scheduler::build_scheduler(Arc::clone(&ctx), &config.refresh_schedule).await?;

    let app = build_app(
        AppState {
            refresh,
            fallback: origin,
        },
        default_rate_limit_state(),
    );

    tracing::info!(addr = %config.bind_addr, env = %config.env, "leafdex-server listening");
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
