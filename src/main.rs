use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use venuebook::config::AppConfig;
use venuebook::db;
use venuebook::handlers;
use venuebook::services::store::SqliteStore;
use venuebook::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let conn = db::init_db(&config.database_url)?;
    if config.seed_demo_data {
        db::seed::seed_demo_data(&conn)?;
    }

    tracing::info!(
        latency_ms = config.store_latency_ms,
        booked_date_policy = ?config.booked_date_policy,
        transition_policy = ?config.transition_policy,
        "record store ready ({})",
        config.database_url
    );

    let state = Arc::new(AppState {
        store: Arc::new(SqliteStore::new(conn, config.store_latency())),
        config: config.clone(),
    });

    let app = Router::new()
        .route("/health", get(handlers::health::health))
        .route("/api/calendar", get(handlers::public::get_calendar))
        .route("/api/bookings", post(handlers::public::submit_booking))
        .route("/api/events/past", get(handlers::public::get_past_events))
        .route("/api/testimonials", get(handlers::public::get_testimonials))
        .route("/api/admin/bookings", get(handlers::admin::get_bookings))
        .route(
            "/api/admin/bookings/:id/status",
            post(handlers::admin::update_booking_status),
        )
        .route("/api/admin/dashboard", get(handlers::admin::get_dashboard))
        .route("/api/admin/calendar", get(handlers::admin::get_admin_calendar))
        .route("/api/admin/financials", get(handlers::admin::get_financials))
        .route(
            "/api/admin/registrations",
            get(handlers::admin::get_registrations),
        )
        .route("/calendar/feed.ics", get(handlers::calendar::calendar_feed))
        .route(
            "/calendar/:booking_id",
            get(handlers::calendar::download_ics),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
