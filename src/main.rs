use std::sync::{Arc, Mutex};

use axum::http::Method;
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use salonbook::config::AppConfig;
use salonbook::db;
use salonbook::handlers;
use salonbook::services::slots::SlotGrid;
use salonbook::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    // A bad schedule is a deployment mistake; refuse to start rather than
    // serve a truncated grid.
    let grid = SlotGrid::parse(&config.open_time, &config.close_time, config.slot_minutes)?;
    tracing::info!(
        hours = %grid.hours_label(),
        slot_minutes = grid.slot_minutes(),
        "schedule configured"
    );

    let conn = db::init_db(&config.database_url)?;

    let state = Arc::new(AppState {
        db: Arc::new(Mutex::new(conn)),
        config: config.clone(),
        grid,
    });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::DELETE])
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(handlers::health::health))
        .route("/api/availability", get(handlers::appointments::availability))
        .route(
            "/api/appointments",
            get(handlers::appointments::list_all).post(handlers::appointments::create),
        )
        .route(
            "/api/appointments/day/:date",
            get(handlers::appointments::list_for_date),
        )
        .route(
            "/api/appointments/:id",
            axum::routing::patch(handlers::appointments::update_status)
                .delete(handlers::appointments::delete),
        )
        .route(
            "/api/appointments/:id/ics",
            get(handlers::appointments::download_ics),
        )
        .route(
            "/api/services",
            get(handlers::services::list).post(handlers::services::create),
        )
        .route(
            "/api/services/:id",
            axum::routing::put(handlers::services::update).delete(handlers::services::delete),
        )
        .route(
            "/api/gallery",
            get(handlers::gallery::list).post(handlers::gallery::create),
        )
        .route("/api/gallery/:id", axum::routing::delete(handlers::gallery::delete))
        .route(
            "/api/contact",
            get(handlers::contact::get).put(handlers::contact::update),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
