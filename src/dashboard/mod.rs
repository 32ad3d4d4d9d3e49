//! Dashboard — Axum web server for card search and session portfolios.
//!
//! Serves a REST API and a self-contained HTML page.
//! CORS enabled for local development.

pub mod routes;

use anyhow::{Context, Result};
use axum::{
    http::{header, Method},
    response::Html,
    routing::{delete, get, post},
    Router,
};
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use routes::AppState;

/// The embedded page (compiled into the binary).
const DASHBOARD_HTML: &str = include_str!("templates/index.html");

const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Bind `port` and serve until Ctrl+C. Sessions idle longer than
/// `session_idle` are swept in the background.
pub async fn serve(state: AppState, port: u16, session_idle: Duration) -> Result<()> {
    let sweeper = spawn_session_sweeper(state.clone(), session_idle);
    let app = build_router(state);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind dashboard port {port}"))?;

    info!(port, "Dashboard server listening on http://localhost:{port}");

    let result = axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received.");
        })
        .await
        .context("Dashboard server error");

    sweeper.abort();
    result
}

/// Periodically drop idle sessions so abandoned browsers do not
/// accumulate.
fn spawn_session_sweeper(state: AppState, max_idle: Duration) -> tokio::task::JoinHandle<()> {
    let period = SESSION_SWEEP_INTERVAL
        .min(max_idle)
        .max(Duration::from_secs(1));
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            state.sessions.expire_idle(max_idle).await;
        }
    })
}

/// Build the Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        // API routes
        .route("/api/search", get(routes::search))
        .route("/api/sessions", post(routes::open_session))
        .route("/api/sessions/:id", delete(routes::end_session))
        .route(
            "/api/sessions/:id/portfolio",
            get(routes::get_portfolio)
                .post(routes::add_to_portfolio)
                .delete(routes::clear_portfolio),
        )
        .route("/health", get(routes::health))
        // Dashboard HTML
        .route("/", get(serve_dashboard))
        .layer(cors)
        .with_state(state)
}

async fn serve_dashboard() -> Html<&'static str> {
    Html(DASHBOARD_HTML)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
