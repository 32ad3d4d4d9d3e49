//! Dashboard API route handlers.
//!
//! All endpoints return JSON. State is shared via `Arc<DashboardState>`.
//! Portfolio routes are scoped to a session id in the path.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

use crate::engine::analyzer::{CardAnalyzer, SearchReport};
use crate::engine::portfolio::Portfolio;
use crate::engine::session::SessionStore;
use crate::types::PortfolioEntry;

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

/// Shared state accessible by all route handlers.
pub struct DashboardState {
    pub analyzer: CardAnalyzer,
    pub sessions: SessionStore,
}

impl DashboardState {
    pub fn new(analyzer: CardAnalyzer) -> Self {
        Self {
            analyzer,
            sessions: SessionStore::new(),
        }
    }
}

pub type AppState = Arc<DashboardState>;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    #[serde(default = "first_page")]
    pub page: usize,
}

fn first_page() -> usize {
    1
}

#[derive(Debug, Deserialize)]
pub struct AddEntryRequest {
    pub name: String,
    pub set_name: String,
    pub buy_price: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct PortfolioResponse {
    pub entries: Vec<PortfolioEntry>,
    pub total: Decimal,
    pub count: usize,
}

impl From<&Portfolio> for PortfolioResponse {
    fn from(p: &Portfolio) -> Self {
        Self {
            entries: p.entries().to_vec(),
            total: p.total(),
            count: p.len(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionResponse {
    pub session_id: Uuid,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

fn unknown_session(id: Uuid) -> ApiError {
    api_error(StatusCode::NOT_FOUND, format!("Unknown session {id}"))
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

/// GET /api/search?q=<name>&page=<n>
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchReport>, ApiError> {
    match state.analyzer.search(&params.q, params.page).await {
        Ok(report) => Ok(Json(report)),
        Err(e) => {
            warn!(query = %params.q, error = %format!("{e:#}"), "Search failed");
            Err(api_error(StatusCode::BAD_GATEWAY, format!("{e:#}")))
        }
    }
}

/// POST /api/sessions
pub async fn open_session(State(state): State<AppState>) -> (StatusCode, Json<SessionResponse>) {
    let session_id = state.sessions.open().await;
    (StatusCode::CREATED, Json(SessionResponse { session_id }))
}

/// DELETE /api/sessions/:id
pub async fn end_session(State(state): State<AppState>, Path(id): Path<Uuid>) -> StatusCode {
    if state.sessions.end(id).await {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

/// GET /api/sessions/:id/portfolio
pub async fn get_portfolio(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PortfolioResponse>, ApiError> {
    state
        .sessions
        .with_existing(id, |p| Json(PortfolioResponse::from(&*p)))
        .await
        .ok_or_else(|| unknown_session(id))
}

/// POST /api/sessions/:id/portfolio
pub async fn add_to_portfolio(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<AddEntryRequest>,
) -> Result<(StatusCode, Json<PortfolioResponse>), ApiError> {
    if req.buy_price < Decimal::ZERO {
        warn!(session_id = %id, buy_price = %req.buy_price, "Rejected negative buy price");
        return Err(api_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            "buy_price must not be negative",
        ));
    }

    let entry = PortfolioEntry::new(&req.name, &req.set_name, req.buy_price);
    let resp = state
        .sessions
        .with_portfolio(id, |p| {
            p.add(entry);
            PortfolioResponse::from(&*p)
        })
        .await;
    Ok((StatusCode::CREATED, Json(resp)))
}

/// DELETE /api/sessions/:id/portfolio
pub async fn clear_portfolio(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PortfolioResponse>, ApiError> {
    state
        .sessions
        .with_existing(id, |p| {
            p.clear();
            Json(PortfolioResponse::from(&*p))
        })
        .await
        .ok_or_else(|| unknown_session(id))
}

/// GET /health
pub async fn health() -> StatusCode {
    StatusCode::OK
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
