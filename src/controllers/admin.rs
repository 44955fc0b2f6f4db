use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;

use crate::error::PortalError;
use crate::middleware::AdminSession;
use crate::services::{AdminReview, ReviewRequest, Selection};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/admin/pending", get(pending_queue))
        .route("/admin/pending/events/{id}", get(pending_event))
        .route("/admin/pending/budget-requests/{id}", get(pending_budget_request))
        .route("/admin/review", post(review))
}

// GET /api/admin/pending
async fn pending_queue(
    State(state): State<Arc<AppState>>,
    _admin: AdminSession,
) -> Result<impl IntoResponse, PortalError> {
    let queue = AdminReview::new(&state.db).load_queue().await?;

    Ok(Json(json!({
        "success": true,
        "events": queue.events,
        "budget_requests": queue.budget_requests,
    })))
}

// GET /api/admin/pending/events/{id}
async fn pending_event(
    State(state): State<Arc<AppState>>,
    _admin: AdminSession,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, PortalError> {
    let detail = AdminReview::new(&state.db).details(Selection::Event(id)).await?;
    Ok(Json(json!({ "success": true, "detail": detail })))
}

// GET /api/admin/pending/budget-requests/{id}
async fn pending_budget_request(
    State(state): State<Arc<AppState>>,
    _admin: AdminSession,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, PortalError> {
    let detail = AdminReview::new(&state.db)
        .details(Selection::BudgetRequest(id))
        .await?;
    Ok(Json(json!({ "success": true, "detail": detail })))
}

// POST /api/admin/review
async fn review(
    State(state): State<Arc<AppState>>,
    AdminSession(admin): AdminSession,
    Json(req): Json<ReviewRequest>,
) -> Result<impl IntoResponse, PortalError> {
    tracing::info!("{} reviews {:?} ({:?})", admin.email, req.selection, req.action);

    let outcome = AdminReview::new(&state.db).review(req).await?;

    Ok(Json(json!({
        "success": true,
        "record": outcome.record,
        "notices": outcome.notices,
        "queue": outcome.queue,
    })))
}
