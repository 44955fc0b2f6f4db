use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;

use crate::error::PortalError;
use crate::middleware::ClubSession;
use crate::models::{NewEventRequest, Notice};
use crate::services::{ClubStatus, EventSubmission};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/club/status", get(club_status))
        .route("/club/events", post(submit_event))
}

// GET /api/club/status
async fn club_status(
    State(state): State<Arc<AppState>>,
    ClubSession(club): ClubSession,
) -> impl IntoResponse {
    let today = Utc::now().date_naive();
    let view = ClubStatus::new(&state.db).load(&club.email, today).await;

    let success = !view.notices.iter().any(Notice::is_error);
    Json(json!({
        "success": success,
        "events": view.events,
        "budget_requests": view.budget_requests,
        "notices": view.notices,
    }))
}

// POST /api/club/events
async fn submit_event(
    State(state): State<Arc<AppState>>,
    ClubSession(club): ClubSession,
    Json(req): Json<NewEventRequest>,
) -> Result<impl IntoResponse, PortalError> {
    let event = EventSubmission::new(&state.db).submit(&club.email, req).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "event": event,
            "notices": [Notice::success("Request submitted successfully")],
        })),
    ))
}
