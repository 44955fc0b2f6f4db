use axum::{extract::State, response::IntoResponse, routing::post, Json, Router};
use serde_json::json;
use std::sync::Arc;

use crate::models::Session;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/logout", post(logout))
}

// POST /api/logout
async fn logout(State(state): State<Arc<AppState>>, session: Session) -> impl IntoResponse {
    if let Some(cache) = &state.cache {
        if let Err(e) = cache.invalidate_sessions(&session.email).await {
            tracing::error!("Failed to invalidate sessions for {}: {}", session.email, e);
        }
    }

    Json(json!({ "success": true, "logout": true }))
}
