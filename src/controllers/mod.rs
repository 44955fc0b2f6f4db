pub mod admin;
pub mod auth;
pub mod club;

use axum::Router;
use std::sync::Arc;

pub fn routes() -> Router<Arc<crate::AppState>> {
    Router::new()
        .merge(admin::routes())
        .merge(club::routes())
        .merge(auth::routes())
}
