pub mod cache;
pub mod config;
pub mod controllers;
pub mod database;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;
pub mod store;

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

// Shared state of the whole application
#[derive(Clone)]
pub struct AppState {
    pub db: database::Database,
    /// `None` when the session cache is disabled or Redis was unreachable at startup.
    pub cache: Option<cache::CacheService>,
    pub config: config::Config,
}

impl AppState {
    pub async fn new(config: config::Config) -> anyhow::Result<Arc<Self>> {
        let db = database::Database::new(&config.database).await?;
        info!("Database connected");

        db.run_migrations().await?;

        let cache = if config.features.enable_session_cache {
            match cache::RedisClient::new(&config.redis.url).await {
                Ok(redis) => {
                    info!("Redis connected");
                    Some(cache::CacheService::new(redis, config.auth.session_ttl_seconds))
                }
                Err(e) => {
                    warn!("Redis unavailable, sessions will not be cached: {}", e);
                    None
                }
            }
        } else {
            None
        };

        Ok(Arc::new(Self { db, cache, config }))
    }
}

pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(|| async { "Club Portal API v1.0" }))
        .route("/health", get(|| async { "OK" }))
        .nest("/api", controllers::routes())
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
