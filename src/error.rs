//! Error taxonomy of the portal.
//!
//! Every failure (backend fetch, missing record, rejected input, auth) ends up
//! here and is rendered the same way: logged, turned into a notice and returned
//! as `{"success": false, ...}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::models::Notice;

#[derive(Error, Debug)]
pub enum PortalError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    #[error("{0}")]
    Validation(String),

    #[error("Invalid input: {0}")]
    InvalidInput(#[from] validator::ValidationErrors),

    #[error("Event {0} not found")]
    EventNotFound(i64),

    #[error("Budget request {0} not found")]
    BudgetRequestNotFound(i64),

    #[error("Club not found for email {0}")]
    ClubNotFound(String),

    #[error("{kind} {id} was already processed (status {status})")]
    AlreadyProcessed {
        kind: &'static str,
        id: i64,
        status: String,
    },

    #[error("Authentication required")]
    Unauthorized,

    #[error("Session does not match the requested identity")]
    SessionMismatch,

    #[error("Permission denied")]
    Forbidden,

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, PortalError>;

const GENERIC_FAILURE: &str = "Something went wrong, please try again";

impl PortalError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            PortalError::Validation(_) | PortalError::InvalidInput(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            PortalError::EventNotFound(_)
            | PortalError::BudgetRequestNotFound(_)
            | PortalError::ClubNotFound(_) => StatusCode::NOT_FOUND,
            PortalError::AlreadyProcessed { .. } => StatusCode::CONFLICT,
            PortalError::Unauthorized | PortalError::SessionMismatch => StatusCode::UNAUTHORIZED,
            PortalError::Forbidden => StatusCode::FORBIDDEN,
            PortalError::Database(_)
            | PortalError::Migration(_)
            | PortalError::Cache(_)
            | PortalError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether the client should drop its stored identity and return to login.
    pub fn forces_logout(&self) -> bool {
        matches!(self, PortalError::Unauthorized | PortalError::SessionMismatch)
    }

    /// Client-facing message. Server faults are redacted; details stay in the logs.
    pub fn public_message(&self) -> String {
        if self.status_code().is_server_error() {
            GENERIC_FAILURE.to_string()
        } else {
            self.to_string()
        }
    }

    /// The notice shown to the user for this failure.
    pub fn notice(&self) -> Notice {
        Notice::error(self.public_message(), None)
    }
}

impl IntoResponse for PortalError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("request failed: {}", self);
        } else {
            tracing::warn!("request refused: {}", self);
        }

        let body = json!({
            "success": false,
            "error": self.public_message(),
            "notice": self.notice(),
            "logout": self.forces_logout(),
        });

        (status, Json(body)).into_response()
    }
}
