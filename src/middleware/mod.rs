//! The authentication boundary.
//!
//! Handlers never look at credentials or the `email` query parameter
//! themselves: they take a [`Session`], [`AdminSession`] or [`ClubSession`]
//! and the extractor has already verified it.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use base64::{engine::general_purpose, Engine as _};
use std::sync::Arc;
use tracing::{debug, error, warn};

use crate::cache::CacheService;
use crate::error::PortalError;
use crate::models::{Role, Session};
use crate::store::PortalStore;
use crate::AppState;

#[derive(Debug, Clone)]
pub struct AdminSession(pub Session);

#[derive(Debug, Clone)]
pub struct ClubSession(pub Session);

/// Splits an `Authorization: Basic ...` header value into email and password.
pub fn parse_basic_auth(header_value: &str) -> Option<(String, String)> {
    let encoded = header_value.strip_prefix("Basic ")?;
    let decoded = general_purpose::STANDARD.decode(encoded.trim()).ok()?;
    let credentials = String::from_utf8(decoded).ok()?;

    let (email, password) = credentials.split_once(':')?;
    if email.is_empty() || password.is_empty() {
        return None;
    }
    Some((email.to_string(), password.to_string()))
}

/// Every `email` query parameter must name the session's account. A query
/// that cannot be decoded counts as a mismatch.
pub fn check_identity(session: &Session, query: Option<&str>) -> Result<(), PortalError> {
    let Some(query) = query else {
        return Ok(());
    };
    let pairs: Vec<(String, String)> = serde_urlencoded::from_str(query).map_err(|e| {
        warn!("Undecodable query for session {}: {}", session.email, e);
        PortalError::SessionMismatch
    })?;

    for (key, value) in pairs.iter().filter(|(key, _)| key == "email") {
        if *value != session.email {
            warn!("Session for {} used with {} parameter {}", session.email, key, value);
            return Err(PortalError::SessionMismatch);
        }
    }
    Ok(())
}

/// Admits `session` only when it carries `role`.
pub fn require_role(session: Session, role: Role) -> Result<Session, PortalError> {
    if session.role == role {
        Ok(session)
    } else {
        debug!("{} ({:?}) refused a {:?} route", session.email, session.role, role);
        Err(PortalError::Forbidden)
    }
}

/// Checks a credential pair against the cache, then the accounts table.
pub async fn verify_credentials<S: PortalStore>(
    store: &S,
    cache: Option<&CacheService>,
    email: &str,
    password: &str,
) -> Result<Session, PortalError> {
    if let Some(cache) = cache {
        match cache.get_cached_session(email, password).await {
            Ok(Some(session)) => return Ok(session),
            Ok(None) => {}
            Err(e) => warn!("Session cache unavailable, falling back to database: {}", e),
        }
    }

    let account = store
        .find_account(email)
        .await?
        .ok_or(PortalError::Unauthorized)?;

    let hash = account.password_hash.clone();
    let candidate = password.to_string();
    let valid = tokio::task::spawn_blocking(move || bcrypt::verify(candidate, &hash))
        .await
        .map_err(|e| PortalError::Internal(format!("password check aborted: {e}")))?
        .map_err(|e| {
            error!("Stored password hash of {} is unusable: {}", email, e);
            PortalError::Internal(format!("password hash of {email} is unusable"))
        })?;

    if !valid {
        debug!("Wrong password for {}", email);
        return Err(PortalError::Unauthorized);
    }

    let session = Session::from(&account);
    if let Some(cache) = cache {
        if let Err(e) = cache.cache_session(email, password, &session).await {
            warn!("Failed to cache session for {}: {}", email, e);
        }
    }

    Ok(session)
}

impl FromRequestParts<Arc<AppState>> for Session {
    type Rejection = PortalError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let (email, password) = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(parse_basic_auth)
            .ok_or(PortalError::Unauthorized)?;

        let session =
            verify_credentials(&state.db, state.cache.as_ref(), &email, &password).await?;
        check_identity(&session, parts.uri.query())?;

        Ok(session)
    }
}

impl FromRequestParts<Arc<AppState>> for AdminSession {
    type Rejection = PortalError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state).await?;
        require_role(session, Role::Admin).map(AdminSession)
    }
}

impl FromRequestParts<Arc<AppState>> for ClubSession {
    type Rejection = PortalError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state).await?;
        require_role(session, Role::Club).map(ClubSession)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn basic(credentials: &str) -> String {
        format!("Basic {}", general_purpose::STANDARD.encode(credentials))
    }

    #[test]
    fn parses_basic_credentials() {
        assert_eq!(
            parse_basic_auth(&basic("robotics@uni.edu:s3cret:with:colons")),
            Some(("robotics@uni.edu".to_string(), "s3cret:with:colons".to_string()))
        );
        assert_eq!(parse_basic_auth(&basic("no-colon")), None);
        assert_eq!(parse_basic_auth(&basic(":password")), None);
        assert_eq!(parse_basic_auth("Bearer abc"), None);
        assert_eq!(parse_basic_auth("Basic !!!"), None);
    }

    #[test]
    fn email_parameter_must_match_session() {
        let session = Session { email: "drama@uni.edu".into(), role: Role::Club };

        assert!(check_identity(&session, None).is_ok());
        assert!(check_identity(&session, Some("page=2")).is_ok());
        assert!(check_identity(&session, Some("email=drama%40uni.edu")).is_ok());
        assert!(matches!(
            check_identity(&session, Some("email=chess%40uni.edu")),
            Err(PortalError::SessionMismatch)
        ));
    }

    #[test]
    fn repeated_email_parameters_must_all_match() {
        let session = Session { email: "drama@uni.edu".into(), role: Role::Club };

        let same = "email=drama%40uni.edu&email=drama%40uni.edu";
        assert!(check_identity(&session, Some(same)).is_ok());
        assert!(matches!(
            check_identity(&session, Some("email=chess%40uni.edu&email=drama%40uni.edu")),
            Err(PortalError::SessionMismatch)
        ));
        assert!(matches!(
            check_identity(&session, Some("email=drama%40uni.edu&email=chess%40uni.edu")),
            Err(PortalError::SessionMismatch)
        ));
    }

    #[test]
    fn role_guard_refuses_the_other_role() {
        let club = Session { email: "drama@uni.edu".into(), role: Role::Club };
        let admin = Session { email: "dean@uni.edu".into(), role: Role::Admin };

        assert_eq!(require_role(club.clone(), Role::Club).unwrap(), club);
        assert_eq!(require_role(admin.clone(), Role::Admin).unwrap(), admin);

        let err = require_role(club, Role::Admin).unwrap_err();
        assert!(matches!(err, PortalError::Forbidden));
        assert!(!err.forces_logout());
        assert!(matches!(require_role(admin, Role::Club), Err(PortalError::Forbidden)));
    }
}
