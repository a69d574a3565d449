//! Request extractors for authenticated and admin callers.
//!
//! The session collaborator is injected app-wide as an
//! `Extension<Arc<dyn SessionVerifier>>`; the token travels as a `token`
//! cookie or an `Authorization: Bearer` header. Auth runs before any
//! business logic: handlers that declare these extractors never see
//! unauthenticated requests.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use std::sync::Arc;
use tracing::error;

use crate::api::rest::error::ApiError;
use crate::domain::ports::{Role, Session, SessionVerifier};

/// Any authenticated caller.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub Session);

/// Caller with the admin role.
#[derive(Debug, Clone, Copy)]
pub struct AdminUser(pub Session);

fn token_from_parts(parts: &Parts) -> Option<String> {
    if let Some(value) = parts.headers.get(header::AUTHORIZATION) {
        if let Ok(value) = value.to_str() {
            if let Some(token) = value.strip_prefix("Bearer ") {
                return Some(token.trim().to_string());
            }
        }
    }
    let cookies = parts.headers.get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == "token" && !value.is_empty()).then(|| value.to_string())
    })
}

async fn authenticate(parts: &Parts) -> Result<Session, ApiError> {
    let verifier = parts
        .extensions
        .get::<Arc<dyn SessionVerifier>>()
        .ok_or_else(|| {
            error!("SessionVerifier extension is not installed");
            ApiError::Internal
        })?;

    let token = token_from_parts(parts)
        .ok_or_else(|| ApiError::Unauthorized("Authentication required".to_string()))?;

    match verifier.verify(&token).await {
        Ok(Some(session)) => Ok(session),
        Ok(None) => Err(ApiError::Unauthorized(
            "Invalid or expired session".to_string(),
        )),
        Err(e) => {
            error!(error = %e, "Session verification failed");
            Err(ApiError::Internal)
        }
    }
}

impl<S: Send + Sync> FromRequestParts<S> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        authenticate(parts).await.map(Self)
    }
}

impl<S: Send + Sync> FromRequestParts<S> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = authenticate(parts).await?;
        if session.role != Role::Admin {
            return Err(ApiError::Forbidden("Admin access required".to_string()));
        }
        Ok(Self(session))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with(header_name: header::HeaderName, value: &str) -> Parts {
        let (parts, ()) = Request::builder()
            .header(header_name, value)
            .body(())
            .unwrap()
            .into_parts();
        parts
    }

    #[test]
    fn bearer_header_wins() {
        let parts = parts_with(header::AUTHORIZATION, "Bearer abc123");
        assert_eq!(token_from_parts(&parts).as_deref(), Some("abc123"));
    }

    #[test]
    fn token_cookie_is_found_among_others() {
        let parts = parts_with(header::COOKIE, "theme=dark; token=xyz; lang=en");
        assert_eq!(token_from_parts(&parts).as_deref(), Some("xyz"));
    }

    #[test]
    fn missing_token_is_none() {
        let parts = parts_with(header::COOKIE, "theme=dark");
        assert_eq!(token_from_parts(&parts), None);
    }
}
