/**
 * Authentication Middleware
 *
 * Protects the REST surface. The `Authorization` header is resolved through
 * the same `IdentityVerifier` the socket handshake uses, and the resulting
 * `Identity` is attached to the request for handlers to extract.
 */

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};

use crate::backend::auth::{Identity, IdentityVerifier};
use crate::backend::error::BackendError;

/// Authentication middleware
///
/// This middleware:
/// 1. Reads the `Authorization` header
/// 2. Verifies the bearer token and resolves the user
/// 3. Attaches the `Identity` to request extensions
///
/// Rejects with 401 and a JSON error body otherwise.
pub async fn auth_middleware(
    State(verifier): State<IdentityVerifier>,
    mut request: Request,
    next: Next,
) -> Result<Response, BackendError> {
    let credential = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let identity = verifier.verify(credential).await.map_err(|e| {
        tracing::warn!("[Auth] Rejected {} {}: {}", request.method(), request.uri().path(), e);
        e
    })?;

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

/// Axum extractor for the authenticated identity
///
/// Only valid behind `auth_middleware`.
#[derive(Clone, Debug)]
pub struct AuthUser(pub Identity);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = BackendError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| {
                tracing::warn!("[Auth] Identity not found in request extensions");
                BackendError::Unauthenticated
            })
    }
}
