/**
 * Identity Verifier
 *
 * Resolves a bearer credential to a user identity. The REST middleware and
 * the socket handshake both call `IdentityVerifier::verify`, so a credential
 * accepted by one is accepted by the other.
 */

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use std::sync::Arc;
use uuid::Uuid;

use crate::backend::auth::sessions::verify_token;
use crate::backend::auth::users::get_user_by_id;
use crate::backend::error::{BackendError, BackendResult};

/// A verified user identity
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub user_id: Uuid,
    pub username: String,
}

#[derive(Clone)]
pub struct IdentityVerifier {
    secret: Arc<str>,
    pool: SqlitePool,
}

impl IdentityVerifier {
    pub fn new(secret: impl Into<Arc<str>>, pool: SqlitePool) -> Self {
        Self {
            secret: secret.into(),
            pool,
        }
    }

    /// Verify a credential, raw or with a `Bearer ` prefix
    ///
    /// # Errors
    ///
    /// * `Unauthenticated` - credential missing or blank
    /// * `InvalidCredential` - bad signature, expired, malformed, or a
    ///   subject that is not a user id
    /// * `UnknownUser` - the user no longer exists
    pub async fn verify(&self, credential: Option<&str>) -> BackendResult<Identity> {
        let token = credential
            .map(|c| c.trim())
            .map(|c| c.strip_prefix("Bearer ").unwrap_or(c).trim())
            .filter(|c| !c.is_empty())
            .ok_or(BackendError::Unauthenticated)?;

        let claims = verify_token(&self.secret, token).map_err(|e| {
            tracing::warn!("[Auth] Invalid token: {:?}", e.kind());
            BackendError::invalid_credential("Invalid token")
        })?;

        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| {
            tracing::warn!("[Auth] Token subject is not a user id: {}", claims.sub);
            BackendError::invalid_credential("Invalid token subject")
        })?;

        let user = get_user_by_id(&self.pool, user_id)
            .await?
            .ok_or_else(|| {
                tracing::warn!("[Auth] Token references unknown user {}", user_id);
                BackendError::UnknownUser
            })?;

        Ok(Identity {
            user_id: user.id,
            username: user.username,
        })
    }
}
