/**
 * Session Tokens
 *
 * JWT issuance and decoding. Tokens are HS256-signed with the configured
 * secret and carry the user id as `sub`. Issuance belongs to the login
 * service; it lives here so tests and tooling can mint valid credentials.
 */

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Token lifetime: 30 days
pub const TOKEN_TTL_SECS: u64 = 30 * 24 * 60 * 60;

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: String,
    /// Username at issue time (informational; the users table is authoritative)
    #[serde(default)]
    pub username: Option<String>,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
    /// Issued at time (Unix timestamp)
    pub iat: u64,
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

/// Create a JWT token for a user
///
/// # Arguments
/// * `secret` - Signing secret
/// * `user_id` - User ID (UUID)
/// * `username` - Display name embedded for clients
///
/// # Returns
/// JWT token string
pub fn create_token(
    secret: &str,
    user_id: uuid::Uuid,
    username: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = unix_now();
    let claims = Claims {
        sub: user_id.to_string(),
        username: Some(username.to_string()),
        exp: now + TOKEN_TTL_SECS,
        iat: now,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Verify and decode a JWT token
///
/// # Returns
/// Decoded claims or error (bad signature, expired, malformed)
pub fn verify_token(secret: &str, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let key = DecodingKey::from_secret(secret.as_bytes());
    let token_data = decode::<Claims>(token, &key, &Validation::default())?;
    Ok(token_data.claims)
}
